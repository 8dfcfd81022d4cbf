//! NATS-backed broker, feature-gated behind `broker-nats`.
//!
//! Subscribe is `async` against `async_nats::Client` directly, so there's no
//! need for any of the tricks a non-`async` trait method would otherwise
//! force on a subscribe path.

use super::{Broker, BrokerSubscription};
use crate::error::{Error, Result};
use async_nats::{connection::State, Client};
use async_trait::async_trait;
use futures_util::StreamExt;

pub struct NatsBroker {
    client: Client,
}

impl NatsBroker {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| Error::Broker(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Broker for NatsBroker {
    fn is_connected(&self) -> bool {
        matches!(self.client.connection_state(), State::Connected)
    }

    async fn publish(&self, subject: &str, payload: Vec<u8>) {
        if let Err(e) = self.client.publish(subject.to_string(), payload.into()).await {
            tracing::warn!(subject, error = %e, "NATS publish failed");
        }
    }

    async fn subscribe(&self, subject: &str) -> Result<Box<dyn BrokerSubscription>> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| Error::Broker(e.to_string()))?;
        Ok(Box::new(NatsSubscription {
            subscriber: Some(subscriber),
        }))
    }

    fn new_inbox(&self) -> String {
        self.client.new_inbox()
    }
}

struct NatsSubscription {
    subscriber: Option<async_nats::Subscriber>,
}

#[async_trait]
impl BrokerSubscription for NatsSubscription {
    async fn next(&mut self) -> Option<Vec<u8>> {
        let subscriber = self.subscriber.as_mut()?;
        subscriber.next().await.map(|msg| msg.payload.to_vec())
    }

    async fn unsubscribe(&mut self) -> Result<()> {
        if let Some(mut subscriber) = self.subscriber.take() {
            subscriber
                .unsubscribe()
                .await
                .map_err(|e| Error::Broker(e.to_string()))?;
        }
        Ok(())
    }
}
