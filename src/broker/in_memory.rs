//! In-process pub/sub broker used by this crate's own test suite (and
//! suitable for running a controller and bidder in a single process).
//!
//! Built on a `DashMap<String, broadcast::Sender<Vec<u8>>>` keyed by subject,
//! against the async subscribe/unsubscribe contract this crate's components
//! need.

use super::{Broker, BrokerSubscription};
use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 1024;

#[derive(Default)]
pub struct InMemoryBroker {
    topics: DashMap<String, broadcast::Sender<Vec<u8>>>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender_for(&self, subject: &str) -> broadcast::Sender<Vec<u8>> {
        self.topics
            .entry(subject.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl Broker for InMemoryBroker {
    fn is_connected(&self) -> bool {
        true
    }

    async fn publish(&self, subject: &str, payload: Vec<u8>) {
        let _ = self.sender_for(subject).send(payload);
    }

    async fn subscribe(&self, subject: &str) -> Result<Box<dyn BrokerSubscription>> {
        let rx = self.sender_for(subject).subscribe();
        Ok(Box::new(InMemorySubscription {
            rx: Some(rx),
        }))
    }

    fn new_inbox(&self) -> String {
        format!("_INBOX.{}", Uuid::new_v4().simple())
    }
}

struct InMemorySubscription {
    rx: Option<broadcast::Receiver<Vec<u8>>>,
}

#[async_trait]
impl BrokerSubscription for InMemorySubscription {
    async fn next(&mut self) -> Option<Vec<u8>> {
        loop {
            let rx = self.rx.as_mut()?;
            match rx.recv().await {
                Ok(payload) => return Some(payload),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => {
                    self.rx = None;
                    return None;
                }
            }
        }
    }

    async fn unsubscribe(&mut self) -> Result<()> {
        self.rx = None;
        Ok(())
    }
}
