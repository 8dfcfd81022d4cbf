//! Consumer-side beacon: advertises a private inbox address periodically on
//! a well-known announcements subject.

use crate::broker::Broker;
use crate::error::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_ANNOUNCEMENTS_SUBJECT: &str = "announcements";
pub const DEFAULT_ANNOUNCE_PERIOD: Duration = Duration::from_secs(5);

pub struct Announcer {
    address: String,
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Announcer {
    /// Starts announcing `address` on `subject` every `period`, publishing
    /// once immediately. Non-positive periods fall back to the default.
    /// Fails with [`Error::InvalidBroker`] if the broker is not connected.
    pub fn start(
        broker: Arc<dyn Broker>,
        address: String,
        subject: impl Into<String>,
        period: Duration,
    ) -> Result<Self> {
        if !broker.is_connected() {
            return Err(Error::InvalidBroker);
        }
        let subject = subject.into();
        let period = if period.is_zero() {
            DEFAULT_ANNOUNCE_PERIOD
        } else {
            period
        };

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let addr_for_task = address.clone();
        let handle = tokio::spawn(async move {
            broker.publish(&subject, addr_for_task.clone().into_bytes()).await;
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // first tick fires immediately; already announced above.
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        broker.publish(&subject, addr_for_task.clone().into_bytes()).await;
                    }
                    _ = stop_rx.changed() => {
                        return;
                    }
                }
            }
        });

        Ok(Self {
            address,
            stop_tx,
            handle,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Blocks until the beacon task has observed the stop signal and
    /// exited. Safe to call once.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{BrokerSubscription, InMemoryBroker};

    #[tokio::test]
    async fn fails_to_start_against_a_disconnected_broker() {
        struct Disconnected;
        #[async_trait::async_trait]
        impl Broker for Disconnected {
            fn is_connected(&self) -> bool {
                false
            }
            async fn publish(&self, _subject: &str, _payload: Vec<u8>) {}
            async fn subscribe(
                &self,
                _subject: &str,
            ) -> Result<Box<dyn crate::broker::BrokerSubscription>> {
                unreachable!()
            }
            fn new_inbox(&self) -> String {
                unreachable!()
            }
        }
        let result = Announcer::start(
            Arc::new(Disconnected),
            "addr".to_string(),
            DEFAULT_ANNOUNCEMENTS_SUBJECT,
            DEFAULT_ANNOUNCE_PERIOD,
        );
        assert!(matches!(result, Err(Error::InvalidBroker)));
    }

    #[tokio::test]
    async fn announces_immediately_on_start() {
        let broker = Arc::new(InMemoryBroker::new());
        let mut sub = broker.subscribe("announcements").await.unwrap();
        let announcer = Announcer::start(
            broker,
            "my-inbox".to_string(),
            "announcements",
            Duration::from_millis(5),
        )
        .unwrap();
        let msg = sub.next().await.unwrap();
        assert_eq!(msg, b"my-inbox");
        announcer.stop().await;
    }
}
