//! Consumer-side inbox: owns an [`Announcer`] beaconing this consumer's
//! private inbox address, and feeds every message delivered to that inbox to
//! an application-supplied callback.

use crate::announcer::{Announcer, DEFAULT_ANNOUNCE_PERIOD};
use crate::broker::{Broker, BrokerSubscription};
use crate::error::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Invoked with the raw UTF-8 body of each message delivered to this
/// consumer's inbox. Decoding the body into a domain type (a workload
/// fragment map, in this crate's own bidder binary) is the caller's concern.
pub trait FragmentHandler: Fn(String) + Send + Sync + 'static {}
impl<T: Fn(String) + Send + Sync + 'static> FragmentHandler for T {}

pub struct Receiver {
    announcer: Option<Announcer>,
    stop_tx: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl Receiver {
    /// Generates a private inbox, starts announcing it on
    /// `announcements_subject` every `announce_period`, and subscribes the
    /// same inbox to `handler`.
    pub async fn start(
        broker: Arc<dyn Broker>,
        announcements_subject: impl Into<String>,
        announce_period: Duration,
        handler: impl FragmentHandler,
    ) -> Result<Self> {
        if !broker.is_connected() {
            return Err(Error::InvalidBroker);
        }
        let inbox = broker.new_inbox();
        let mut subscription = broker
            .subscribe(&inbox)
            .await
            .map_err(|_| Error::Broker(format!("failed to subscribe to {inbox}")))?;

        let announcer = Announcer::start(
            Arc::clone(&broker),
            inbox,
            announcements_subject,
            if announce_period.is_zero() {
                DEFAULT_ANNOUNCE_PERIOD
            } else {
                announce_period
            },
        )?;

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    payload = subscription.next() => {
                        match payload {
                            Some(payload) => match String::from_utf8(payload) {
                                Ok(body) => handler(body),
                                Err(e) => tracing::warn!(error = %e, "dropping non-UTF8 fragment"),
                            },
                            None => return,
                        }
                    }
                    _ = stop_rx.changed() => {
                        if let Err(e) = subscription.unsubscribe().await {
                            tracing::warn!(error = %e, "failed to unsubscribe cleanly");
                        }
                        return;
                    }
                }
            }
        });

        Ok(Self {
            announcer: Some(announcer),
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn address(&self) -> &str {
        self.announcer
            .as_ref()
            .expect("address() called after stop()")
            .address()
    }

    /// Stops both the announcer beacon and the inbox subscription. Safe to
    /// call once.
    pub async fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        if let Some(announcer) = self.announcer.take() {
            announcer.stop().await;
        }
    }
}
