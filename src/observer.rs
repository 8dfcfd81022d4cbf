//! Controller-side ingest: translates announcement messages into
//! [`MembershipSet`] insertions.

use crate::broker::{Broker, BrokerSubscription};
use crate::error::{Error, Result};
use crate::membership::MembershipSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Per spec §4.3: the observer's TTL must be at least `2 * Pa` of the
/// announcers it tracks, so one missed announcement doesn't evict a live
/// consumer. Unlike the original source (which defaults observer TTL to the
/// same value as the announcer period), this crate's `Config` always
/// derives the observer TTL as `2 * announce_period` — see `config.rs`.
pub fn default_ttl_for(announce_period: Duration) -> Duration {
    announce_period * 2
}

pub struct Observer {
    membership: Arc<MembershipSet>,
    stop_tx: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<Result<()>>>,
}

impl Observer {
    /// Subscribes to `subject` and joins each observed address into a fresh
    /// [`MembershipSet`] with the given `ttl`. Fails with
    /// [`Error::InvalidBroker`] if the broker is not connected, or
    /// [`Error::Broker`] if the subscribe call itself fails.
    pub async fn start(
        broker: Arc<dyn Broker>,
        subject: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self> {
        if !broker.is_connected() {
            return Err(Error::InvalidBroker);
        }
        let subject = subject.into();
        let membership = MembershipSet::new(ttl);
        let mut subscription = broker
            .subscribe(&subject)
            .await
            .map_err(|_| Error::Broker(format!("failed to subscribe to {subject}")))?;

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let membership_for_task = Arc::clone(&membership);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    payload = subscription.next() => {
                        match payload {
                            Some(payload) => match String::from_utf8(payload) {
                                Ok(addr) => membership_for_task.join(addr),
                                Err(e) => tracing::warn!(error = %e, "dropping non-UTF8 announcement"),
                            },
                            None => return Ok(()),
                        }
                    }
                    _ = stop_rx.changed() => {
                        return subscription
                            .unsubscribe()
                            .await
                            .map_err(|e| Error::Broker(format!("failed to unsubscribe: {e}")));
                    }
                }
            }
        });

        Ok(Self {
            membership,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn membership(&self) -> Arc<MembershipSet> {
        Arc::clone(&self.membership)
    }

    pub fn consumers(&self) -> Vec<String> {
        self.membership.list()
    }

    /// Unsubscribes and stops the ingest task. Idempotent. Surfaces a failed
    /// unsubscribe as [`Error::Broker`].
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
        if let Some(handle) = self.handle.take() {
            match handle.await {
                Ok(result) => result?,
                Err(e) => tracing::warn!(error = %e, "ingest task panicked"),
            }
        }
        Ok(())
    }
}
