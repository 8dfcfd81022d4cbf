//! The controller's tick loop: every `period`, splits the current workload
//! across the live consumer set and publishes each consumer's fragment to
//! its private inbox.

use crate::broker::Broker;
use crate::membership::MembershipSet;
use crate::planned_spend::PlannedSpend;
use crate::spend::Spend;
use crate::splitter::{self, Fragments};
use crate::time_slot::current_slot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_DISPATCH_PERIOD: Duration = Duration::from_secs(1);

pub struct Dispatcher {
    stop_tx: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl Dispatcher {
    /// Starts the tick loop. A non-positive `period` falls back to the
    /// default. Publish failures for an individual consumer are logged and
    /// do not interrupt the tick or any other consumer's delivery — a
    /// transient broker hiccup for one bidder must not stall the fleet.
    pub fn start(
        broker: Arc<dyn Broker>,
        membership: Arc<MembershipSet>,
        planned: Arc<PlannedSpend>,
        spend: Arc<Spend>,
        period: Duration,
    ) -> Self {
        let period = if period.is_zero() {
            DEFAULT_DISPATCH_PERIOD
        } else {
            period
        };
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        dispatch_once(broker.as_ref(), &membership, &planned, &spend).await;
                    }
                    _ = stop_rx.changed() => {
                        return;
                    }
                }
            }
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Signals the tick loop to stop and waits for its current tick (if any)
    /// to finish. Safe to call repeatedly.
    pub async fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

/// Publishes are awaited one consumer at a time (not fanned out), so that
/// per-consumer delivery order across ticks matches tick order.
async fn dispatch_once(
    broker: &dyn Broker,
    membership: &MembershipSet,
    planned: &PlannedSpend,
    spend: &Spend,
) {
    let consumers = membership.list();
    if consumers.is_empty() {
        return;
    }
    let slot = current_slot();
    let assignments = splitter::split(&consumers, planned, spend, slot);
    for (consumer, fragments) in assignments {
        publish_fragment(broker, &consumer, &fragments).await;
    }
}

async fn publish_fragment(broker: &dyn Broker, consumer: &str, fragments: &Fragments) {
    match serde_json::to_vec(fragments.as_ref()) {
        Ok(payload) => broker.publish(consumer, payload).await,
        Err(e) => tracing::warn!(consumer, error = %e, "failed to encode workload fragment"),
    }
}
