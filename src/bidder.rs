//! The bidder: a fleet member's side of the protocol. Wraps a [`Receiver`]
//! so an embedding application only has to supply a callback for incoming
//! workload fragments.

use crate::broker::Broker;
use crate::config::Config;
use crate::error::Result;
use crate::ids::LineItemId;
use crate::receiver::Receiver;
use std::collections::HashMap;
use std::sync::Arc;

/// A decoded per-line-item workload fragment, as published by the
/// dispatcher for this consumer's inbox.
pub type WorkloadFragments = HashMap<LineItemId, i64>;

/// Invoked with each tick's decoded fragment assignment for this bidder.
pub trait WorkloadHandler: Fn(WorkloadFragments) + Send + Sync + 'static {}
impl<T: Fn(WorkloadFragments) + Send + Sync + 'static> WorkloadHandler for T {}

pub struct Bidder {
    receiver: Receiver,
}

impl Bidder {
    /// Starts announcing this bidder and decoding every dispatched fragment
    /// as JSON before handing it to `handler`. A body that fails to decode
    /// is logged and dropped; it does not stop the bidder.
    pub async fn start(
        broker: Arc<dyn Broker>,
        config: &Config,
        handler: impl WorkloadHandler,
    ) -> Result<Self> {
        let receiver = Receiver::start(
            broker,
            &config.announcements_subject,
            config.announce_period,
            move |body| match serde_json::from_str::<WorkloadFragments>(&body) {
                Ok(fragments) => handler(fragments),
                Err(e) => tracing::warn!(error = %e, "dropping undecodable workload fragment"),
            },
        )
        .await?;
        Ok(Self { receiver })
    }

    pub fn address(&self) -> &str {
        self.receiver.address()
    }

    pub async fn stop(mut self) {
        self.receiver.stop().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::InMemoryBroker;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[tokio::test]
    async fn decodes_and_delivers_a_workload_fragment() {
        let broker = Arc::new(InMemoryBroker::new());
        let received: Arc<Mutex<Vec<WorkloadFragments>>> = Arc::new(Mutex::new(Vec::new()));
        let received_for_handler = Arc::clone(&received);

        let config = Config {
            announce_period: Duration::from_millis(5),
            ..Config::default()
        };
        let bidder = Bidder::start(Arc::clone(&broker), &config, move |fragments| {
            received_for_handler.lock().push(fragments);
        })
        .await
        .unwrap();

        let id = LineItemId::new();
        let mut fragments = WorkloadFragments::new();
        fragments.insert(id, 42);
        broker
            .publish(bidder.address(), serde_json::to_vec(&fragments).unwrap())
            .await;

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(received.lock()[0][&id], 42);

        bidder.stop().await;
    }
}
