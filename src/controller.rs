//! The controller: the process that owns a line-item snapshot, tracks the
//! live bidder fleet, and dispatches per-minute workload fragments to it.

use crate::broker::Broker;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::membership::{self, MembershipSet};
use crate::observer::Observer;
use crate::planned_spend::PlannedSpend;
use crate::snapshot::Record;
use crate::spend::Spend;
use std::path::Path;
use std::sync::Arc;

/// Wires together the observer, planned-spend store, spend store, and
/// dispatcher, mirroring the original system's controller component. Owns
/// the background tasks for its own lifetime; `shutdown` stops all of them.
pub struct Controller {
    observer: Observer,
    membership: Arc<MembershipSet>,
    planned: Arc<PlannedSpend>,
    spend: Arc<Spend>,
    dispatcher: Dispatcher,
}

impl Controller {
    /// Loads `snapshot_path`, starts observing announcements, and begins
    /// dispatching ticks immediately.
    pub async fn start(
        broker: Arc<dyn Broker>,
        config: &Config,
        snapshot_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let planned = Arc::new(PlannedSpend::new());
        planned.load(snapshot_path)?;
        let spend = Arc::new(Spend::new());

        let observer = Observer::start(
            Arc::clone(&broker),
            &config.announcements_subject,
            config.observer_ttl,
        )
        .await?;
        let membership = observer.membership();
        membership::start_sweeper(&membership, config.observer_ttl / 2);

        let dispatcher = Dispatcher::start(
            broker,
            Arc::clone(&membership),
            Arc::clone(&planned),
            Arc::clone(&spend),
            config.dispatch_period,
        );

        Ok(Self {
            observer,
            membership,
            planned,
            spend,
            dispatcher,
        })
    }

    /// Reloads the planned-spend distribution from already-decoded records,
    /// e.g. in response to a budget change pushed from outside this crate.
    pub fn reload_records(&self, records: &[Record]) {
        self.planned.load_records(records);
    }

    pub fn spend(&self) -> Arc<Spend> {
        Arc::clone(&self.spend)
    }

    pub fn live_consumers(&self) -> Vec<String> {
        self.membership.list()
    }

    /// Stops the dispatcher, the membership sweeper, and the observer, in
    /// that order, waiting for each to finish before moving to the next.
    pub async fn shutdown(mut self) {
        self.dispatcher.stop().await;
        membership::stop_sweeper(&self.membership).await;
        let _ = self.observer.stop().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{BrokerSubscription, InMemoryBroker};
    use crate::ids::LineItemId;
    use std::io::Write;
    use std::time::Duration;

    #[tokio::test]
    async fn dispatches_to_an_announced_bidder() {
        let broker = Arc::new(InMemoryBroker::new());
        let id = LineItemId::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"line_item_id":"{id}","daily_budget":{budget}}}"#,
            budget = 4 * 1440
        )
        .unwrap();

        let config = Config {
            announce_period: Duration::from_millis(2),
            observer_ttl: Duration::from_millis(20),
            dispatch_period: Duration::from_millis(2),
            ..Config::default()
        };

        let controller = Controller::start(Arc::clone(&broker), &config, file.path())
            .await
            .unwrap();

        let bidder = crate::announcer::Announcer::start(
            Arc::clone(&broker),
            broker.new_inbox(),
            &config.announcements_subject,
            config.announce_period,
        )
        .unwrap();
        let mut inbox_sub = broker.subscribe(bidder.address()).await.unwrap();

        let payload = inbox_sub.next().await.unwrap();
        let fragments: std::collections::HashMap<LineItemId, i64> =
            serde_json::from_slice(&payload).unwrap();
        assert_eq!(fragments[&id], 4);

        bidder.stop().await;
        controller.shutdown().await;
    }
}
