//! End-to-end exercise of the full stack (snapshot -> controller -> two
//! bidders) over the in-memory broker, mirroring spec scenario 6.

use pacer::bidder::Bidder;
use pacer::broker::{Broker, InMemoryBroker};
use pacer::config::Config;
use pacer::controller::Controller;
use pacer::ids::LineItemId;
use pacer::snapshot::Record;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

fn snapshot_file(records: &[Record]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for record in records {
        writeln!(file, "{}", serde_json::to_string(record).unwrap()).unwrap();
    }
    file
}

#[tokio::test]
async fn two_bidders_split_a_line_items_budget() {
    let broker = Arc::new(InMemoryBroker::new());
    let id = LineItemId::new();
    let snapshot = snapshot_file(&[Record {
        line_item_id: id,
        daily_budget: 6 * 1440,
    }]);

    let config = Config {
        announce_period: Duration::from_millis(2),
        observer_ttl: Duration::from_millis(30),
        dispatch_period: Duration::from_millis(2),
        ..Config::default()
    };

    let controller = Controller::start(Arc::clone(&broker), &config, snapshot.path())
        .await
        .unwrap();

    let bob_fragments = Arc::new(Mutex::new(Vec::new()));
    let charlie_fragments = Arc::new(Mutex::new(Vec::new()));
    let bob_sink = Arc::clone(&bob_fragments);
    let charlie_sink = Arc::clone(&charlie_fragments);

    let bob = Bidder::start(Arc::clone(&broker), &config, move |fragments| {
        let sink = Arc::clone(&bob_sink);
        tokio::spawn(async move { sink.lock().await.push(fragments) });
    })
    .await
    .unwrap();
    let charlie = Bidder::start(Arc::clone(&broker), &config, move |fragments| {
        let sink = Arc::clone(&charlie_sink);
        tokio::spawn(async move { sink.lock().await.push(fragments) });
    })
    .await
    .unwrap();

    // Give both bidders time to announce and the dispatcher time to tick.
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(controller.live_consumers().contains(&bob.address().to_string()));
    assert!(controller.live_consumers().contains(&charlie.address().to_string()));

    tokio::time::sleep(Duration::from_millis(10)).await;

    let bob_got = bob_fragments.lock().await;
    let charlie_got = charlie_fragments.lock().await;
    assert!(!bob_got.is_empty());
    assert!(!charlie_got.is_empty());
    assert_eq!(bob_got.last().unwrap()[&id], 3);
    assert_eq!(charlie_got.last().unwrap()[&id], 3);

    charlie.stop().await;
    bob.stop().await;
    controller.shutdown().await;
}

#[tokio::test]
async fn consumer_that_stops_announcing_drops_out_of_membership() {
    let broker = Arc::new(InMemoryBroker::new());
    let observer = pacer::observer::Observer::start(
        Arc::clone(&broker),
        "announcements",
        Duration::from_millis(4),
    )
    .await
    .unwrap();

    let bob = pacer::announcer::Announcer::start(
        Arc::clone(&broker),
        broker.new_inbox(),
        "announcements",
        Duration::from_millis(1),
    )
    .unwrap();
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(observer.consumers(), vec![bob.address().to_string()]);

    bob.stop().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(observer.consumers().is_empty());
}
