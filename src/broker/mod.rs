//! The message-broker abstraction: an untyped publish/subscribe transport
//! with subject-addressable delivery and request-response-style private
//! inboxes. Treated as an external collaborator (spec §1) — this module
//! only specifies and implements the interface, not a real broker.

mod in_memory;
#[cfg(feature = "broker-nats")]
mod nats;

pub use in_memory::InMemoryBroker;
#[cfg(feature = "broker-nats")]
pub use nats::NatsBroker;

use crate::error::Result;
use async_trait::async_trait;

/// A live subscription to a subject. Dropping it (or calling
/// [`BrokerSubscription::unsubscribe`]) stops further delivery.
#[async_trait]
pub trait BrokerSubscription: Send {
    /// Awaits the next message payload, or `None` once unsubscribed.
    async fn next(&mut self) -> Option<Vec<u8>>;

    /// Explicitly unsubscribes. Idempotent.
    async fn unsubscribe(&mut self) -> Result<()>;
}

/// Connection-oriented pub/sub broker contract (spec §6).
#[async_trait]
pub trait Broker: Send + Sync {
    /// Whether the underlying connection is currently usable.
    fn is_connected(&self) -> bool;

    /// Best-effort publish. `async` so callers that must preserve
    /// per-subject publish order (the dispatcher's per-consumer tick order)
    /// can simply `.await` each call in sequence instead of racing detached
    /// tasks against each other.
    async fn publish(&self, subject: &str, payload: Vec<u8>);

    /// Subscribes to `subject`, delivering messages until unsubscribed.
    async fn subscribe(&self, subject: &str) -> Result<Box<dyn BrokerSubscription>>;

    /// Generates a unique private subject (a per-consumer inbox).
    fn new_inbox(&self) -> String;
}
