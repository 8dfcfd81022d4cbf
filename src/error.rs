//! Error types for the pacing control plane.

use thiserror::Error;

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Broker connection absent or not in a connected state at construction time.
    #[error("broker is not in a connected state")]
    InvalidBroker,

    /// Subscribe/unsubscribe (or connect) failure surfaced by the broker client.
    #[error("broker error: {0}")]
    Broker(String),

    /// Snapshot decode/IO failure; the planned-spend store is left unchanged.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Unrecoverable failure in a background activity (encode/decode failures,
    /// not transient publish failures — see `dispatcher.rs`).
    #[error("fatal error: {0}")]
    Fatal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
