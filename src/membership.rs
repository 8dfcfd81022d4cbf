//! Thread-safe TTL-keyed set of consumer addresses.
//!
//! Active-sweeper variant (spec's option 2): a background task wakes every
//! `check_period` and prunes expired entries; `list()` simply returns
//! whatever remains. Chosen over the lazy/amortized variants because it
//! gives membership shrinkage a latency bound independent of how often
//! `list()` happens to be called — the dispatcher's tick period and the
//! sweeper's check period are otherwise unrelated.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct MembershipSet {
    entries: Mutex<HashMap<String, Instant>>,
    ttl: Duration,
    sweeper: Mutex<Option<(watch::Sender<bool>, JoinHandle<()>)>>,
}

impl MembershipSet {
    pub fn new(ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            sweeper: Mutex::new(None),
        })
    }

    /// Upserts `addr`, always refreshing its expiry to `now + ttl`.
    pub fn join(&self, addr: impl Into<String>) {
        self.entries
            .lock()
            .insert(addr.into(), Instant::now() + self.ttl);
    }

    /// Removes `addr` if present; silent on absence.
    pub fn leave(&self, addr: &str) {
        self.entries.lock().remove(addr);
    }

    /// Returns every address whose expiry is strictly in the future.
    pub fn list(&self) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .lock()
            .iter()
            .filter(|(_, expiry)| **expiry > now)
            .map(|(addr, _)| addr.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Starts (or is a no-op if already running) the background sweeper that
/// removes expired entries every `check_period`.
pub fn start_sweeper(set: &Arc<MembershipSet>, check_period: Duration) {
    let mut guard = set.sweeper.lock();
    if guard.is_some() {
        return;
    }
    let (tx, mut rx) = watch::channel(false);
    let set = Arc::clone(set);
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(check_period);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = Instant::now();
                    set.entries.lock().retain(|_, expiry| *expiry > now);
                }
                _ = rx.changed() => {
                    return;
                }
            }
        }
    });
    *guard = Some((tx, handle));
}

/// Stops the sweeper, blocking until its task has observed the stop signal
/// and exited. Safe to call repeatedly.
pub async fn stop_sweeper(set: &Arc<MembershipSet>) {
    let stopped = set.sweeper.lock().take();
    if let Some((tx, handle)) = stopped {
        let _ = tx.send(true);
        let _ = handle.await;
    }
}
