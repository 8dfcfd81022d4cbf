//! Per-line-item per-minute planned budget, derived once from the snapshot
//! and thereafter read-only (until the next `Load`/`load_from`).

use crate::error::Result;
use crate::ids::LineItemId;
use crate::snapshot::{load_snapshot, Record};
use crate::time_slot::TIME_SLOTS;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Builds an "as even as possible" distribution of `val` across
/// [`TIME_SLOTS`] slots: every slot is `floor(val / TIME_SLOTS)` or one more,
/// with the higher-valued slots at the front, in a count equal to
/// `val mod TIME_SLOTS`. Non-positive values collapse to all-zero.
pub fn even_distribution(val: i64) -> Vec<i64> {
    let mut dist = vec![0i64; TIME_SLOTS];
    if val <= 0 {
        return dist;
    }
    let base = val / TIME_SLOTS as i64;
    let remainder = (val % TIME_SLOTS as i64) as usize;
    for (i, slot) in dist.iter_mut().enumerate() {
        *slot = base + if i < remainder { 1 } else { 0 };
    }
    dist
}

/// Per-line-item per-minute planned budget, swapped in atomically on load so
/// that `get_all` readers never observe a partially-loaded snapshot and never
/// block behind a file read (staged-then-swapped, per the design note on
/// hot-reload safety).
pub struct PlannedSpend {
    inner: ArcSwap<HashMap<LineItemId, Vec<i64>>>,
}

impl PlannedSpend {
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Loads a snapshot file, replacing the current distribution set
    /// atomically. On failure the store is left exactly as it was before the
    /// call (the new map is built entirely in memory before being swapped in).
    pub fn load(&self, path: impl AsRef<Path>) -> Result<()> {
        let records = load_snapshot(path)?;
        self.load_records(&records);
        Ok(())
    }

    /// Builds the distribution map from already-decoded records and swaps it
    /// in. Duplicate `LineItemId`s: last write wins.
    pub fn load_records(&self, records: &[Record]) {
        let mut staged = HashMap::with_capacity(records.len());
        for record in records {
            staged.insert(record.line_item_id, even_distribution(record.daily_budget));
        }
        self.inner.store(Arc::new(staged));
    }

    /// Returns an independent copy of each line item's budget for `slot`.
    pub fn get_all(&self, slot: usize) -> HashMap<LineItemId, i64> {
        let snapshot = self.inner.load();
        snapshot
            .iter()
            .map(|(id, dist)| (*id, dist[slot]))
            .collect()
    }
}

impl Default for PlannedSpend {
    fn default() -> Self {
        Self::new()
    }
}
