//! Per-line-item cumulative realized spend. Populated by an external
//! feedback path (bidding outcomes) outside the scope of this crate; read by
//! the workload splitter.

use crate::ids::LineItemId;
use dashmap::DashMap;

#[derive(Default)]
pub struct Spend {
    inner: DashMap<LineItemId, i64>,
}

impl Spend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns 0 for a line item with no recorded spend.
    pub fn get(&self, id: LineItemId) -> i64 {
        self.inner.get(&id).map(|v| *v).unwrap_or(0)
    }

    /// Overwrites the cumulative spend for a line item. The entrypoint for
    /// the external feedback collaborator; not invoked by anything in this
    /// crate's own tick loop.
    pub fn set(&self, id: LineItemId, value: i64) {
        self.inner.insert(id, value);
    }

    /// Adds to the cumulative spend for a line item.
    pub fn add(&self, id: LineItemId, delta: i64) {
        *self.inner.entry(id).or_insert(0) += delta;
    }
}
