//! The workload splitter: a pure function dividing each line item's current
//! per-minute budget across the live consumer set, honoring already-reported
//! spend.

use crate::ids::LineItemId;
use crate::planned_spend::PlannedSpend;
use crate::spend::Spend;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-consumer allocation: every live consumer maps to the *same* inner
/// `Arc<HashMap<_, _>>` — the splitter's allocation is uniform across
/// consumers within one tick; differentiation only happens across ticks as
/// spend feedback reduces the remaining diff.
pub type Fragments = Arc<HashMap<LineItemId, i64>>;

/// Divides each line item's planned budget for `slot` (minus reported spend)
/// across `consumers`.
///
/// - Empty `consumers` returns an empty mapping.
/// - A line item whose remaining budget (`planned - spend`) is less than
///   `consumers.len()` is skipped entirely for this tick — every emitted
///   fragment is guaranteed at least 1 micro-unit.
/// - Otherwise each consumer receives `diff / consumers.len()` (integer
///   floor); the `diff % n` remainder is dropped for this tick.
pub fn split(
    consumers: &[String],
    planned: &PlannedSpend,
    spend: &Spend,
    slot: usize,
) -> HashMap<String, Fragments> {
    if consumers.is_empty() {
        return HashMap::new();
    }
    let n = consumers.len() as i64;

    let mut cons_wrk = HashMap::new();
    for (id, planned_slot_budget) in planned.get_all(slot) {
        let diff = planned_slot_budget - spend.get(id);
        if diff < n {
            continue;
        }
        cons_wrk.insert(id, diff / n);
    }
    let cons_wrk = Arc::new(cons_wrk);

    consumers
        .iter()
        .map(|consumer| (consumer.clone(), Arc::clone(&cons_wrk)))
        .collect()
}
