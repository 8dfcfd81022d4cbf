//! Mapping wall-clock time to one of the day's 1440 one-minute slots.

use chrono::{DateTime, Local, Timelike};

/// Number of one-minute slots in a day.
pub const TIME_SLOTS: usize = 1440;

/// Returns the slot index `[0, 1440)` for the given local time, defined as
/// `floor((t - midnight_local(t)) / 60s)`.
pub fn time_to_slot(t: DateTime<Local>) -> usize {
    t.hour() as usize * 60 + t.minute() as usize
}

/// Slot index for the current local time.
pub fn current_slot() -> usize {
    time_to_slot(Local::now())
}
