//! Budget-pacing control plane for a real-time-bidding fleet.
//!
//! A controller owns per-line-item daily budgets and splits them into
//! per-minute workload fragments, dispatched to whichever bidders are
//! currently announcing themselves alive.

pub mod announcer;
pub mod bidder;
pub mod broker;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod membership;
pub mod observer;
pub mod planned_spend;
pub mod receiver;
pub mod snapshot;
pub mod spend;
pub mod splitter;
pub mod time_slot;

pub use error::{Error, Result};
