//! Cooperative cancellation.
//!
//! This module provides:
//! - [`CancellationSignal`], a tree of settle-once signals with deadlines and tags
//! - [`run_until_settled`], a two-way race between a worker and a signal

mod race;
mod signal;

pub use race::run_until_settled;
pub use signal::{CancelReason, CancellationSignal};
