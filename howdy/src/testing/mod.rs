//! Testing utilities for greeters and loggers.
//!
//! This module provides:
//! - Mock greeting work (recording, never-finishing, panicking)
//! - A logger wired to an in-memory sink

mod mocks;

pub use mocks::{PanickingWork, PendingWork, RecordingWork};

use crate::logging::{ContextLogger, MemorySink};
use std::sync::Arc;

/// Creates a logger together with the memory sink it writes to.
#[must_use]
pub fn memory_logger() -> (Arc<ContextLogger>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (Arc::new(ContextLogger::new(sink.clone())), sink)
}
