//! Mock greeting work for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

use crate::greeting::GreetingWork;

/// Work that records every call and finishes after a configurable delay.
#[derive(Debug, Default)]
pub struct RecordingWork {
    delay: Duration,
    names: Mutex<Vec<String>>,
}

impl RecordingWork {
    /// Creates recording work that finishes immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates recording work that finishes after `delay`.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            names: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of times the work was started.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.names.lock().len()
    }

    /// Returns the names the work was started for.
    #[must_use]
    pub fn recorded_names(&self) -> Vec<String> {
        self.names.lock().clone()
    }
}

#[async_trait]
impl GreetingWork for RecordingWork {
    async fn perform(&self, name: &str) {
        self.names.lock().push(name.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Work that never finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingWork;

#[async_trait]
impl GreetingWork for PendingWork {
    async fn perform(&self, _name: &str) {
        std::future::pending::<()>().await;
    }
}

/// Work that panics.
#[derive(Debug, Clone)]
pub struct PanickingWork {
    message: String,
}

impl PanickingWork {
    /// Creates work that panics with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl GreetingWork for PanickingWork {
    async fn perform(&self, _name: &str) {
        panic!("{}", self.message);
    }
}
