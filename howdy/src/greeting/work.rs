//! The unit of work a greeter races against its signal.

use async_trait::async_trait;
use std::time::Duration;

/// Work performed before a greeting is released.
///
/// The greeter runs this on a dedicated task. If the signal settles first,
/// the task is aborted at its next await point.
#[async_trait]
pub trait GreetingWork: Send + Sync {
    /// Performs the work for `name`.
    async fn perform(&self, name: &str);
}

/// Stands in for real work with a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedWork {
    delay: Duration,
}

impl SimulatedWork {
    /// Creates simulated work lasting `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Returns the delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedWork {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[async_trait]
impl GreetingWork for SimulatedWork {
    async fn perform(&self, _name: &str) {
        tokio::time::sleep(self.delay).await;
    }
}
