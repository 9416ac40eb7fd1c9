//! The application core: run one greeting and map its outcome to an exit code.

use async_trait::async_trait;
use howdy::cancellation::CancellationSignal;
use howdy::errors::{GreetError, OutcomeKind};
use howdy::greeting::Greeter;
use howdy::logging::ContextLogger;
use std::sync::Arc;
use std::time::Duration;

/// What to greet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetRequest {
    /// Name to greet.
    pub name: String,
    /// Winnings to announce, in cents.
    pub winnings_cents: Option<u64>,
}

impl GreetRequest {
    /// Creates a request without winnings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            winnings_cents: None,
        }
    }

    /// Adds winnings to announce.
    #[must_use]
    pub fn with_winnings(mut self, cents: u64) -> Self {
        self.winnings_cents = Some(cents);
        self
    }
}

/// The operation the application runs.
#[async_trait]
pub trait GreetOperation: Send + Sync {
    /// Produces a greeting for `request` under `signal`.
    async fn greet(&self, signal: &CancellationSignal, request: &GreetRequest) -> Result<String, GreetError>;
}

#[async_trait]
impl GreetOperation for Greeter {
    async fn greet(&self, signal: &CancellationSignal, request: &GreetRequest) -> Result<String, GreetError> {
        match request.winnings_cents {
            Some(cents) => self.greet_with_winnings(signal, &request.name, cents).await,
            None => Greeter::greet(self, signal, &request.name).await,
        }
    }
}

/// The result of one application run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOutcome {
    /// The terminal state.
    pub kind: OutcomeKind,
    /// The greeting, on success.
    pub message: Option<String>,
}

impl AppOutcome {
    /// Returns the process exit code.
    pub const fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

/// Runs a greeting operation and reports its outcome.
pub struct App {
    operation: Arc<dyn GreetOperation>,
    logger: Arc<ContextLogger>,
}

impl App {
    /// Creates an application around `operation`.
    pub fn new(operation: Arc<dyn GreetOperation>, logger: Arc<ContextLogger>) -> Self {
        Self { operation, logger }
    }

    /// Runs the operation under a child of `signal` bounded by `timeout`.
    ///
    /// Failures are logged here: expected conditions at warning level,
    /// everything else at error level.
    pub async fn run(&self, signal: &CancellationSignal, request: &GreetRequest, timeout: Duration) -> AppOutcome {
        let scoped = signal.with_timeout(timeout);
        let result = self.operation.greet(&scoped, request).await;
        let kind = OutcomeKind::of(&result);

        match result {
            Ok(message) => AppOutcome {
                kind,
                message: Some(message),
            },
            Err(err) => {
                self.report(signal, &err);
                AppOutcome { kind, message: None }
            }
        }
    }

    fn report(&self, signal: &CancellationSignal, err: &GreetError) {
        match err {
            GreetError::InvalidName => {
                self.logger
                    .error(signal, format_args!("Invalid name provided: {err}"));
            }
            GreetError::Canceled => {
                self.logger
                    .warning(signal, format_args!("Operation was canceled: {err}"));
            }
            GreetError::DeadlineExceeded => {
                self.logger
                    .warning(signal, format_args!("Operation timed out: {err}"));
            }
            GreetError::Other(_) => {
                self.logger
                    .error(signal, format_args!("Unexpected error: {err}"));
            }
        }
    }
}
