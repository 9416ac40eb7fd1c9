//! The cancellable greeting runner.

use super::{format_usd, GreeterConfig, GreetingWork, SimulatedWork};
use crate::cancellation::{run_until_settled, CancelReason, CancellationSignal};
use crate::errors::{GreetError, RaceError};
use crate::logging::ContextLogger;
use std::sync::Arc;
use tracing::debug;

/// Produces greetings under a cancellation signal.
///
/// Each call makes a single attempt and returns exactly one outcome:
///
/// 1. An empty name fails with [`GreetError::InvalidName`] before the signal
///    is consulted.
/// 2. A signal that has already settled fails with the matching error and
///    no work is started.
/// 3. Otherwise the work runs on its own task while the caller waits for
///    either the work or the signal. Whichever settles first decides the
///    outcome; the loser is discarded.
///
/// Progress is reported through the [`ContextLogger`], tagged with the
/// signal's tags.
pub struct Greeter {
    config: GreeterConfig,
    logger: Arc<ContextLogger>,
    work: Arc<dyn GreetingWork>,
}

impl Greeter {
    /// Creates a greeter whose work is a delay of `config.work_delay()`.
    #[must_use]
    pub fn new(config: GreeterConfig, logger: Arc<ContextLogger>) -> Self {
        let work = Arc::new(SimulatedWork::new(config.work_delay()));
        Self {
            config,
            logger,
            work,
        }
    }

    /// Replaces the unit of work.
    #[must_use]
    pub fn with_work(mut self, work: Arc<dyn GreetingWork>) -> Self {
        self.work = work;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GreeterConfig {
        &self.config
    }

    /// Greets `name`, e.g. `Howdy John!`.
    pub async fn greet(&self, signal: &CancellationSignal, name: &str) -> Result<String, GreetError> {
        self.run(signal, name, None).await
    }

    /// Greets `name` and announces winnings given in cents, e.g.
    /// `Howdy John! You have won $12,345.67 USD!`.
    pub async fn greet_with_winnings(
        &self,
        signal: &CancellationSignal,
        name: &str,
        winnings_cents: u64,
    ) -> Result<String, GreetError> {
        self.run(signal, name, Some(winnings_cents)).await
    }

    async fn run(
        &self,
        signal: &CancellationSignal,
        name: &str,
        winnings_cents: Option<u64>,
    ) -> Result<String, GreetError> {
        if name.is_empty() {
            self.logger
                .warning(signal, format_args!("Invalid name provided: empty string"));
            return Err(GreetError::InvalidName);
        }

        if let Some(reason) = signal.reason() {
            return Err(self.interrupted(signal, reason, "before processing"));
        }

        self.logger
            .info(signal, format_args!("Generating greeting for '{name}'"));

        let message = self.render(name, winnings_cents);
        let work = Arc::clone(&self.work);
        let owned_name = name.to_string();
        let outcome = run_until_settled(signal, async move {
            work.perform(&owned_name).await;
            message
        })
        .await;

        match outcome {
            Ok(message) => {
                self.logger
                    .info(signal, format_args!("Generated greeting: {message}"));
                Ok(message)
            }
            Err(RaceError::Settled(reason)) => Err(self.interrupted(signal, reason, "during processing")),
            Err(RaceError::Worker(join_error)) => {
                self.logger
                    .error(signal, format_args!("Greeting worker failed: {join_error}"));
                Err(GreetError::other(join_error))
            }
        }
    }

    fn render(&self, name: &str, winnings_cents: Option<u64>) -> String {
        let word = &self.config.greeting_word;
        match winnings_cents {
            Some(cents) => format!("{word} {name}! You have won {} USD!", format_usd(cents)),
            None => format!("{word} {name}!"),
        }
    }

    fn interrupted(&self, signal: &CancellationSignal, reason: CancelReason, phase: &str) -> GreetError {
        debug!(reason = %reason, phase, "Greeting interrupted");
        match &reason {
            CancelReason::Canceled => {
                self.logger
                    .warning(signal, format_args!("Operation was canceled {phase}: {reason}"));
            }
            CancelReason::DeadlineExceeded => {
                self.logger
                    .warning(signal, format_args!("Deadline exceeded {phase}: {reason}"));
            }
            CancelReason::Other(error) => {
                self.logger
                    .error(signal, format_args!("Signal error {phase}: {error}"));
            }
        }
        GreetError::from(reason)
    }
}

impl std::fmt::Debug for Greeter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Greeter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::OutcomeKind;
    use crate::logging::Severity;
    use crate::testing::{memory_logger, PanickingWork, PendingWork, RecordingWork};
    use pretty_assertions::assert_eq;
    use std::io;
    use std::time::Duration;
    use tokio::time::Instant;

    fn greeter() -> (Greeter, Arc<crate::logging::MemorySink>) {
        let (logger, sink) = memory_logger();
        (Greeter::new(GreeterConfig::default(), logger), sink)
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_input() {
        let (greeter, sink) = greeter();
        let signal = CancellationSignal::new();

        let result = greeter.greet(&signal, "John").await;

        assert_eq!(result.unwrap(), "Howdy John!");
        assert_eq!(
            sink.lines_at(Severity::Info),
            vec![
                "INFO: Generating greeting for 'John'".to_string(),
                "INFO: Generated greeting: Howdy John!".to_string(),
            ]
        );
        assert!(sink.lines_at(Severity::Warning).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mike_within_deadline_exits_zero() {
        let (greeter, _sink) = greeter();
        let signal = CancellationSignal::new().with_timeout(Duration::from_secs(5));

        let result = greeter.greet(&signal, "Mike").await;

        assert_eq!(OutcomeKind::of(&result), OutcomeKind::Succeeded);
        assert_eq!(OutcomeKind::of(&result).exit_code(), 0);
        assert_eq!(result.unwrap(), "Howdy Mike!");
    }

    #[tokio::test]
    async fn test_empty_name_precedes_signal_check() {
        let (logger, sink) = memory_logger();
        let work = Arc::new(RecordingWork::new());
        let greeter = Greeter::new(GreeterConfig::default(), logger).with_work(work.clone());

        let signal = CancellationSignal::new();
        signal.cancel();

        let result = greeter.greet(&signal, "").await;

        assert!(matches!(result, Err(GreetError::InvalidName)));
        assert_eq!(OutcomeKind::of(&result).exit_code(), 1);
        assert!(sink.lines_at(Severity::Info).is_empty());
        assert_eq!(
            sink.lines_at(Severity::Warning),
            vec!["WARNING: Invalid name provided: empty string".to_string()]
        );
        assert_eq!(work.call_count(), 0);
    }

    #[tokio::test]
    async fn test_canceled_before_call_starts_no_work() {
        let (logger, sink) = memory_logger();
        let work = Arc::new(RecordingWork::new());
        let greeter = Greeter::new(GreeterConfig::default(), logger).with_work(work.clone());

        let signal = CancellationSignal::new();
        signal.cancel();

        let result = greeter.greet(&signal, "John").await;

        assert!(matches!(result, Err(GreetError::Canceled)));
        assert_eq!(work.call_count(), 0);
        assert!(sink.lines_at(Severity::Info).is_empty());
        assert_eq!(sink.lines_at(Severity::Warning).len(), 1);
        assert!(sink.contents().contains("before processing"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded_before_call() {
        let (greeter, sink) = greeter();
        let signal = CancellationSignal::new().with_deadline(Instant::now());

        let result = greeter.greet(&signal, "John").await;

        assert!(matches!(result, Err(GreetError::DeadlineExceeded)));
        assert!(sink.lines_at(Severity::Info).is_empty());
        assert!(sink.contents().contains("Deadline exceeded before processing"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_canceled_during_processing() {
        let (greeter, sink) = greeter();
        let signal = CancellationSignal::new();

        let canceller = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result = greeter.greet(&signal, "John").await;

        assert!(matches!(result, Err(GreetError::Canceled)));
        assert_eq!(OutcomeKind::of(&result).exit_code(), 2);
        assert!(sink.contents().contains("canceled during processing"));
        assert!(!sink.contents().contains("Generated greeting"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded_during_processing() {
        let (greeter, sink) = greeter();
        let signal = CancellationSignal::new().with_timeout(Duration::from_millis(50));

        let result = greeter.greet(&signal, "John").await;

        assert!(matches!(result, Err(GreetError::DeadlineExceeded)));
        assert_eq!(OutcomeKind::of(&result).exit_code(), 3);
        assert_eq!(sink.lines_at(Severity::Warning).len(), 1);
        assert!(sink.contents().contains("Deadline exceeded during processing"));
    }

    #[tokio::test]
    async fn test_other_reason_passes_through() {
        let (greeter, sink) = greeter();
        let signal = CancellationSignal::new();
        signal.settle(CancelReason::other(io::Error::other("custom error")));

        let result = greeter.greet(&signal, "John").await;

        match result {
            Err(GreetError::Other(error)) => assert_eq!(error.to_string(), "custom error"),
            other => panic!("expected passthrough error, got {other:?}"),
        }
        assert_eq!(sink.lines_at(Severity::Error).len(), 1);
    }

    #[tokio::test]
    async fn test_other_reason_during_processing() {
        let (logger, sink) = memory_logger();
        let greeter = Greeter::new(GreeterConfig::default(), logger).with_work(Arc::new(PendingWork));
        let signal = CancellationSignal::new();

        let settler = signal.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            settler.settle(CancelReason::other(io::Error::other("broken pipe")));
        });

        let result = greeter.greet(&signal, "John").await;

        assert_eq!(OutcomeKind::of(&result).exit_code(), 4);
        assert!(sink.contents().contains("Signal error during processing: broken pipe"));
    }

    #[tokio::test]
    async fn test_worker_panic_is_other() {
        let (logger, sink) = memory_logger();
        let greeter = Greeter::new(GreeterConfig::default(), logger)
            .with_work(Arc::new(PanickingWork::new("work exploded")));

        let result = greeter.greet(&CancellationSignal::new(), "John").await;

        assert!(matches!(result, Err(GreetError::Other(_))));
        assert!(sink.contents().contains("Greeting worker failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tags_in_every_line() {
        let (greeter, sink) = greeter();
        let signal = CancellationSignal::new()
            .with_request_id("req-123")
            .with_timeout(Duration::from_millis(50));

        let _ = greeter.greet(&signal, "John").await;

        assert!(sink.len() >= 2);
        assert!(sink.lines().iter().all(|line| line.contains("request_id=req-123")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_winnings() {
        let (greeter, _sink) = greeter();

        let message = greeter
            .greet_with_winnings(&CancellationSignal::new(), "John", 1_234_567)
            .await
            .unwrap();

        assert_eq!(message, "Howdy John! You have won $12,345.67 USD!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_greeting_word_and_recorded_name() {
        let (logger, _sink) = memory_logger();
        let work = Arc::new(RecordingWork::with_delay(Duration::from_millis(5)));
        let greeter = Greeter::new(GreeterConfig::new().with_greeting_word("Hello"), logger)
            .with_work(work.clone());

        let message = greeter.greet(&CancellationSignal::new(), "Alice").await.unwrap();

        assert_eq!(message, "Hello Alice!");
        assert_eq!(work.recorded_names(), vec!["Alice".to_string()]);
    }
}
