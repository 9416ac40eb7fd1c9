//! Error types for the howdy crate.
//!
//! Every outcome of a greeting attempt maps onto [`OutcomeKind`], which in
//! turn carries the stable process exit code used by the command line front
//! end. Callers branch on variants, never on message text.

use crate::cancellation::CancelReason;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// A cloneable, type-erased error shared between a signal and its observers.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by a greeting attempt.
#[derive(Debug, Clone, Error)]
pub enum GreetError {
    /// The provided name was empty.
    #[error("name cannot be empty")]
    InvalidName,

    /// The signal was canceled before the work completed.
    #[error("operation was canceled")]
    Canceled,

    /// The signal's deadline elapsed before the work completed.
    #[error("operation timed out")]
    DeadlineExceeded,

    /// Any other failure, passed through unclassified.
    #[error(transparent)]
    Other(SharedError),
}

impl GreetError {
    /// Wraps an arbitrary error in the `Other` variant.
    #[must_use]
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Arc::new(error))
    }

    /// Returns the terminal state this error represents.
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::InvalidName => OutcomeKind::InvalidInput,
            Self::Canceled => OutcomeKind::Canceled,
            Self::DeadlineExceeded => OutcomeKind::DeadlineExceeded,
            Self::Other(_) => OutcomeKind::Failed,
        }
    }

    /// Returns true for conditions driven by the environment rather than a bug.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::Canceled | Self::DeadlineExceeded)
    }
}

impl From<CancelReason> for GreetError {
    fn from(reason: CancelReason) -> Self {
        match reason {
            CancelReason::Canceled => Self::Canceled,
            CancelReason::DeadlineExceeded => Self::DeadlineExceeded,
            CancelReason::Other(error) => Self::Other(error),
        }
    }
}

/// The terminal states of a greeting attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// The work completed first.
    Succeeded,
    /// The input was rejected before anything ran.
    InvalidInput,
    /// The signal was canceled.
    Canceled,
    /// The signal's deadline elapsed.
    DeadlineExceeded,
    /// Anything else.
    Failed,
}

impl OutcomeKind {
    /// Classifies a greeting result.
    #[must_use]
    pub fn of<T>(result: &Result<T, GreetError>) -> Self {
        match result {
            Ok(_) => Self::Succeeded,
            Err(err) => err.kind(),
        }
    }

    /// Returns the process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Succeeded => 0,
            Self::InvalidInput => 1,
            Self::Canceled => 2,
            Self::DeadlineExceeded => 3,
            Self::Failed => 4,
        }
    }
}

/// Outcome of racing a worker against a cancellation signal, when the
/// worker did not produce a value.
#[derive(Debug, Error)]
pub enum RaceError {
    /// The signal settled before the worker finished.
    #[error("signal settled first: {0}")]
    Settled(CancelReason),

    /// The worker panicked or was aborted from outside.
    #[error("worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Errors raised by the logging facade.
#[derive(Debug, Clone, Error)]
pub enum LoggingError {
    /// A process-wide default logger is already installed.
    #[error("a default logger is already installed")]
    AlreadyInstalled,
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
