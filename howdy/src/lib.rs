//! # Howdy
//!
//! A cancellable greeting runner with a tag-carrying logger.
//!
//! Howdy demonstrates one pattern: running a single unit of work under a
//! caller-supplied cancellation signal and reporting exactly one typed
//! outcome.
//!
//! - **Cancellation signals**: settle-once handles with deadlines, parent to
//!   child propagation, and correlation tags
//! - **Racing**: work runs on its own task; the first of work or signal to
//!   settle decides the result
//! - **Typed outcomes**: invalid input, cancellation, deadline, and
//!   pass-through failures are distinct variants with stable exit codes
//! - **Context logging**: `LEVEL: [k=v] message` lines through pluggable sinks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use howdy::prelude::*;
//!
//! let (logger, _sink) = howdy::testing::memory_logger();
//! let greeter = Greeter::new(GreeterConfig::default(), logger);
//!
//! let signal = CancellationSignal::new()
//!     .with_request_id("req-123")
//!     .with_timeout(Duration::from_secs(5));
//!
//! let message = greeter.greet(&signal, "Mike").await?;
//! assert_eq!(message, "Howdy Mike!");
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod context;
pub mod errors;
pub mod greeting;
pub mod logging;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::{run_until_settled, CancelReason, CancellationSignal};
    pub use crate::context::{TagCarrier, Tags, REQUEST_ID_KEY, USER_ID_KEY};
    pub use crate::errors::{GreetError, OutcomeKind, RaceError};
    pub use crate::greeting::{format_usd, Greeter, GreeterConfig, GreetingWork, SimulatedWork};
    pub use crate::logging::{ContextLogger, LogSink, MemorySink, Severity, TracingSink, WriterSink};
}
