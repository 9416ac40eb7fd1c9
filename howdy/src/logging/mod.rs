//! Tag-aware logging facade.
//!
//! [`ContextLogger`] renders `LEVEL: [k=v ...] message` lines using the tags
//! of whatever carrier it is handed, usually a
//! [`CancellationSignal`](crate::cancellation::CancellationSignal), and writes
//! each line to a [`LogSink`].
//!
//! Loggers are passed explicitly. A process-wide default exists only between
//! [`install_default`] and the drop of the guard it returns.

mod default;
mod logger;
mod sink;

pub use default::{default_logger, install_default, installed_default, DefaultLoggerGuard};
pub use logger::{ContextLogger, Severity};
pub use sink::{LogSink, MemorySink, TracingSink, WriterSink};
