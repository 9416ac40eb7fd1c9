//! The tag-aware context logger.

use super::sink::{LogSink, WriterSink};
use crate::context::TagCarrier;
use std::fmt;
use std::sync::Arc;

/// Log severities, in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Normal progress.
    Info,
    /// Unusual but expected conditions.
    Warning,
    /// A failed operation the process survives.
    Error,
    /// A failure the process does not survive.
    Fatal,
}

impl Severity {
    /// Returns the label written at the start of each line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A logger that prefixes each line with the tags of the carrier it is given.
///
/// Lines have the shape `LEVEL: [k=v k2=v2] message`; the bracketed part is
/// omitted when the carrier has no tags to show. The logger holds no state
/// besides its sink and is cheap to share behind an `Arc`.
///
/// ```
/// use std::sync::Arc;
/// use howdy::cancellation::CancellationSignal;
/// use howdy::logging::{ContextLogger, MemorySink};
///
/// let sink = Arc::new(MemorySink::new());
/// let logger = ContextLogger::new(sink.clone());
/// let signal = CancellationSignal::new().with_request_id("req-123");
///
/// logger.info(&signal, format_args!("Processing item {}", 7));
/// assert_eq!(sink.lines(), vec!["INFO: [request_id=req-123] Processing item 7"]);
/// ```
#[derive(Clone)]
pub struct ContextLogger {
    sink: Arc<dyn LogSink>,
}

impl ContextLogger {
    /// Creates a logger writing to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Creates a logger writing timestamped lines to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Arc::new(WriterSink::stderr()))
    }

    /// Renders a line without writing it.
    #[must_use]
    pub fn render<C>(severity: Severity, carrier: &C, args: fmt::Arguments<'_>) -> String
    where
        C: TagCarrier + ?Sized,
    {
        format!("{}: {}{}", severity.label(), carrier.tags().render_prefix(), args)
    }

    /// Writes one line at `severity`.
    pub fn log<C>(&self, severity: Severity, carrier: &C, args: fmt::Arguments<'_>)
    where
        C: TagCarrier + ?Sized,
    {
        let tags = carrier.tags();
        let line = Self::render(severity, carrier, args);
        self.sink.write_line(severity, tags, &line);
    }

    /// Logs normal progress.
    pub fn info<C: TagCarrier + ?Sized>(&self, carrier: &C, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, carrier, args);
    }

    /// Logs an unusual but expected condition.
    pub fn warning<C: TagCarrier + ?Sized>(&self, carrier: &C, args: fmt::Arguments<'_>) {
        self.log(Severity::Warning, carrier, args);
    }

    /// Logs a failed operation.
    pub fn error<C: TagCarrier + ?Sized>(&self, carrier: &C, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, carrier, args);
    }

    /// Logs a fatal condition, flushes the sink, and exits the process with
    /// status 1.
    ///
    /// This never returns and skips every destructor on the stack. It belongs
    /// in a binary's top-level error policy only; library code must return
    /// errors instead.
    pub fn fatal<C: TagCarrier + ?Sized>(&self, carrier: &C, args: fmt::Arguments<'_>) -> ! {
        self.log(Severity::Fatal, carrier, args);
        self.sink.flush();
        std::process::exit(1)
    }
}

impl fmt::Debug for ContextLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextLogger").finish_non_exhaustive()
    }
}
