//! Log sink trait and implementations.

use super::Severity;
use crate::context::Tags;
use chrono::Local;
use parking_lot::Mutex;
use std::io::{self, Write};
use tracing::{error, info, warn};

/// Destination for rendered log lines.
///
/// Implementations must tolerate concurrent calls from several threads and
/// must never panic on a failed write; failures are reported through
/// `tracing` and otherwise suppressed.
#[cfg_attr(test, mockall::automock)]
pub trait LogSink: Send + Sync {
    /// Appends one rendered line.
    ///
    /// `tags` are the carrier's tags, already rendered into `line`; sinks
    /// that keep structured fields may record them separately.
    fn write_line(&self, severity: Severity, tags: &Tags, line: &str);

    /// Flushes buffered output. Called before the process terminates.
    fn flush(&self) {}
}

/// A sink that appends lines to any [`Write`] implementation.
///
/// Each line is written under a single exclusive lock, so concurrent lines
/// never interleave.
#[derive(Debug)]
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
    prefix: String,
    timestamps: bool,
}

impl<W: Write + Send> WriterSink<W> {
    /// Creates a sink over `writer` with no prefix and no timestamps.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            prefix: String::new(),
            timestamps: false,
        }
    }

    /// Sets a static prefix written at the start of every line.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enables a local `YYYY/MM/DD HH:MM:SS` timestamp after the prefix.
    #[must_use]
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_record(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        if self.timestamps {
            let now = Local::now().format("%Y/%m/%d %H:%M:%S");
            writeln!(writer, "{}{} {}", self.prefix, now, line)
        } else {
            writeln!(writer, "{}{}", self.prefix, line)
        }
    }
}

impl WriterSink<io::Stderr> {
    /// Creates a timestamped sink over standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr()).with_timestamps(true)
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&self, _severity: Severity, _tags: &Tags, line: &str) {
        if let Err(e) = self.write_record(line) {
            warn!(error = %e, "Failed to write log line");
        }
    }

    fn flush(&self) {
        if let Err(e) = self.writer.lock().flush() {
            warn!(error = %e, "Failed to flush log sink");
        }
    }
}

/// A sink that forwards lines to the `tracing` framework.
///
/// Info lines become `info!` events, warnings `warn!`, and both error and
/// fatal lines `error!`. The carrier's tags are attached as the `tags` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a new tracing sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn write_line(&self, severity: Severity, tags: &Tags, line: &str) {
        match severity {
            Severity::Info => info!(target: "howdy", tags = %tags, "{line}"),
            Severity::Warning => warn!(target: "howdy", tags = %tags, "{line}"),
            Severity::Error | Severity::Fatal => error!(target: "howdy", tags = %tags, "{line}"),
        }
    }
}

/// A collecting sink for testing purposes.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    /// Creates a new, empty memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().iter().map(|(_, line)| line.clone()).collect()
    }

    /// Returns the lines written at `severity`.
    #[must_use]
    pub fn lines_at(&self, severity: Severity) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Returns all lines joined by newlines.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }

    /// Returns the number of collected lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Clears all collected lines.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, severity: Severity, _tags: &Tags, line: &str) {
        self.lines.lock().push((severity, line.to_string()));
    }
}
