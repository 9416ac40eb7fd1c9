//! Process-wide default logger behind an explicit install/teardown lifecycle.

use super::ContextLogger;
use crate::errors::LoggingError;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

static INSTALLED: RwLock<Option<Arc<ContextLogger>>> = parking_lot::const_rwlock(None);
static FALLBACK: OnceLock<Arc<ContextLogger>> = OnceLock::new();

/// Uninstalls the default logger when dropped.
#[derive(Debug)]
#[must_use = "dropping the guard uninstalls the default logger"]
pub struct DefaultLoggerGuard {
    _private: (),
}

impl Drop for DefaultLoggerGuard {
    fn drop(&mut self) {
        INSTALLED.write().take();
    }
}

/// Installs `logger` as the process-wide default.
///
/// # Errors
///
/// Returns [`LoggingError::AlreadyInstalled`] if another guard is alive.
pub fn install_default(logger: Arc<ContextLogger>) -> Result<DefaultLoggerGuard, LoggingError> {
    let mut installed = INSTALLED.write();
    if installed.is_some() {
        return Err(LoggingError::AlreadyInstalled);
    }
    *installed = Some(logger);
    Ok(DefaultLoggerGuard { _private: () })
}

/// Returns the installed default, if any.
#[must_use]
pub fn installed_default() -> Option<Arc<ContextLogger>> {
    INSTALLED.read().clone()
}

/// Returns the installed default, or a stderr logger when none is installed.
#[must_use]
pub fn default_logger() -> Arc<ContextLogger> {
    installed_default()
        .unwrap_or_else(|| FALLBACK.get_or_init(|| Arc::new(ContextLogger::stderr())).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Tags;
    use crate::logging::MemorySink;

    // One test: the default is process-global and tests run in parallel.
    #[test]
    fn test_install_lifecycle() {
        assert!(installed_default().is_none());

        let sink = Arc::new(MemorySink::new());
        let logger = Arc::new(ContextLogger::new(sink.clone()));
        let guard = install_default(logger).unwrap();

        let second = install_default(Arc::new(ContextLogger::new(Arc::new(MemorySink::new()))));
        assert!(matches!(second, Err(LoggingError::AlreadyInstalled)));

        default_logger().info(&Tags::new(), format_args!("via default"));
        assert_eq!(sink.lines(), vec!["INFO: via default".to_string()]);

        drop(guard);
        assert!(installed_default().is_none());

        let again = install_default(Arc::new(ContextLogger::new(sink.clone())));
        assert!(again.is_ok());
    }
}
