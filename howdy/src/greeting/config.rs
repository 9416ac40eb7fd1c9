//! Configuration for the greeter.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Longest accepted timeout: one year.
pub const MAX_TIMEOUT_SECONDS: f64 = 365.0 * 24.0 * 60.0 * 60.0;

/// Configuration for a [`Greeter`](super::Greeter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreeterConfig {
    /// Simulated work duration in milliseconds.
    #[serde(default = "default_work_delay_ms")]
    pub work_delay_ms: u64,
    /// Deadline applied by callers, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: f64,
    /// The word the greeting opens with.
    #[serde(default = "default_greeting_word")]
    pub greeting_word: String,
}

fn default_work_delay_ms() -> u64 {
    100
}

fn default_timeout_seconds() -> f64 {
    5.0
}

fn default_greeting_word() -> String {
    "Howdy".to_string()
}

impl Default for GreeterConfig {
    fn default() -> Self {
        Self {
            work_delay_ms: default_work_delay_ms(),
            timeout_seconds: default_timeout_seconds(),
            greeting_word: default_greeting_word(),
        }
    }
}

impl GreeterConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Sets the simulated work duration.
    #[must_use]
    pub fn with_work_delay_ms(mut self, millis: u64) -> Self {
        self.work_delay_ms = millis;
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the greeting word.
    #[must_use]
    pub fn with_greeting_word(mut self, word: impl Into<String>) -> Self {
        self.greeting_word = word.into();
        self
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.timeout_seconds.is_finite() || self.timeout_seconds <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "timeout_seconds must be a positive number, got {}",
                self.timeout_seconds
            )));
        }
        if self.timeout_seconds > MAX_TIMEOUT_SECONDS
            || Duration::try_from_secs_f64(self.timeout_seconds).is_err()
        {
            return Err(ConfigError::Invalid(format!(
                "timeout_seconds must be at most {MAX_TIMEOUT_SECONDS}, got {}",
                self.timeout_seconds
            )));
        }
        if self.greeting_word.trim().is_empty() {
            return Err(ConfigError::Invalid("greeting_word cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Gets the work delay as a Duration.
    #[must_use]
    pub fn work_delay(&self) -> Duration {
        Duration::from_millis(self.work_delay_ms)
    }

    /// Gets the timeout as a Duration.
    ///
    /// Out-of-range values saturate: non-positive or NaN to zero, too large
    /// to [`Duration::MAX`]. [`validate`](Self::validate) rejects both.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        match Duration::try_from_secs_f64(self.timeout_seconds) {
            Ok(timeout) => timeout,
            Err(_) if self.timeout_seconds > 0.0 => Duration::MAX,
            Err(_) => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GreeterConfig::default();
        assert_eq!(config.work_delay(), Duration::from_millis(100));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.greeting_word, "Howdy");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GreeterConfig::from_json_str(r#"{"greeting_word": "Hello"}"#).unwrap();
        assert_eq!(config.greeting_word, "Hello");
        assert_eq!(config.work_delay_ms, 100);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GreeterConfig::from_json_str(r#"{"timeout_seconds": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GreeterConfig::new().with_greeting_word("  ").validate().unwrap_err();
        assert!(err.to_string().contains("greeting_word"));
    }

    #[test]
    fn test_huge_timeout_rejected() {
        for json in [r#"{"timeout_seconds": 1e20}"#, r#"{"timeout_seconds": 1e19}"#] {
            let err = GreeterConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{json}");
        }

        let at_limit = GreeterConfig::new().with_timeout(MAX_TIMEOUT_SECONDS);
        assert!(at_limit.validate().is_ok());
        assert!(at_limit.with_timeout(MAX_TIMEOUT_SECONDS + 1.0).validate().is_err());
    }

    #[test]
    fn test_timeout_saturates_without_validation() {
        assert_eq!(GreeterConfig::new().with_timeout(1e20).timeout(), Duration::MAX);
        assert_eq!(GreeterConfig::new().with_timeout(-1.0).timeout(), Duration::ZERO);
        assert_eq!(GreeterConfig::new().with_timeout(f64::NAN).timeout(), Duration::ZERO);
    }

    #[test]
    fn test_malformed_json() {
        let err = GreeterConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"work_delay_ms": 5, "timeout_seconds": 1.5}}"#).unwrap();

        let config = GreeterConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.work_delay(), Duration::from_millis(5));
        assert_eq!(config.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GreeterConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
