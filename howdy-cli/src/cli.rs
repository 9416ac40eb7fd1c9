//! Command-line arguments.

use clap::{Parser, ValueEnum};
use howdy::context::generate_request_id;
use howdy::errors::ConfigError;
use howdy::greeting::GreeterConfig;
use std::path::PathBuf;

/// Output format for diagnostic logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Prints a greeting, optionally announcing winnings.
#[derive(Debug, Parser)]
#[command(name = "howdy", version, about)]
pub struct Cli {
    /// Name to greet.
    #[arg(long, env = "HOWDY_NAME", default_value = "Mike")]
    pub name: String,

    /// Winnings to announce, in cents.
    #[arg(long, env = "HOWDY_WINNINGS", value_name = "CENTS")]
    pub winnings: Option<u64>,

    /// Deadline for the greeting, in seconds.
    #[arg(long, env = "HOWDY_TIMEOUT_SECS", value_name = "SECS")]
    pub timeout_secs: Option<f64>,

    /// Simulated work duration, in milliseconds.
    #[arg(long, env = "HOWDY_WORK_MS", value_name = "MILLIS")]
    pub work_ms: Option<u64>,

    /// Request ID tag; generated when absent.
    #[arg(long, env = "HOWDY_REQUEST_ID")]
    pub request_id: Option<String>,

    /// User ID tag.
    #[arg(long, env = "HOWDY_USER_ID")]
    pub user_id: Option<String>,

    /// JSON file with greeter settings. Flags override file values.
    #[arg(long, env = "HOWDY_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Diagnostic log format.
    #[arg(long, env = "HOWDY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Builds the greeter configuration from the config file and flags.
    pub fn greeter_config(&self) -> Result<GreeterConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => GreeterConfig::from_json_file(path)?,
            None => GreeterConfig::default(),
        };
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(secs);
        }
        if let Some(millis) = self.work_ms {
            config = config.with_work_delay_ms(millis);
        }
        config.validate()?;
        Ok(config)
    }

    /// Returns the request ID to tag this run with.
    pub fn request_id(&self) -> String {
        self.request_id.clone().unwrap_or_else(generate_request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["howdy"]).unwrap();
        assert_eq!(cli.name, "Mike");
        assert_eq!(cli.winnings, None);
        assert_eq!(cli.log_format, LogFormat::Text);

        let config = cli.greeter_config().unwrap();
        assert_eq!(config, GreeterConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timeout_seconds": 2.0, "work_delay_ms": 300, "greeting_word": "Hi"}}"#).unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["howdy", "--config", path.as_str(), "--work-ms", "10"]).unwrap();
        let config = cli.greeter_config().unwrap();

        assert_eq!(config.greeting_word, "Hi");
        assert_eq!(config.timeout(), Duration::from_secs(2));
        assert_eq!(config.work_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let cli = Cli::try_parse_from(["howdy", "--timeout-secs", "0"]).unwrap();
        assert!(matches!(cli.greeter_config(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_request_id() {
        let cli = Cli::try_parse_from(["howdy", "--request-id", "req-9"]).unwrap();
        assert_eq!(cli.request_id(), "req-9");

        let generated = Cli::try_parse_from(["howdy"]).unwrap().request_id();
        assert!(!generated.is_empty());
    }

    #[test]
    fn test_winnings_and_json_format() {
        let cli = Cli::try_parse_from([
            "howdy",
            "--name",
            "John",
            "--winnings",
            "1234567",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.name, "John");
        assert_eq!(cli.winnings, Some(1_234_567));
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
