//! Logging setup for the CLI.
//!
//! stdout is reserved for the JSON payload, so every format writes to stderr.

use bddgen_core::{Environment, GeneratorConfig, LogFormat};
use std::io;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Logging configuration for the CLI
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    pub format: LogFormat,
    /// Include file and line number information
    pub include_location: bool,
    pub include_timestamp: bool,
    /// Directive string used instead of `level`, e.g. "bddgen_analyzer=debug,warn"
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
            include_location: false,
            include_timestamp: true,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            include_location: false,
            include_timestamp: true,
            env_filter: Some(
                "warn,bddgen=info,bddgen_analyzer=info,bddgen_designer=info".to_string(),
            ),
        }
    }

    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            include_timestamp: true,
            env_filter: Some(
                "info,bddgen=debug,bddgen_analyzer=debug,bddgen_designer=debug".to_string(),
            ),
        }
    }

    /// Minimal output
    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            format: LogFormat::Plain,
            include_location: false,
            include_timestamp: false,
            env_filter: None,
        }
    }

    /// Environment preset, with explicitly configured level and format applied on top
    pub fn for_config(config: &GeneratorConfig) -> Self {
        let mut logging = match config.environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
            Environment::Testing => Self::test(),
        };

        if config.log_level != config.environment.default_log_level() {
            logging.level = config.log_level.clone();
            logging.env_filter = None;
        }
        let sources = bddgen_core::AppConfigTrait::config_sources(config);
        if sources.contains_key("log_format") {
            logging.format = config.log_format;
        }
        logging
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn directives(&self) -> &str {
        self.env_filter.as_deref().unwrap_or(&self.level)
    }
}

type FmtLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Install the global subscriber. `RUST_LOG` takes precedence over the config.
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(config.directives()))?;

    let base = fmt::layer()
        .with_writer(io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    let layer: FmtLayer = match (config.format, config.include_timestamp) {
        (LogFormat::Json, _) => base.json().boxed(),
        (LogFormat::Pretty, _) => base.pretty().boxed(),
        (LogFormat::Plain, true) => base.boxed(),
        (LogFormat::Plain, false) => base.without_time().boxed(),
    };

    tracing_subscriber::registry().with(filter).with(layer).try_init()?;

    tracing::debug!(
        level = %config.level,
        format = %config.format,
        "logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(LoggingConfig::production().format, LogFormat::Json);
        assert!(LoggingConfig::development().include_location);
        assert_eq!(LoggingConfig::test().level, "error");
        assert_eq!(LoggingConfig::test().directives(), "error");
    }

    #[test]
    fn test_for_config_uses_environment_preset() {
        let config = GeneratorConfig::testing();
        assert_eq!(LoggingConfig::for_config(&config), LoggingConfig::test());
    }

    #[test]
    fn test_explicit_level_and_format_override_preset() {
        let config = GeneratorConfig::from_lookup(|var| match var {
            "BDDGEN_ENV" => Some("production".into()),
            "BDDGEN_LOG" => Some("trace".into()),
            "BDDGEN_LOG_FORMAT" => Some("plain".into()),
            _ => None,
        })
        .unwrap();

        let logging = LoggingConfig::for_config(&config);
        assert_eq!(logging.level, "trace");
        assert_eq!(logging.directives(), "trace");
        assert_eq!(logging.format, LogFormat::Plain);
    }

    #[test]
    fn test_env_filter_wins_over_level() {
        let logging = LoggingConfig::default().with_env_filter("bddgen=trace");
        assert_eq!(logging.directives(), "bddgen=trace");
    }
}
