use crate::config::{ConfigError, ConfigSource};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";

/// Configuration trait for application configuration
pub trait AppConfigTrait: Sized {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError>;

    /// Get configuration source information for debugging
    fn config_sources(&self) -> HashMap<String, ConfigSource>;
}

/// Environment enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::invalid_value(
                "environment",
                s,
                "development, testing, or production",
            )),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let env_str = match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Production => "production",
        };
        write!(f, "{}", env_str)
    }
}

impl Environment {
    /// Log level used when none is configured
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Testing => "warn",
            Environment::Production => "info",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(LogFormat::Plain),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::invalid_value("log_format", s, "plain, pretty, or json")),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogFormat::Plain => "plain",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        })
    }
}

/// Settings for the AI design service
#[derive(Debug, Clone, PartialEq)]
pub struct DesignConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            timeout_secs: 120,
            connect_timeout_secs: 10,
        }
    }
}

impl DesignConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Top-level configuration for the generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub environment: Environment,
    pub log_level: String,
    pub log_format: LogFormat,
    pub design: DesignConfig,
    sources: HashMap<String, ConfigSource>,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        let environment = Environment::Development;
        Self {
            environment,
            log_level: environment.default_log_level().to_string(),
            log_format: LogFormat::Plain,
            design: DesignConfig::default(),
            sources: HashMap::new(),
        }
    }

    /// Configuration for tests: no API key, quiet logging
    pub fn testing() -> Self {
        let environment = Environment::Testing;
        Self {
            environment,
            log_level: environment.default_log_level().to_string(),
            ..Self::new()
        }
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        let mut sources = HashMap::new();

        let mut read = |var: &str, field: &str| -> Option<String> {
            match lookup(var).filter(|v| !v.trim().is_empty()) {
                Some(value) => {
                    sources.insert(field.to_string(), ConfigSource::EnvVar(var.to_string()));
                    Some(value)
                }
                None => None,
            }
        };

        if let Some(env_str) = read("BDDGEN_ENV", "environment") {
            config.environment = env_str.parse()?;
        }

        config.log_level = read("BDDGEN_LOG", "log_level")
            .unwrap_or_else(|| config.environment.default_log_level().to_string());

        if let Some(format) = read("BDDGEN_LOG_FORMAT", "log_format") {
            config.log_format = format.parse()?;
        }

        config.design.api_key = read("ANTHROPIC_API_KEY", "api_key");

        if let Some(url) = read("BDDGEN_API_URL", "api_url") {
            config.design.api_url = url;
        }

        if let Some(model) = read("BDDGEN_MODEL", "model") {
            config.design.model = model;
        }

        if let Some(value) = read("BDDGEN_MAX_TOKENS", "max_tokens") {
            config.design.max_tokens = parse_number(&value, "max_tokens", "positive integer")?;
        }

        if let Some(value) = read("BDDGEN_TEMPERATURE", "temperature") {
            config.design.temperature =
                parse_number(&value, "temperature", "number between 0.0 and 1.0")?;
        }

        if let Some(value) = read("BDDGEN_TIMEOUT_SECS", "timeout_secs") {
            config.design.timeout_secs = parse_number(&value, "timeout_secs", "seconds")?;
        }

        if let Some(value) = read("BDDGEN_CONNECT_TIMEOUT_SECS", "connect_timeout_secs") {
            config.design.connect_timeout_secs =
                parse_number(&value, "connect_timeout_secs", "seconds")?;
        }

        config.sources = sources;
        Ok(config)
    }

    /// Record an override applied from a command line flag
    pub fn set_flag_source(&mut self, field: &str, flag: &str) {
        self.sources
            .insert(field.to_string(), ConfigSource::Flag(flag.to_string()));
    }

    pub fn ai_enabled(&self) -> bool {
        self.design.has_api_key()
    }
}

fn parse_number<T: FromStr>(value: &str, field: &str, expected: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid_value(field, value, expected))
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfigTrait for GeneratorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let api_url = url::Url::parse(&self.design.api_url).ok();
        if !api_url.is_some_and(|url| matches!(url.scheme(), "http" | "https")) {
            return Err(ConfigError::invalid_value(
                "api_url",
                &self.design.api_url,
                "absolute http(s) URL",
            ));
        }

        if !(0.0..=1.0).contains(&self.design.temperature) {
            return Err(ConfigError::invalid_value(
                "temperature",
                self.design.temperature.to_string(),
                "number between 0.0 and 1.0",
            ));
        }

        if self.design.max_tokens == 0 {
            return Err(ConfigError::validation_failed("max_tokens must be greater than zero"));
        }

        if self.design.timeout_secs == 0 || self.design.connect_timeout_secs == 0 {
            return Err(ConfigError::validation_failed("timeouts must be greater than zero"));
        }

        if self.design.model.trim().is_empty() {
            return Err(ConfigError::missing_required(
                "model",
                "Set BDDGEN_MODEL to a model identifier",
            ));
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = self.sources.clone();
        for (field, default) in [
            ("environment", self.environment.to_string()),
            ("api_url", DEFAULT_API_URL.to_string()),
            ("model", DEFAULT_MODEL.to_string()),
            ("timeout_secs", DesignConfig::default().timeout_secs.to_string()),
        ] {
            sources
                .entry(field.to_string())
                .or_insert(ConfigSource::Default(default));
        }
        sources
    }
}
