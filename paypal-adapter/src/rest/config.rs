//! Configuration types for the PayPal API context.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

use crate::AdapterError;

/// PayPal environment selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Sandbox environment, moves mock money.
    #[default]
    Sandbox,
    /// Live environment, moves real money.
    Live,
}

impl Mode {
    /// All modes, in form display order.
    pub const ALL: [Mode; 2] = [Mode::Sandbox, Mode::Live];

    /// Stored value of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Live => "live",
        }
    }

    /// Label shown in the admin form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sandbox => "Sandbox",
            Self::Live => "Live",
        }
    }

    /// REST API base URL of the environment.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://api.sandbox.paypal.com",
            Self::Live => "https://api.paypal.com",
        }
    }
}

impl FromStr for Mode {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "live" => Ok(Self::Live),
            other => Err(AdapterError::invalid_config(
                "mode",
                format!("unknown mode '{}', expected sandbox or live", other),
            )),
        }
    }
}

/// Verbosity of the per-connection SDK log file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// File logging disabled.
    #[default]
    None,
    /// Request and response bodies.
    Debug,
    /// One line per request.
    Info,
    /// Failed requests and cache problems.
    Warning,
    /// Failed requests only.
    Error,
}

impl LogLevel {
    /// All levels, in form display order.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::None,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
    ];

    /// Stored value of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Returns true unless logging is switched off.
    pub fn is_enabled(&self) -> bool {
        *self != Self::None
    }

    /// Equivalent `tracing` filter.
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Self::None => LevelFilter::OFF,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warning => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "NONE" => Ok(Self::None),
            // FINE is the legacy SDK spelling of DEBUG
            "DEBUG" | "FINE" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            other => Err(AdapterError::invalid_config(
                "log_level",
                format!("unknown log level '{}'", other),
            )),
        }
    }
}

/// SDK log file settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level written to the file.
    pub level: LogLevel,
    /// Log file path.
    pub file_name: PathBuf,
}

impl LogConfig {
    /// Create a log configuration.
    pub fn new(level: LogLevel, file_name: impl Into<PathBuf>) -> Self {
        Self {
            level,
            file_name: file_name.into(),
        }
    }
}

/// File-backed token cache settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether tokens are persisted between connections.
    pub enabled: bool,
    /// Directory holding the cache file.
    pub directory: PathBuf,
}

impl CacheConfig {
    /// Enable the cache in a directory.
    pub fn enabled_in(directory: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            directory: directory.into(),
        }
    }

    /// Cache directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Settings of an [`ApiContext`](super::ApiContext).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// PayPal environment.
    #[serde(default)]
    pub mode: Mode,

    /// Overrides the environment's base URL (proxies, mock servers).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// SDK log file, disabled when absent.
    #[serde(default)]
    pub log: Option<LogConfig>,

    /// Token cache, in-memory only when absent.
    #[serde(default)]
    pub cache: Option<CacheConfig>,
}

fn default_timeout() -> u64 {
    30
}

impl ApiConfig {
    /// Create a configuration for an environment.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            endpoint: None,
            timeout_secs: default_timeout(),
            log: None,
            cache: None,
        }
    }

    /// Override the base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Enable the SDK log file.
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = Some(log);
        self
    }

    /// Enable the token cache.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Base URL requests are sent to, without trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.mode.endpoint())
            .trim_end_matches('/')
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("sandbox".parse::<Mode>().unwrap(), Mode::Sandbox);
        assert_eq!("LIVE".parse::<Mode>().unwrap(), Mode::Live);
        assert!("production".parse::<Mode>().is_err());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("".parse::<LogLevel>().unwrap(), LogLevel::None);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("FINE".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("TRACE".parse::<LogLevel>().is_err());
        assert!(!LogLevel::None.is_enabled());
        assert_eq!(LogLevel::Error.level_filter(), LevelFilter::ERROR);
    }

    #[test]
    fn test_api_config_base_url() {
        let config = ApiConfig::new(Mode::Live);
        assert_eq!(config.base_url(), "https://api.paypal.com");

        let config = ApiConfig::new(Mode::Sandbox)
            .with_endpoint("http://127.0.0.1:9000/")
            .with_timeout(5);
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_api_config_defaults_from_json() {
        let config: ApiConfig = serde_json::from_str(r#"{"mode":"live"}"#).unwrap();
        assert_eq!(config.mode, Mode::Live);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.log.is_none());
        assert!(config.cache.is_none());
    }
}
