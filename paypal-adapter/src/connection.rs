//! PayPal connection factory.
//!
//! Turns the merchant settings stored by the host into a configured
//! [`ApiContext`] and declares the admin form those settings come from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::{Builder, Connection, ConnectionFactory, ElementFactory, Parameters};
use crate::rest::{ApiConfig, ApiContext, CacheConfig, LogConfig, LogLevel, Mode, OAuthTokenCredential};
use crate::{AdapterError, Result};

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "PAYPAL_ADAPTER_CACHE_DIR";

/// SDK log file name inside the cache directory.
pub const LOG_FILE_NAME: &str = "paypal.log";

/// Stored setting keys.
pub mod keys {
    /// `sandbox` or `live`.
    pub const MODE: &str = "mode";
    /// Developer portal client id.
    pub const CLIENT_ID: &str = "client_id";
    /// Developer portal client secret.
    pub const CLIENT_SECRET: &str = "client_secret";
    /// SDK log level.
    pub const LOG_LEVEL: &str = "log_level";
}

/// Typed view of the stored connection settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// PayPal environment.
    pub mode: Mode,
    /// Client id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
    /// SDK log level.
    pub log_level: LogLevel,
}

impl ConnectionConfig {
    /// Read the settings from host parameters.
    ///
    /// A missing mode means sandbox and a missing log level means no
    /// logging. Credentials are required.
    pub fn from_parameters(config: &Parameters) -> Result<Self> {
        let mode = match config.get(keys::MODE) {
            Some(mode) => mode.parse()?,
            None => Mode::default(),
        };
        let log_level = match config.get(keys::LOG_LEVEL) {
            Some(level) => level.parse()?,
            None => LogLevel::default(),
        };
        let client_id = config.get(keys::CLIENT_ID).ok_or_else(|| {
            AdapterError::invalid_config(keys::CLIENT_ID, "client id is required")
        })?;
        let client_secret = config.get(keys::CLIENT_SECRET).ok_or_else(|| {
            AdapterError::invalid_config(keys::CLIENT_SECRET, "client secret is required")
        })?;

        Ok(Self {
            mode,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            log_level,
        })
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("mode", &self.mode)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Connection factory producing [`ApiContext`] connections.
#[derive(Clone, Debug, Default)]
pub struct PaypalConnection {
    cache_dir: Option<PathBuf>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

impl PaypalConnection {
    /// Create a factory using the default cache directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the log file and token cache in `dir`.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Send requests to `endpoint` instead of the mode's PayPal host.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout of created contexts.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Directory holding the log file and token cache.
    ///
    /// Explicit setting first, then [`CACHE_DIR_ENV`], then the system
    /// temp directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .or_else(|| {
                std::env::var_os(CACHE_DIR_ENV)
                    .filter(|dir| !dir.is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Build a context from typed settings.
    pub fn build_context(&self, config: &ConnectionConfig) -> Result<ApiContext> {
        let cache_dir = self.cache_dir();

        let mut api_config = ApiConfig::new(config.mode);
        if let Some(endpoint) = &self.endpoint {
            api_config = api_config.with_endpoint(endpoint.clone());
        }
        if let Some(secs) = self.timeout_secs {
            api_config = api_config.with_timeout(secs);
        }
        if config.log_level.is_enabled() {
            api_config = api_config.with_log(LogConfig::new(
                config.log_level,
                cache_dir.join(LOG_FILE_NAME),
            ));
        }
        api_config = api_config.with_cache(CacheConfig::enabled_in(cache_dir));

        tracing::debug!(
            mode = config.mode.as_str(),
            client_id = %config.client_id,
            log_level = config.log_level.as_str(),
            "building PayPal API context"
        );

        ApiContext::new(
            OAuthTokenCredential::new(config.client_id.clone(), config.client_secret.clone()),
            api_config,
        )
    }
}

impl ConnectionFactory for PaypalConnection {
    fn name(&self) -> &str {
        "Paypal"
    }

    fn get_connection(&self, config: &Parameters) -> Result<Connection> {
        let config = ConnectionConfig::from_parameters(config)?;
        Ok(Arc::new(self.build_context(&config)?))
    }

    fn configure(&self, builder: &mut Builder, elements: &dyn ElementFactory) {
        let modes: Vec<(&str, &str)> = Mode::ALL
            .iter()
            .map(|mode| (mode.as_str(), mode.label()))
            .collect();
        let levels: Vec<(&str, &str)> = LogLevel::ALL
            .iter()
            .map(|level| (level.as_str(), level.as_str()))
            .collect();

        builder.add(elements.new_select(
            keys::MODE,
            "Mode",
            &modes,
            "PayPal provides live and a sandbox environments for API calls. The live environment moves real money while the sandbox environment allows you to test your application with mock money before you go live.",
        ));
        builder.add(elements.new_input(
            keys::CLIENT_ID,
            "Client ID",
            "text",
            "Client id obtained from the developer portal",
        ));
        builder.add(elements.new_input(
            keys::CLIENT_SECRET,
            "Client Secret",
            "password",
            "Client secret obtained from the developer portal",
        ));
        builder.add(elements.new_select(
            keys::LOG_LEVEL,
            "Log level",
            &levels,
            "Requests are logged to paypal.log in the cache directory unless the level is NONE",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DefaultElementFactory, Element};
    use crate::AdapterErrorCode;
    use tempfile::tempdir;

    fn credentials() -> Parameters {
        Parameters::from_iter([
            (keys::CLIENT_ID, "AYSq3RDGsmBLJE-otTkBtM-jBRd1TCQwFf9RGfwddNXWz0uFU9ztymylOhRS"),
            (keys::CLIENT_SECRET, "EGnHDxD_qRPdaLdZz8iCr8N7_MzF-YHPTkjs6NKYQvQSBngp4PTTVWkPZRbL"),
        ])
    }

    #[test]
    fn test_get_connection() {
        let dir = tempdir().unwrap();
        let factory = PaypalConnection::new().with_cache_dir(dir.path());

        let connection = factory.get_connection(&credentials()).unwrap();
        let context = connection.downcast_ref::<ApiContext>().unwrap();

        assert_eq!(context.mode(), Mode::Sandbox);
        assert!(!context.log().is_enabled());
        assert!(context.token_cache().is_some());
    }

    #[test]
    fn test_get_connection_uses_mode() {
        let dir = tempdir().unwrap();
        let factory = PaypalConnection::new().with_cache_dir(dir.path());

        let connection = factory
            .get_connection(&credentials().with(keys::MODE, "live"))
            .unwrap();
        let context = connection.downcast_ref::<ApiContext>().unwrap();
        assert_eq!(context.mode(), Mode::Live);
        assert_eq!(context.config().base_url(), "https://api.paypal.com");
    }

    #[test]
    fn test_get_connection_with_log_level() {
        let dir = tempdir().unwrap();
        let factory = PaypalConnection::new().with_cache_dir(dir.path());

        let connection = factory
            .get_connection(&credentials().with(keys::LOG_LEVEL, "DEBUG"))
            .unwrap();
        let context = connection.downcast_ref::<ApiContext>().unwrap();

        assert!(context.log().is_enabled());
        let log = context.config().log.as_ref().unwrap();
        assert_eq!(log.level, LogLevel::Debug);
        assert_eq!(log.file_name, dir.path().join(LOG_FILE_NAME));
    }

    #[test]
    fn test_get_connection_rejects_bad_config() {
        let factory = PaypalConnection::new();

        let err = factory
            .get_connection(&credentials().with(keys::MODE, "production"))
            .unwrap_err();
        assert_eq!(err.code(), AdapterErrorCode::InvalidConfig);

        let err = factory
            .get_connection(&Parameters::from_iter([(keys::CLIENT_ID, "id")]))
            .unwrap_err();
        assert!(err.to_string().contains("client_secret"));
    }

    #[test]
    fn test_configure() {
        let factory = PaypalConnection::new();
        let mut builder = Builder::new();

        factory.configure(&mut builder, &DefaultElementFactory);

        let elements = builder.form().elements();
        assert_eq!(elements.len(), 4);
        assert!(elements[0].is_select());
        assert!(elements[1].is_input());
        assert!(elements[2].is_input());
        assert!(elements[3].is_select());

        let names: Vec<&str> = elements.iter().map(Element::name).collect();
        assert_eq!(names, vec!["mode", "client_id", "client_secret", "log_level"]);

        match &elements[0] {
            Element::Select(select) => {
                let keys: Vec<&str> = select.options.iter().map(|o| o.key.as_str()).collect();
                assert_eq!(keys, vec!["sandbox", "live"]);
            }
            other => panic!("Expected Select, got {:?}", other),
        }
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = ConnectionConfig::from_parameters(&credentials()).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("EGnHDxD"));
        assert_eq!(config.log_level, LogLevel::None);
    }
}
