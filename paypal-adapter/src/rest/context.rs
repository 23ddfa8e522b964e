//! Authenticated PayPal REST client.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use super::config::{ApiConfig, Mode};
use super::credential::{AccessToken, OAuthTokenCredential};
use super::log::SdkLog;
use super::token_cache::TokenCache;
use crate::{AdapterError, Result};

const TOKEN_PATH: &str = "/v1/oauth2/token";

/// Configured, authenticated PayPal API client.
///
/// This is the connection object a [`PaypalConnection`](crate::PaypalConnection)
/// hands to the host. It owns the OAuth credential, the HTTP client, the
/// optional SDK log file and the optional token cache.
#[derive(Debug)]
pub struct ApiContext {
    credential: OAuthTokenCredential,
    config: ApiConfig,
    client: reqwest::Client,
    log: SdkLog,
    cache: Option<TokenCache>,
}

impl ApiContext {
    /// Create a context from a credential and configuration.
    pub fn new(credential: OAuthTokenCredential, config: ApiConfig) -> Result<Self> {
        if credential.client_id().is_empty() {
            return Err(AdapterError::invalid_config(
                "client_id",
                "client id cannot be empty",
            ));
        }
        if credential.client_secret().is_empty() {
            return Err(AdapterError::invalid_config(
                "client_secret",
                "client secret cannot be empty",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdapterError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let log = match &config.log {
            Some(log) => SdkLog::to_file(log)?,
            None => SdkLog::disabled(),
        };

        let cache = config
            .cache
            .as_ref()
            .filter(|cache| cache.enabled)
            .map(|cache| TokenCache::new(cache.directory()));

        Ok(Self {
            credential,
            config,
            client,
            log,
            cache,
        })
    }

    /// The OAuth credential.
    pub fn credential(&self) -> &OAuthTokenCredential {
        &self.credential
    }

    /// The configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The PayPal environment.
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// The SDK log.
    pub fn log(&self) -> &SdkLog {
        &self.log
    }

    /// The token cache, if enabled.
    pub fn token_cache(&self) -> Option<&TokenCache> {
        self.cache.as_ref()
    }

    /// Build the full URL for an API path.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Return a usable bearer token.
    ///
    /// Looks at the token held in memory, then at the token cache, and
    /// only then exchanges the client credentials for a new token.
    pub async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.credential.current_token().await {
            return Ok(token.access_token);
        }

        let client_id = self.credential.client_id();
        let client_secret = self.credential.client_secret();
        if let Some(token) = self
            .cache
            .as_ref()
            .and_then(|cache| cache.load(client_id, client_secret))
            .filter(AccessToken::is_fresh)
        {
            tracing::debug!(client_id, "using cached access token");
            self.credential.remember(token.clone()).await;
            return Ok(token.access_token);
        }

        let token = self.fetch_token().await?;
        if let Some(cache) = &self.cache {
            if let Err(err) = cache.store(client_id, client_secret, &token) {
                tracing::warn!(client_id, "failed to persist access token: {}", err);
                self.log.warn(&format!("failed to persist access token: {}", err));
            }
        }
        self.credential.remember(token.clone()).await;
        Ok(token.access_token)
    }

    /// Exchange the client credentials for a new token.
    async fn fetch_token(&self) -> Result<AccessToken> {
        let url = self.url(TOKEN_PATH);
        tracing::debug!(%url, "requesting access token");
        self.log.info(&format!("POST {}", url));

        let response = self
            .client
            .post(&url)
            .basic_auth(
                self.credential.client_id(),
                Some(self.credential.client_secret()),
            )
            .header("Accept", "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AdapterError::Serialization(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            self.log
                .error(&format!("token request failed ({}): {}", status.as_u16(), body));
            let error = ErrorBody::parse(&body);
            return Err(AdapterError::Auth(
                error
                    .description()
                    .unwrap_or_else(|| format!("token request failed with {}", status)),
            ));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            AdapterError::Serialization(format!("Failed to parse token response: {}", e))
        })?;
        Ok(AccessToken::issued_now(token.access_token, token.expires_in))
    }

    /// Make an authenticated GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.access_token().await?;
        let request = self.client.get(self.url(path)).bearer_auth(token);
        self.send("GET", path, request, None).await
    }

    /// Make an authenticated POST request with a JSON body.
    ///
    /// Each call carries a fresh `PayPal-Request-Id` so PayPal can detect
    /// duplicate submissions.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.access_token().await?;
        let json = serde_json::to_string(body)?;
        let request = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .header("PayPal-Request-Id", uuid::Uuid::new_v4().to_string())
            .body(json.clone());
        self.send("POST", path, request, Some(&json)).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        request: reqwest::RequestBuilder,
        body: Option<&str>,
    ) -> Result<T> {
        tracing::debug!(method, path, "sending PayPal request");
        self.log.info(&format!("{} {}", method, self.url(path)));
        if let Some(body) = body {
            self.log.debug(&format!("request body: {}", body));
        }

        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AdapterError::Serialization(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            self.log.error(&format!(
                "{} {} failed ({}): {}",
                method,
                path,
                status.as_u16(),
                text
            ));
            return Err(self.map_status_error(status.as_u16(), path, &text));
        }

        self.log.debug(&format!("response body: {}", text));
        serde_json::from_str(&text).map_err(|e| {
            AdapterError::Serialization(format!("Failed to parse PayPal response: {}", e))
        })
    }

    /// Map HTTP status codes to AdapterError.
    fn map_status_error(&self, status: u16, path: &str, body: &str) -> AdapterError {
        let error = ErrorBody::parse(body);
        match status {
            400 | 422 => AdapterError::Api {
                status,
                name: error.name.clone().unwrap_or_else(|| "VALIDATION_ERROR".to_string()),
                message: error.description().unwrap_or_else(|| body.to_string()),
                debug_id: error.debug_id,
            },
            401 | 403 => AdapterError::Auth(
                error
                    .description()
                    .unwrap_or_else(|| format!("PayPal refused access ({})", status)),
            ),
            404 => AdapterError::NotFound {
                resource_type: "PayPal resource".to_string(),
                identifier: path.to_string(),
            },
            429 => AdapterError::RateLimited {
                retry_after_ms: 5000,
            },
            500..=599 => AdapterError::Remote {
                status,
                message: error.description().unwrap_or_else(|| body.to_string()),
            },
            _ => AdapterError::Transport(format!("PayPal request failed ({}): {}", status, body)),
        }
    }

    /// Map reqwest errors to AdapterError.
    fn map_reqwest_error(&self, e: reqwest::Error) -> AdapterError {
        self.log.error(&format!("request failed: {}", e));
        if e.is_timeout() {
            AdapterError::ConnectionTimeout {
                operation: "PayPal request".to_string(),
                timeout_ms: self.config.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            AdapterError::ConnectionFailed {
                target: self.config.base_url().to_string(),
                reason: e.to_string(),
            }
        } else {
            AdapterError::Transport(format!("PayPal request failed: {}", e))
        }
    }
}

// PayPal REST API types

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    // PayPal issues nine hour tokens
    32_400
}

/// Error payload of both the REST API (`name`/`message`) and the OAuth
/// endpoint (`error`/`error_description`).
#[derive(Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    debug_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn description(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::config::CacheConfig;
    use crate::AdapterErrorCode;

    fn context(config: ApiConfig) -> ApiContext {
        ApiContext::new(OAuthTokenCredential::new("client", "secret"), config).unwrap()
    }

    #[test]
    fn test_context_validation() {
        let result = ApiContext::new(
            OAuthTokenCredential::new("", "secret"),
            ApiConfig::default(),
        );
        assert_eq!(result.unwrap_err().code(), AdapterErrorCode::InvalidConfig);

        let result = ApiContext::new(
            OAuthTokenCredential::new("client", ""),
            ApiConfig::default(),
        );
        assert_eq!(result.unwrap_err().code(), AdapterErrorCode::InvalidConfig);
    }

    #[test]
    fn test_url_building() {
        let ctx = context(ApiConfig::new(Mode::Sandbox));
        assert_eq!(
            ctx.url("/v1/payments/payment"),
            "https://api.sandbox.paypal.com/v1/payments/payment"
        );

        let ctx = context(ApiConfig::new(Mode::Live).with_endpoint("http://localhost:8080/"));
        assert_eq!(ctx.url("/v1/oauth2/token"), "http://localhost:8080/v1/oauth2/token");
    }

    #[test]
    fn test_cache_only_when_enabled() {
        let ctx = context(ApiConfig::default());
        assert!(ctx.token_cache().is_none());

        let dir = tempfile::tempdir().unwrap();
        let ctx = context(ApiConfig::default().with_cache(CacheConfig::enabled_in(dir.path())));
        assert_eq!(
            ctx.token_cache().unwrap().path(),
            dir.path().join(TokenCache::FILE_NAME)
        );

        let disabled = CacheConfig {
            enabled: false,
            directory: dir.path().to_path_buf(),
        };
        let ctx = context(ApiConfig::default().with_cache(disabled));
        assert!(ctx.token_cache().is_none());
    }

    #[test]
    fn test_status_error_mapping() {
        let ctx = context(ApiConfig::default());

        let err = ctx.map_status_error(
            400,
            "/v1/payments/payment",
            r#"{"name":"VALIDATION_ERROR","message":"Invalid request","debug_id":"d1"}"#,
        );
        match err {
            AdapterError::Api {
                status,
                name,
                debug_id,
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(name, "VALIDATION_ERROR");
                assert_eq!(debug_id.as_deref(), Some("d1"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }

        let err = ctx.map_status_error(401, TOKEN_PATH, r#"{"error":"invalid_client"}"#);
        assert_eq!(err.code(), AdapterErrorCode::Auth);

        let err = ctx.map_status_error(404, "/v1/payments/payment/PAY-1", "");
        assert!(err.to_string().contains("PAY-1"));

        let err = ctx.map_status_error(503, "/v1/payments/payment", "down");
        assert_eq!(err.code(), AdapterErrorCode::Remote);
    }
}
