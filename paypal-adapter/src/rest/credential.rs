//! OAuth2 client-credentials for the PayPal REST API.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::RwLock;

/// Seconds before expiry at which a token is no longer handed out.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 120;

/// Bearer token obtained from `/v1/oauth2/token`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The bearer token.
    pub access_token: String,
    /// Unix timestamp the token was issued at.
    pub created_at: i64,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

impl AccessToken {
    /// Create a token issued now.
    pub fn issued_now(access_token: impl Into<String>, expires_in: i64) -> Self {
        Self {
            access_token: access_token.into(),
            created_at: Utc::now().timestamp(),
            expires_in,
        }
    }

    /// Unix timestamp the token expires at.
    pub fn expires_at(&self) -> i64 {
        self.created_at.saturating_add(self.expires_in)
    }

    /// Returns true if the token is still usable at `now`.
    pub fn is_fresh_at(&self, now: i64) -> bool {
        now + TOKEN_EXPIRY_MARGIN_SECS < self.expires_at()
    }

    /// Returns true if the token is still usable.
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now().timestamp())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Client id/secret pair plus the token currently issued for it.
pub struct OAuthTokenCredential {
    client_id: String,
    client_secret: String,
    token: RwLock<Option<AccessToken>>,
}

impl OAuthTokenCredential {
    /// Create a credential from the developer portal id and secret.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: RwLock::new(None),
        }
    }

    /// The client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// The held token, if it is still fresh.
    pub async fn current_token(&self) -> Option<AccessToken> {
        let token = self.token.read().await;
        token.as_ref().filter(|t| t.is_fresh()).cloned()
    }

    /// Replace the held token.
    pub async fn remember(&self, token: AccessToken) {
        *self.token.write().await = Some(token);
    }
}

impl fmt::Debug for OAuthTokenCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokenCredential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
