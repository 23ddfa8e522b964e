//! Error types for adapter operations.
//!
//! Every failure the adapter can surface to the host engine is an
//! [`AdapterError`]. The host maps it onto an HTTP response through
//! [`AdapterError::status_code`]; PayPal-side and transport failures are
//! passed through unchanged and never retried here.

use thiserror::Error;

/// Stable error codes for host integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AdapterErrorCode {
    /// Bad input from the caller (callback parameters, transaction state)
    BadRequest = 1000,
    /// Stored connection configuration rejected
    InvalidConfig = 1001,
    /// Transport/network layer error
    Transport = 2000,
    /// Connection failed
    ConnectionFailed = 2001,
    /// Connection timeout
    ConnectionTimeout = 2002,
    /// OAuth token exchange or authorization failed
    Auth = 3000,
    /// Resource not found on the PayPal side
    NotFound = 4000,
    /// PayPal rejected the request
    Api = 5000,
    /// PayPal returned a server error
    Remote = 5001,
    /// Serialization error
    Serialization = 5002,
    /// Local storage (token cache, log file) error
    Storage = 7000,
    /// Rate limited
    RateLimited = 8000,
    /// Internal/contract violation
    Internal = 9999,
}

/// Error type for adapter operations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Contract violation inside the host/plugin wiring.
    #[error("internal error: {0}")]
    Internal(String),

    /// The caller sent input the adapter cannot act on.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A stored connection setting was rejected.
    #[error("invalid {field}: {reason}")]
    InvalidConfig {
        /// Setting name
        field: String,
        /// Reason for rejection
        reason: String,
    },

    /// Transport/network layer error.
    #[error("transport error: {0}")]
    Transport(String),

    /// Connection failed.
    #[error("connection to {target} failed: {reason}")]
    ConnectionFailed {
        /// Target endpoint
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// Connection timeout.
    #[error("{operation} timed out after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Authentication or authorization failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Resource not found.
    #[error("{resource_type} not found: {identifier}")]
    NotFound {
        /// Type of resource
        resource_type: String,
        /// Resource identifier
        identifier: String,
    },

    /// PayPal rejected the request (validation, business rule).
    #[error("paypal rejected the request ({status} {name}): {message}")]
    Api {
        /// HTTP status
        status: u16,
        /// PayPal error name, e.g. `VALIDATION_ERROR`
        name: String,
        /// PayPal error message
        message: String,
        /// PayPal debug id for support requests
        debug_id: Option<String>,
    },

    /// PayPal returned a server error.
    #[error("paypal server error ({status}): {message}")]
    Remote {
        /// HTTP status
        status: u16,
        /// Response message
        message: String,
    },

    /// Rate limited by PayPal.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited {
        /// Suggested retry delay in milliseconds
        retry_after_ms: u64,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Token cache or log file error.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AdapterError {
    /// Get the stable error code.
    pub fn code(&self) -> AdapterErrorCode {
        match self {
            Self::Internal(_) => AdapterErrorCode::Internal,
            Self::BadRequest(_) => AdapterErrorCode::BadRequest,
            Self::InvalidConfig { .. } => AdapterErrorCode::InvalidConfig,
            Self::Transport(_) => AdapterErrorCode::Transport,
            Self::ConnectionFailed { .. } => AdapterErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => AdapterErrorCode::ConnectionTimeout,
            Self::Auth(_) => AdapterErrorCode::Auth,
            Self::NotFound { .. } => AdapterErrorCode::NotFound,
            Self::Api { .. } => AdapterErrorCode::Api,
            Self::Remote { .. } => AdapterErrorCode::Remote,
            Self::RateLimited { .. } => AdapterErrorCode::RateLimited,
            Self::Serialization(_) => AdapterErrorCode::Serialization,
            Self::Storage(_) => AdapterErrorCode::Storage,
        }
    }

    /// HTTP status the host should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Internal(_) | Self::InvalidConfig { .. } | Self::Storage(_) => 500,
            Self::Auth(_) => 401,
            Self::NotFound { .. } => 404,
            Self::RateLimited { .. } => 429,
            Self::Api { status, .. } => *status,
            Self::ConnectionTimeout { .. } => 504,
            Self::Transport(_)
            | Self::ConnectionFailed { .. }
            | Self::Remote { .. }
            | Self::Serialization(_) => 502,
        }
    }

    /// Returns true if the failure might go away on a later attempt.
    ///
    /// The adapter itself never retries; this is a hint for the host.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::ConnectionFailed { .. }
                | Self::ConnectionTimeout { .. }
                | Self::RateLimited { .. }
                | Self::Remote { .. }
        )
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
