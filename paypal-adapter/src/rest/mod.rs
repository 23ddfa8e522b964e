//! PayPal REST client.
//!
//! A small client for the parts of the PayPal REST API v1 the adapter
//! needs: the OAuth2 client-credentials exchange and the payment
//! create/get/execute calls.
//!
//! ## Token handling
//!
//! Tokens are requested lazily on the first call, kept in memory for the
//! lifetime of the [`ApiContext`] and, when a [`CacheConfig`] is set,
//! shared through a file cache so that the next connection built for the
//! same client id skips the token exchange.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use paypal_adapter::rest::{ApiConfig, ApiContext, Mode, OAuthTokenCredential};
//!
//! let context = ApiContext::new(
//!     OAuthTokenCredential::new("client_id", "client_secret"),
//!     ApiConfig::new(Mode::Sandbox),
//! )?;
//!
//! let payment = context.get_payment("PAY-1AB23456CD789012EF34GHIJ").await?;
//! println!("state: {:?}", payment.state);
//! ```

mod config;
mod context;
mod credential;
mod log;
mod payments;
mod token_cache;

pub use config::{ApiConfig, CacheConfig, LogConfig, LogLevel, Mode};
pub use context::ApiContext;
pub use credential::{AccessToken, OAuthTokenCredential, TOKEN_EXPIRY_MARGIN_SECS};
pub use log::SdkLog;
pub use payments::{
    format_amount, Amount, Item, ItemList, Link, Payer, Payment, PaymentExecution,
    PaymentTransaction, RedirectUrls, APPROVAL_URL_REL,
};
pub use token_cache::TokenCache;
