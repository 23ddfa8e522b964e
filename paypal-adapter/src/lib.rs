//! PayPal adapter.
//!
//! Lets a pluggable API-management engine accept PayPal as a payment
//! backend. The crate stays stateless between host requests: every request
//! builds its own connection and hands it to the provider.
//!
//! # Features
//!
//! - **Connection factory**: [`PaypalConnection`] turns stored merchant
//!   settings into an authenticated [`ApiContext`] and declares the admin form
//! - **Payment provider**: [`PaypalProvider`] implements the two-phase
//!   prepare/execute flow on top of PayPal payments
//! - **REST client**: OAuth2 token exchange with a shared file cache, payment
//!   calls and an optional per-connection log file
//!
//! # Example
//!
//! ```ignore
//! use paypal_adapter::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let factory = PaypalConnection::new();
//! let config = Parameters::from_iter([
//!     ("mode", "sandbox"),
//!     ("client_id", "client-id"),
//!     ("client_secret", "client-secret"),
//! ]);
//! let connection = factory.get_connection(&config)?;
//!
//! let provider = PaypalProvider::new();
//! let product = Product::new("sku1", "X", dec!(10));
//! let mut transaction = Transaction::new("tx-1");
//! let context = PrepareContext::new("EUR", "https://shop/return", "https://shop/cancel");
//!
//! let approval_url = provider
//!     .prepare(&connection, &product, &mut transaction, &context)
//!     .await?;
//! ```

pub mod connection;
pub mod engine;
pub mod errors;
pub mod prelude;
pub mod provider;
pub mod rest;

pub use connection::{ConnectionConfig, PaypalConnection};
pub use errors::{AdapterError, AdapterErrorCode};
pub use provider::{transaction_status, PaypalProvider};
pub use rest::ApiContext;

/// Common result alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
