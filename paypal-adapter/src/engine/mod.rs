//! Host Engine Contracts
//!
//! The API-management engine loads payment adapters through a small set of
//! contracts. This module expresses them as Rust types so the PayPal
//! implementation (and any other adapter) can be driven by the host.
//!
//! # Architecture
//!
//! - **Parameters**: string key/value maps used for stored connection
//!   settings and for callback parameters
//! - **Form**: declarative admin form metadata (`Builder`, `ElementFactory`)
//! - **Model**: `Product`, `Transaction` and `PrepareContext` records
//! - **Traits**: `ConnectionFactory` and `PaymentProvider`
//!
//! # Example
//!
//! ```ignore
//! use paypal_adapter::engine::{Builder, ConnectionFactory, DefaultElementFactory, Parameters};
//! use paypal_adapter::PaypalConnection;
//!
//! let factory = PaypalConnection::new();
//!
//! let mut builder = Builder::new();
//! factory.configure(&mut builder, &DefaultElementFactory);
//!
//! let config = Parameters::from_iter([("client_id", "id"), ("client_secret", "secret")]);
//! let connection = factory.get_connection(&config)?;
//! ```

pub mod form;
mod model;
mod parameters;
mod traits;

pub use form::{Builder, Container, DefaultElementFactory, Element, ElementFactory};
pub use model::{PrepareContext, Product, Transaction, TransactionStatus};
pub use parameters::Parameters;
pub use traits::{Connection, ConnectionFactory, PaymentProvider};
