//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use paypal_adapter::prelude::*;
//! ```

// Host contracts
pub use crate::engine::{
    Builder, Connection, ConnectionFactory, DefaultElementFactory, Element, ElementFactory,
    Parameters, PaymentProvider, PrepareContext, Product, Transaction, TransactionStatus,
};

// Error handling
pub use crate::errors::{AdapterError, AdapterErrorCode};
pub use crate::Result;

// PayPal implementation
pub use crate::connection::{ConnectionConfig, PaypalConnection};
pub use crate::provider::PaypalProvider;
pub use crate::rest::{ApiContext, LogLevel, Mode};
