//! Records exchanged between the host and a payment provider.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A purchasable product, read-only for providers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Host product id, sent to PayPal as the item SKU.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit price in the currency of the surrounding [`PrepareContext`].
    pub price: Decimal,
}

impl Product {
    /// Create a product.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// Per-request data the host supplies to `prepare`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareContext {
    /// ISO 4217 currency code, e.g. `EUR`.
    pub currency: String,
    /// Where PayPal sends the payer after approval.
    pub return_url: String,
    /// Where PayPal sends the payer after cancelling.
    pub cancel_url: String,
}

impl PrepareContext {
    /// Create a prepare context.
    pub fn new(
        currency: impl Into<String>,
        return_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            currency: currency.into(),
            return_url: return_url.into(),
            cancel_url: cancel_url.into(),
        }
    }
}

/// Status of a host transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Payment created remotely, waiting for payer approval.
    Created,
    /// Payment approved/executed.
    Approved,
    /// Payment failed.
    Failed,
    /// Any state the adapter does not recognise.
    Unknown,
}

impl TransactionStatus {
    /// Lowercase name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Approved => "approved",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host transaction record, updated by `prepare` and `execute`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Host transaction id.
    pub id: String,
    /// Current status.
    pub status: TransactionStatus,
    /// Id of the payment on the provider side, set by `prepare`.
    pub remote_id: Option<String>,
}

impl Transaction {
    /// Create a fresh transaction without a remote payment.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: TransactionStatus::Unknown,
            remote_id: None,
        }
    }

    /// Attach an existing remote payment id.
    pub fn with_remote_id(mut self, remote_id: impl Into<String>) -> Self {
        self.remote_id = Some(remote_id.into());
        self
    }

    /// Remote payment id, if `prepare` already ran.
    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref().filter(|id| !id.is_empty())
    }
}
