//! PayPal v1 payment resources.
//!
//! Only the part of the payment object model the adapter sends or reads is
//! modelled. Unknown response fields are ignored.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::context::ApiContext;
use crate::{AdapterError, Result};

const PAYMENT_PATH: &str = "/v1/payments/payment";

/// Link relation of the payer approval redirect.
pub const APPROVAL_URL_REL: &str = "approval_url";

/// Format a money value the way PayPal expects it: two decimals.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// A payment resource.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Id assigned by PayPal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `sale`, `authorize` or `order`.
    #[serde(default)]
    pub intent: String,
    /// `created`, `approved` or `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Funding instrument.
    #[serde(default)]
    pub payer: Payer,
    /// Purchase units.
    #[serde(default)]
    pub transactions: Vec<PaymentTransaction>,
    /// Redirect targets for the payer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_urls: Option<RedirectUrls>,
    /// HATEOAS links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Payment {
    /// URL the payer must visit to approve the payment.
    pub fn approval_link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == APPROVAL_URL_REL)
            .map(|link| link.href.as_str())
    }

    /// Remote id, if PayPal assigned one.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Currency of the first purchase unit.
    pub fn currency(&self) -> Option<&str> {
        self.transactions
            .first()
            .map(|transaction| transaction.amount.currency.as_str())
    }
}

/// Payer information.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    /// Funding method, `paypal` for wallet payments.
    pub payment_method: String,
    /// Payer status as reported by PayPal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A purchase unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    /// Total amount.
    pub amount: Amount,
    /// Line items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_list: Option<ItemList>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Merchant invoice number, unique per payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
}

/// Money amount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Total as a decimal string with two decimals.
    pub total: String,
}

impl Amount {
    /// Create an amount from a decimal value.
    pub fn new(currency: impl Into<String>, total: Decimal) -> Self {
        Self {
            currency: currency.into(),
            total: format_amount(total),
        }
    }
}

/// Line items of a purchase unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemList {
    /// The items.
    #[serde(default)]
    pub items: Vec<Item>,
}

/// A line item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item name.
    pub name: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Quantity as a string.
    pub quantity: String,
    /// Unit price as a decimal string.
    pub price: String,
    /// Stock keeping unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

/// Where PayPal sends the payer after approving or cancelling.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectUrls {
    /// After approval.
    pub return_url: String,
    /// After cancellation.
    pub cancel_url: String,
}

/// HATEOAS link.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL.
    pub href: String,
    /// Relation, e.g. `self`, `approval_url`, `execute`.
    pub rel: String,
    /// HTTP method to use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Body of an execute call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentExecution {
    /// Payer id PayPal appended to the return URL.
    pub payer_id: String,
    /// Optional amount updates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<PaymentTransaction>,
}

impl ApiContext {
    /// Create a payment (`POST /v1/payments/payment`).
    pub async fn create_payment(&self, payment: &Payment) -> Result<Payment> {
        self.post(PAYMENT_PATH, payment).await
    }

    /// Fetch a payment by id (`GET /v1/payments/payment/{id}`).
    pub async fn get_payment(&self, payment_id: &str) -> Result<Payment> {
        self.get(&payment_path(payment_id)?).await
    }

    /// Execute an approved payment (`POST /v1/payments/payment/{id}/execute`).
    pub async fn execute_payment(
        &self,
        payment_id: &str,
        execution: &PaymentExecution,
    ) -> Result<Payment> {
        let path = format!("{}/execute", payment_path(payment_id)?);
        self.post(&path, execution).await
    }
}

fn payment_path(payment_id: &str) -> Result<String> {
    let valid = !payment_id.is_empty()
        && payment_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(AdapterError::bad_request(format!(
            "invalid payment id '{}'",
            payment_id
        )));
    }
    Ok(format!("{}/{}", PAYMENT_PATH, payment_id))
}
