//! PayPal payment provider.
//!
//! Maps the host's two-phase payment flow onto PayPal payments:
//!
//! 1. `prepare` creates a `sale` payment for a single product and returns
//!    the approval URL the payer is redirected to.
//! 2. `execute` runs after PayPal redirects the payer back with a
//!    `PayerID`; it executes the payment and records the final state.

use async_trait::async_trait;

use crate::engine::{
    Connection, Parameters, PaymentProvider, PrepareContext, Product, Transaction,
    TransactionStatus,
};
use crate::rest::{
    format_amount, Amount, ApiContext, Item, ItemList, Payer, Payment, PaymentExecution,
    PaymentTransaction, RedirectUrls,
};
use crate::{AdapterError, Result};

/// Callback parameter names PayPal uses for the payer id.
pub const PAYER_ID_PARAMS: [&str; 2] = ["PayerID", "payerId"];

/// Callback parameter the host appends to the return URL.
pub const SUCCESS_PARAM: &str = "success";

/// Map a PayPal payment state onto a transaction status.
pub fn transaction_status(state: Option<&str>) -> TransactionStatus {
    match state {
        Some("created") => TransactionStatus::Created,
        Some("approved") => TransactionStatus::Approved,
        Some("failed") => TransactionStatus::Failed,
        _ => TransactionStatus::Unknown,
    }
}

/// Payment provider backed by an [`ApiContext`] connection.
#[derive(Clone, Debug)]
pub struct PaypalProvider {
    require_success_flag: bool,
}

impl PaypalProvider {
    /// Create a provider that requires `success=true` on the callback.
    pub fn new() -> Self {
        Self {
            require_success_flag: true,
        }
    }

    /// Create a provider that skips the `success` check and lets PayPal's
    /// execute call reject unapproved payments.
    pub fn without_success_check() -> Self {
        Self {
            require_success_flag: false,
        }
    }

    /// Whether `execute` demands `success=true`.
    pub fn requires_success_flag(&self) -> bool {
        self.require_success_flag
    }

    fn api_context(connection: &Connection) -> Result<&ApiContext> {
        connection
            .downcast_ref::<ApiContext>()
            .ok_or_else(|| AdapterError::internal("Connection must return a Paypal API context"))
    }

    fn create_payment(product: &Product, context: &PrepareContext) -> Payment {
        let item = Item {
            name: product.name.clone(),
            currency: context.currency.clone(),
            quantity: "1".to_string(),
            price: format_amount(product.price),
            sku: Some(product.id.clone()),
        };

        let transaction = PaymentTransaction {
            amount: Amount::new(context.currency.clone(), product.price),
            item_list: Some(ItemList { items: vec![item] }),
            description: None,
            invoice_number: Some(uuid::Uuid::new_v4().simple().to_string()),
        };

        Payment {
            intent: "sale".to_string(),
            payer: Payer {
                payment_method: "paypal".to_string(),
                status: None,
            },
            transactions: vec![transaction],
            redirect_urls: Some(RedirectUrls {
                return_url: context.return_url.clone(),
                cancel_url: context.cancel_url.clone(),
            }),
            ..Default::default()
        }
    }

    fn create_payment_execution(
        payer_id: &str,
        product: &Product,
        currency: Option<&str>,
    ) -> PaymentExecution {
        PaymentExecution {
            payer_id: payer_id.to_string(),
            transactions: currency
                .map(|currency| PaymentTransaction {
                    amount: Amount::new(currency, product.price),
                    ..Default::default()
                })
                .into_iter()
                .collect(),
        }
    }

    /// Record the payment's state and id on the transaction.
    ///
    /// `known_id` is used when the response omits the id; execute passes the
    /// id it already verified, since the payment has been executed by then.
    fn update_transaction(
        payment: &Payment,
        known_id: Option<&str>,
        transaction: &mut Transaction,
    ) -> Result<()> {
        let remote_id = payment
            .id()
            .or(known_id)
            .ok_or_else(|| AdapterError::internal("PayPal returned a payment without id"))?;

        transaction.status = transaction_status(payment.state.as_deref());
        transaction.remote_id = Some(remote_id.to_string());
        Ok(())
    }

    fn check_success_flag(&self, parameters: &Parameters) -> Result<()> {
        if !self.require_success_flag {
            return Ok(());
        }
        match parameters.get(SUCCESS_PARAM) {
            Some("true") => Ok(()),
            _ => Err(AdapterError::bad_request("Payment was not successful")),
        }
    }
}

impl Default for PaypalProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProvider for PaypalProvider {
    #[tracing::instrument(skip_all, fields(transaction = %transaction.id, product = %product.id))]
    async fn prepare(
        &self,
        connection: &Connection,
        product: &Product,
        transaction: &mut Transaction,
        context: &PrepareContext,
    ) -> Result<String> {
        let api_context = Self::api_context(connection)?;

        let payment = Self::create_payment(product, context);
        let payment = api_context.create_payment(&payment).await?;

        let approval_link = payment
            .approval_link()
            .ok_or_else(|| AdapterError::internal("PayPal returned no approval link"))?
            .to_string();

        Self::update_transaction(&payment, None, transaction)?;
        tracing::info!(
            remote_id = transaction.remote_id.as_deref().unwrap_or_default(),
            status = %transaction.status,
            "prepared PayPal payment"
        );

        Ok(approval_link)
    }

    #[tracing::instrument(skip_all, fields(transaction = %transaction.id, product = %product.id))]
    async fn execute(
        &self,
        connection: &Connection,
        product: &Product,
        transaction: &mut Transaction,
        parameters: &Parameters,
    ) -> Result<()> {
        let api_context = Self::api_context(connection)?;

        self.check_success_flag(parameters)?;
        let payer_id = parameters
            .get_any(&PAYER_ID_PARAMS)
            .ok_or_else(|| AdapterError::bad_request("Payer id is missing"))?;
        let remote_id = transaction
            .remote_id()
            .ok_or_else(|| AdapterError::bad_request("Transaction has no remote payment id"))?
            .to_string();

        let payment = api_context.get_payment(&remote_id).await?;
        if payment.id() != Some(remote_id.as_str()) {
            return Err(AdapterError::internal(format!(
                "PayPal returned payment {:?} for remote id {}",
                payment.id(),
                remote_id
            )));
        }

        let execution = Self::create_payment_execution(payer_id, product, payment.currency());
        let payment = api_context.execute_payment(&remote_id, &execution).await?;

        Self::update_transaction(&payment, Some(remote_id.as_str()), transaction)?;
        tracing::info!(
            remote_id = %remote_id,
            status = %transaction.status,
            "executed PayPal payment"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn product() -> Product {
        Product::new("sku1", "X", dec!(10))
    }

    #[test]
    fn test_transaction_status_mapping() {
        assert_eq!(transaction_status(Some("created")), TransactionStatus::Created);
        assert_eq!(transaction_status(Some("approved")), TransactionStatus::Approved);
        assert_eq!(transaction_status(Some("failed")), TransactionStatus::Failed);
        assert_eq!(transaction_status(Some("canceled")), TransactionStatus::Unknown);
        assert_eq!(transaction_status(Some("")), TransactionStatus::Unknown);
        assert_eq!(transaction_status(None), TransactionStatus::Unknown);
    }

    #[test]
    fn test_create_payment_request() {
        let context = PrepareContext::new(
            "EUR",
            "https://shop.example/return",
            "https://shop.example/cancel",
        );
        let payment = PaypalProvider::create_payment(&product(), &context);

        assert_eq!(payment.intent, "sale");
        assert_eq!(payment.payer.payment_method, "paypal");
        assert!(payment.id.is_none());

        let transaction = &payment.transactions[0];
        assert_eq!(transaction.amount.currency, "EUR");
        assert_eq!(transaction.amount.total, "10.00");
        assert!(transaction.invoice_number.is_some());

        let items = &transaction.item_list.as_ref().unwrap().items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "X");
        assert_eq!(items[0].quantity, "1");
        assert_eq!(items[0].sku.as_deref(), Some("sku1"));
        assert_eq!(items[0].price, "10.00");

        let redirects = payment.redirect_urls.unwrap();
        assert_eq!(redirects.return_url, "https://shop.example/return");
        assert_eq!(redirects.cancel_url, "https://shop.example/cancel");
    }

    #[test]
    fn test_invoice_numbers_are_unique() {
        let context = PrepareContext::new("EUR", "https://a", "https://b");
        let a = PaypalProvider::create_payment(&product(), &context);
        let b = PaypalProvider::create_payment(&product(), &context);
        assert_ne!(
            a.transactions[0].invoice_number,
            b.transactions[0].invoice_number
        );
    }

    #[test]
    fn test_create_payment_execution() {
        let execution = PaypalProvider::create_payment_execution("PAYER-1", &product(), Some("USD"));
        assert_eq!(execution.payer_id, "PAYER-1");
        assert_eq!(execution.transactions[0].amount.total, "10.00");
        assert_eq!(execution.transactions[0].amount.currency, "USD");

        let execution = PaypalProvider::create_payment_execution("PAYER-1", &product(), None);
        assert!(execution.transactions.is_empty());
    }

    #[test]
    fn test_update_transaction_requires_id() {
        let mut transaction = Transaction::new("tx-1");
        let payment = Payment {
            state: Some("created".to_string()),
            ..Default::default()
        };
        assert!(PaypalProvider::update_transaction(&payment, None, &mut transaction).is_err());
        assert_eq!(transaction.status, TransactionStatus::Unknown);
        assert!(transaction.remote_id.is_none());
    }

    #[test]
    fn test_update_transaction_falls_back_to_known_id() {
        let mut transaction = Transaction::new("tx-1").with_remote_id("PAY-1");
        let payment = Payment {
            state: Some("approved".to_string()),
            ..Default::default()
        };

        PaypalProvider::update_transaction(&payment, Some("PAY-1"), &mut transaction).unwrap();
        assert_eq!(transaction.status, TransactionStatus::Approved);
        assert_eq!(transaction.remote_id(), Some("PAY-1"));
    }

    #[test]
    fn test_success_flag_check() {
        let provider = PaypalProvider::new();
        assert!(provider
            .check_success_flag(&Parameters::new().with(SUCCESS_PARAM, "true"))
            .is_ok());
        for params in [
            Parameters::new(),
            Parameters::new().with(SUCCESS_PARAM, "false"),
            Parameters::new().with(SUCCESS_PARAM, "TRUE"),
            Parameters::new().with(SUCCESS_PARAM, "1"),
        ] {
            let err = provider.check_success_flag(&params).unwrap_err();
            assert_eq!(err.status_code(), 400);
        }

        let provider = PaypalProvider::without_success_check();
        assert!(!provider.requires_success_flag());
        assert!(provider.check_success_flag(&Parameters::new()).is_ok());
    }

    #[tokio::test]
    async fn test_prepare_rejects_foreign_connection() {
        let connection: Connection = Arc::new("not an api context".to_string());
        let mut transaction = Transaction::new("tx-1");
        let context = PrepareContext::new("EUR", "https://a", "https://b");

        let err = PaypalProvider::new()
            .prepare(&connection, &product(), &mut transaction, &context)
            .await
            .unwrap_err();

        assert_eq!(err.code(), crate::AdapterErrorCode::Internal);
        assert_eq!(err.status_code(), 500);
        assert_eq!(transaction, Transaction::new("tx-1"));
    }
}
