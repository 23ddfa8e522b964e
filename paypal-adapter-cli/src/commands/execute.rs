//! Execute command - execute an approved PayPal payment

use anyhow::Result;
use paypal_adapter::prelude::*;
use serde_json::json;

use super::{ProductArgs, Settings};
use crate::ui;

/// Callback values PayPal appended to the return URL
#[derive(Clone, Debug)]
pub struct ExecuteArgs {
    pub product: ProductArgs,
    pub payment_id: String,
    pub payer_id: String,
    pub success: String,
    pub transaction_id: Option<String>,
    pub skip_success_check: bool,
}

impl ExecuteArgs {
    /// Callback parameters as the host would receive them
    pub fn parameters(&self) -> Parameters {
        Parameters::new()
            .with("success", self.success.clone())
            .with("paymentId", self.payment_id.clone())
            .with("PayerID", self.payer_id.clone())
    }
}

#[tracing::instrument(skip_all, fields(payment_id = %args.payment_id))]
pub async fn run(settings: &Settings, args: ExecuteArgs, json: bool) -> Result<()> {
    let product = args.product.product()?;
    let connection = settings.connect()?;
    let parameters = args.parameters();
    let mut transaction = Transaction::new(
        args.transaction_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
    )
    .with_remote_id(args.payment_id.clone());

    let provider = if args.skip_success_check {
        PaypalProvider::without_success_check()
    } else {
        PaypalProvider::new()
    };

    let spinner = (!json).then(|| ui::spinner("Executing PayPal payment..."));
    let result = provider
        .execute(&connection, &product, &mut transaction, &parameters)
        .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    result?;

    if json {
        ui::json(&json!({ "transaction": transaction }));
        return Ok(());
    }

    match transaction.status {
        TransactionStatus::Approved => ui::success("Payment approved"),
        TransactionStatus::Failed => ui::error("Payment failed"),
        status => ui::warning(&format!("Payment state is {}", status)),
    }
    ui::key_value("Transaction", &transaction.id);
    ui::key_value("Payment ID", transaction.remote_id().unwrap_or("-"));
    ui::key_value("Status", transaction.status.as_str());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execute_args(success: &str) -> ExecuteArgs {
        ExecuteArgs {
            product: ProductArgs {
                sku: "sku1".to_string(),
                name: "X".to_string(),
                price: "10".to_string(),
            },
            payment_id: "PAY-1".to_string(),
            payer_id: "PAYER".to_string(),
            success: success.to_string(),
            transaction_id: None,
            skip_success_check: false,
        }
    }

    #[test]
    fn test_callback_parameters() {
        let parameters = execute_args("true").parameters();
        assert_eq!(parameters.get("success"), Some("true"));
        assert_eq!(parameters.get("PayerID"), Some("PAYER"));
        assert_eq!(parameters.get("paymentId"), Some("PAY-1"));
    }

    #[test]
    fn test_success_flag_passed_through() {
        let parameters = execute_args("false").parameters();
        assert_eq!(parameters.get("success"), Some("false"));

        let parameters = execute_args("").parameters();
        assert!(!parameters.has("success"));
    }
}
