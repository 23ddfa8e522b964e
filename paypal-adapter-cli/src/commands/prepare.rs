//! Prepare command - create a PayPal payment and print the approval URL

use anyhow::Result;
use paypal_adapter::prelude::*;
use serde_json::json;

use super::{ProductArgs, Settings};
use crate::ui;

/// Redirect targets and currency for the new payment
#[derive(Clone, Debug)]
pub struct PrepareArgs {
    pub product: ProductArgs,
    pub currency: String,
    pub return_url: String,
    pub cancel_url: String,
    pub transaction_id: Option<String>,
}

#[tracing::instrument(skip_all, fields(sku = %args.product.sku))]
pub async fn run(settings: &Settings, args: PrepareArgs, json: bool) -> Result<()> {
    let product = args.product.product()?;
    let connection = settings.connect()?;
    let context = PrepareContext::new(args.currency, args.return_url, args.cancel_url);
    let mut transaction = Transaction::new(
        args.transaction_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
    );

    let spinner = (!json).then(|| ui::spinner("Creating PayPal payment..."));
    let result = PaypalProvider::new()
        .prepare(&connection, &product, &mut transaction, &context)
        .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let approval_url = result?;

    if json {
        ui::json(&json!({
            "approval_url": approval_url,
            "transaction": transaction,
        }));
        return Ok(());
    }

    ui::success("Payment created");
    ui::key_value("Transaction", &transaction.id);
    ui::key_value("Payment ID", transaction.remote_id().unwrap_or("-"));
    ui::key_value("Status", transaction.status.as_str());
    ui::separator();
    ui::info("Send the payer to:");
    println!("  {}", approval_url);
    ui::info(&format!(
        "After approval run: paypal-cli execute --payment-id {} --payer-id <PayerID> --sku {} --name {:?} --price {}",
        transaction.remote_id().unwrap_or("<id>"),
        product.id,
        product.name,
        args.product.price
    ));

    Ok(())
}
