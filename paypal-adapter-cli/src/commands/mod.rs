//! CLI command implementations

pub mod execute;
pub mod form;
pub mod prepare;

use anyhow::{bail, Context, Result};
use paypal_adapter::connection::keys;
use paypal_adapter::prelude::*;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::ui;

/// Merchant settings collected from flags and environment
#[derive(Clone, Debug, Default)]
pub struct Settings {
    pub mode: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub log_level: Option<String>,
    pub endpoint: Option<String>,
    pub cache_dir: PathBuf,
}

impl Settings {
    /// Stored-settings view handed to the connection factory
    pub fn parameters(&self) -> Result<Parameters> {
        let client_id = self
            .client_id
            .clone()
            .context("client id missing: pass --client-id or set PAYPAL_CLIENT_ID")?;

        let client_secret = match &self.client_secret {
            Some(secret) => secret.clone(),
            None if ui::is_interactive() => ui::password("Client secret")?,
            None => bail!("client secret missing: pass --client-secret or set PAYPAL_CLIENT_SECRET"),
        };

        let mut parameters = Parameters::new()
            .with(keys::CLIENT_ID, client_id)
            .with(keys::CLIENT_SECRET, client_secret);
        if let Some(mode) = &self.mode {
            parameters.set(keys::MODE, mode.clone());
        }
        if let Some(level) = &self.log_level {
            parameters.set(keys::LOG_LEVEL, level.clone());
        }
        Ok(parameters)
    }

    pub fn factory(&self) -> PaypalConnection {
        let factory = PaypalConnection::new().with_cache_dir(&self.cache_dir);
        match &self.endpoint {
            Some(endpoint) => factory.with_endpoint(endpoint.clone()),
            None => factory,
        }
    }

    /// Build a connection the way the host does for each request
    pub fn connect(&self) -> Result<Connection> {
        let parameters = self.parameters()?;
        tracing::debug!(cache_dir = %self.cache_dir.display(), "opening PayPal connection");
        Ok(self.factory().get_connection(&parameters)?)
    }
}

/// Product flags shared by `prepare` and `execute`
#[derive(Clone, Debug)]
pub struct ProductArgs {
    pub sku: String,
    pub name: String,
    pub price: String,
}

impl ProductArgs {
    pub fn product(&self) -> Result<Product> {
        let price: Decimal = self
            .price
            .parse()
            .with_context(|| format!("invalid price: {}", self.price))?;
        if price <= Decimal::ZERO {
            bail!("price must be positive: {}", self.price);
        }
        Ok(Product::new(self.sku.clone(), self.name.clone(), price))
    }
}
