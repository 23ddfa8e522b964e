//! Connection and Payment Provider Traits
//!
//! The host engine keeps connections opaque: a connection factory returns a
//! type-erased [`Connection`] and the host later hands the very same value
//! to the payment provider, which recovers its concrete client type.

use super::form::{Builder, ElementFactory};
use super::model::{PrepareContext, Product, Transaction};
use super::parameters::Parameters;
use crate::Result;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

/// Opaque connection handle passed from a factory to a provider.
pub type Connection = Arc<dyn Any + Send + Sync>;

/// Builds connections from stored settings and declares the settings form.
pub trait ConnectionFactory: Send + Sync {
    /// Human-readable connection name.
    fn name(&self) -> &str;

    /// Build a connection from stored settings.
    ///
    /// Called once per host request; the returned connection is owned by the
    /// caller for the duration of that request.
    fn get_connection(&self, config: &Parameters) -> Result<Connection>;

    /// Register the admin form elements for this connection's settings.
    fn configure(&self, builder: &mut Builder, elements: &dyn ElementFactory);
}

/// Two-phase payment flow.
///
/// `prepare` creates the remote payment and returns the URL the payer must
/// visit; `execute` finalizes it once the payer is redirected back.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a remote payment and return the approval URL.
    ///
    /// On success the transaction carries the remote payment id and the
    /// mapped status. On failure it is left untouched.
    async fn prepare(
        &self,
        connection: &Connection,
        product: &Product,
        transaction: &mut Transaction,
        context: &PrepareContext,
    ) -> Result<String>;

    /// Finalize an approved payment from the callback parameters.
    async fn execute(
        &self,
        connection: &Connection,
        product: &Product,
        transaction: &mut Transaction,
        parameters: &Parameters,
    ) -> Result<()>;
}
