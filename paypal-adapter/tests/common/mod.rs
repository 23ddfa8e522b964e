//! Common test utilities for paypal-adapter integration tests

use paypal_adapter::connection::keys;
use paypal_adapter::engine::{Connection, ConnectionFactory, Parameters, PrepareContext, Product};
use paypal_adapter::PaypalConnection;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const CLIENT_ID: &str = "AYSq3RDGsmBLJE-otTkBtM-jBRd1TCQwFf9RGfwddNXWz0uFU9ztymylOhRS";
pub const CLIENT_SECRET: &str = "EGnHDxD_qRPdaLdZz8iCr8N7_MzF-YHPTkjs6NKYQvQSBngp4PTTVWkPZRbL";
pub const ACCESS_TOKEN: &str = "A21AAFEpH4PsADK7qSS7pSRsgzfENtu-Q1ysgEDVDESseMHBYXVJYE8ovjj68elIDy8nF26AwPhfXTIeWAZHSLIsQkSYz9ifg";
pub const PAYMENT_ID: &str = "PAY-1B56960729604235TKQQIYVY";
pub const APPROVAL_URL: &str =
    "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_express-checkout&token=EC-60385559L1062554J";

/// Mock PayPal API plus a private cache directory
#[allow(dead_code)]
pub struct TestContext {
    pub server: MockServer,
    pub cache_dir: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            cache_dir: TempDir::new().unwrap(),
        }
    }

    /// Connection factory pointed at the mock server
    pub fn factory(&self) -> PaypalConnection {
        PaypalConnection::new()
            .with_cache_dir(self.cache_dir.path())
            .with_endpoint(self.server.uri())
            .with_timeout(5)
    }

    /// Build a connection from the default credentials plus `extra` settings
    pub fn connection(&self, extra: &[(&str, &str)]) -> Connection {
        let mut config = credentials();
        for (key, value) in extra {
            config.set(*key, *value);
        }
        self.factory().get_connection(&config).unwrap()
    }

    /// Mount the OAuth token endpoint, expecting `calls` exchanges
    pub async fn mount_token(&self, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "scope": "https://api.paypal.com/v1/payments/.*",
                "access_token": ACCESS_TOKEN,
                "token_type": "Bearer",
                "app_id": "APP-80W284485P519543T",
                "expires_in": 32400
            })))
            .expect(calls)
            .mount(&self.server)
            .await;
    }
}

pub fn credentials() -> Parameters {
    Parameters::from_iter([
        (keys::CLIENT_ID, CLIENT_ID),
        (keys::CLIENT_SECRET, CLIENT_SECRET),
    ])
}

pub fn product() -> Product {
    Product::new("sku1", "X", dec!(10))
}

pub fn prepare_context() -> PrepareContext {
    PrepareContext::new(
        "EUR",
        "https://shop.example/payment/return",
        "https://shop.example/payment/cancel",
    )
}

/// Payment resource as PayPal returns it
pub fn payment_json(id: &str, state: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "intent": "sale",
        "state": state,
        "payer": { "payment_method": "paypal" },
        "transactions": [{
            "amount": { "total": "10.00", "currency": "EUR" },
            "item_list": {
                "items": [{ "name": "X", "sku": "sku1", "price": "10.00", "currency": "EUR", "quantity": "1" }]
            },
            "invoice_number": "5f1c2c8e0e6b4a7f9d3a3b2c1d0e9f8a"
        }],
        "create_time": "2024-05-01T10:00:00Z",
        "links": [
            {
                "href": format!("https://api.sandbox.paypal.com/v1/payments/payment/{}", id),
                "rel": "self",
                "method": "GET"
            },
            { "href": APPROVAL_URL, "rel": "approval_url", "method": "REDIRECT" },
            {
                "href": format!("https://api.sandbox.paypal.com/v1/payments/payment/{}/execute", id),
                "rel": "execute",
                "method": "POST"
            }
        ]
    })
}
