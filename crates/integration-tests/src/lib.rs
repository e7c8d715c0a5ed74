//! Integration tests for Mailchimp Sync.
//!
//! Every test runs the real [`MailchimpClient`] against a `wiremock` server
//! standing in for the Mailchimp API, so requests are checked down to the
//! URL, auth header and JSON body.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mailchimp-sync-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `order_sync` - Cart lifecycle, completion and line reconciliation
//! - `catalog_sync` - Products, variants and missing-parent recovery
//! - `customer_sync` - Customers and the post-commit observer
//! - `transport` - Response handling of the HTTP client

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{Duration, Utc};
use mailchimp_sync::{MailchimpClient, MailchimpConfig, SyncContext, SyncPolicies};
use mailchimp_sync_core::{
    LineItem, LineItemId, Order, OrderId, Product, ProductId, User, UserId, Variant, VariantId,
};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::MockServer;

/// API key the tests authenticate with.
pub const API_KEY: &str = "0123456789abcdef-us6";

/// `Authorization` header the client sends for [`API_KEY`].
pub const AUTH_HEADER: &str = "Basic bWFpbGNoaW1wLXN5bmM6MDEyMzQ1Njc4OWFiY2RlZi11czY=";

pub const STORE_ID: &str = "store_1";

/// A mock Mailchimp API with a client pointed at it.
pub struct TestStore {
    pub server: MockServer,
    pub client: MailchimpClient,
    pub policies: SyncPolicies,
}

impl TestStore {
    /// Start a mock server and build a client for it.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let config = MailchimpConfig::new(SecretString::from(API_KEY), STORE_ID, server.uri());
        let client = MailchimpClient::new(&config).expect("Failed to build client");

        Self {
            server,
            client,
            policies: SyncPolicies::from_config(&config),
        }
    }

    #[must_use]
    pub const fn ctx(&self) -> SyncContext<'_, MailchimpClient> {
        SyncContext::new(&self.client, &self.policies)
    }
}

/// Full mock server path for a store-relative resource path.
#[must_use]
pub fn store_path(path: &str) -> String {
    format!("/ecommerce/stores/{STORE_ID}{path}")
}

/// Mailchimp problem-detail body.
#[must_use]
pub fn problem(status: u16, title: &str, detail: &str) -> Value {
    json!({
        "type": "https://mailchimp.com/developer/marketing/docs/errors/",
        "title": title,
        "status": status,
        "detail": detail,
        "instance": "00000000-0000-0000-0000-000000000000"
    })
}

#[must_use]
pub fn already_exists() -> Value {
    problem(
        400,
        "Bad Request",
        "A resource with the provided ID already exists in the account.",
    )
}

#[must_use]
pub fn customer_not_synced() -> Value {
    let mut body = problem(
        400,
        "Invalid Resource",
        "The resource submitted could not be validated.",
    );
    body["errors"] = json!([{
        "field": "customer.email_address",
        "message": "This value should not be blank."
    }]);
    body
}

#[must_use]
pub fn user() -> User {
    let mut user = User::new(UserId::new(2), "Jo@Example.com");
    user.first_name = Some("Jo".to_string());
    user.accepts_marketing = true;
    user
}

#[must_use]
pub fn line_item(id: i64) -> LineItem {
    LineItem {
        id: LineItemId::new(id),
        variant_id: VariantId::new(41),
        product_id: ProductId::new(4),
        quantity: 2,
        price: Decimal::new(2450, 2),
    }
}

/// Cart `R100` owned by [`user`] with the given line item ids.
#[must_use]
pub fn cart(line_ids: &[i64]) -> Order {
    let mut order = Order::new(OrderId::new(1), "R100");
    order.user = Some(user());
    order.total = Decimal::new(4900, 2);
    order.item_total = Decimal::new(4900, 2);
    order.line_items = line_ids.iter().copied().map(line_item).collect();
    order
}

#[must_use]
pub fn variant(id: i64, is_master: bool) -> Variant {
    Variant {
        id: VariantId::new(id),
        product_id: ProductId::new(4),
        sku: format!("TEE-{id}"),
        name: "Pineapple Tee".to_string(),
        price: Decimal::new(2450, 2),
        is_master,
        image_url: None,
    }
}

/// Product 4, available since yesterday, master 40 and variant 41.
#[must_use]
pub fn product() -> Product {
    Product {
        id: ProductId::new(4),
        name: "Pineapple Tee".to_string(),
        description: Some("Soft cotton tee".to_string()),
        slug: "pineapple-tee".to_string(),
        available_on: Some(Utc::now() - Duration::days(1)),
        discontinue_on: None,
        deleted_at: None,
        master: variant(40, true),
        variants: vec![variant(41, false)],
    }
}
