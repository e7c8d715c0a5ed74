//! End-to-end order sync against a mock Mailchimp API.

use chrono::Utc;
use mailchimp_sync::{OrderSynchronizer, SyncOutcome, Synchronizer};
use mailchimp_sync_core::OrderState;
use mailchimp_sync_integration_tests::{
    AUTH_HEADER, TestStore, already_exists, cart, customer_not_synced, problem, store_path,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

// ============================================================================
// Cart Lifecycle
// ============================================================================

#[tokio::test]
async fn test_new_cart_is_posted_with_lines() {
    let store = TestStore::start().await;

    Mock::given(method("POST"))
        .and(path(store_path("/carts")))
        .and(header("authorization", AUTH_HEADER))
        .and(body_partial_json(json!({
            "id": "R100",
            "currency_code": "USD",
            "order_total": 49.0,
            "customer": { "id": "jo@example.com", "opt_in_status": true },
            "lines": [{ "id": "5", "product_id": "4", "product_variant_id": "41", "quantity": 2 }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "R100" })))
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path(store_path("/carts/R100")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "R100", "lines": [{ "id": "5" }] })),
        )
        .expect(1)
        .mount(&store.server)
        .await;

    let order = cart(&[5]);
    let outcome = OrderSynchronizer::new(store.ctx(), &order)
        .sync()
        .await
        .expect("Cart sync failed");

    assert_eq!(outcome, SyncOutcome::Created);
}

#[tokio::test]
async fn test_existing_cart_is_patched() {
    let store = TestStore::start().await;

    Mock::given(method("POST"))
        .and(path(store_path("/carts")))
        .respond_with(ResponseTemplate::new(400).set_body_json(already_exists()))
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(store_path("/carts/R100")))
        .and(body_partial_json(json!({ "id": "R100" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "R100" })))
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path(store_path("/carts/R100")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "lines": [] })))
        .mount(&store.server)
        .await;

    let order = cart(&[5]);
    let outcome = OrderSynchronizer::new(store.ctx(), &order)
        .sync()
        .await
        .expect("Cart sync failed");

    assert_eq!(outcome, SyncOutcome::Updated);
}

#[tokio::test]
async fn test_removed_lines_are_deleted_remotely() {
    let store = TestStore::start().await;

    Mock::given(method("POST"))
        .and(path(store_path("/carts")))
        .respond_with(ResponseTemplate::new(400).set_body_json(already_exists()))
        .mount(&store.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(store_path("/carts/R100")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path(store_path("/carts/R100")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "R100",
            "lines": [{ "id": "5" }, { "id": "6" }, { "id": "7" }]
        })))
        .mount(&store.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(store_path("/carts/R100/lines/6")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&store.server)
        .await;

    let order = cart(&[5, 7]);
    OrderSynchronizer::new(store.ctx(), &order)
        .sync()
        .await
        .expect("Cart sync failed");

    let deletes = store
        .server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "DELETE")
        .count();
    assert_eq!(deletes, 1);
}

#[tokio::test]
async fn test_emptied_cart_is_deleted_even_if_already_gone() {
    let store = TestStore::start().await;

    Mock::given(method("DELETE"))
        .and(path(store_path("/carts/R100")))
        .respond_with(ResponseTemplate::new(404).set_body_json(problem(
            404,
            "Resource Not Found",
            "The requested resource could not be found.",
        )))
        .expect(1)
        .mount(&store.server)
        .await;

    let order = cart(&[]);
    let outcome = OrderSynchronizer::new(store.ctx(), &order)
        .sync()
        .await
        .expect("Deleting an absent cart should succeed");

    assert_eq!(outcome, SyncOutcome::Deleted);
    let requests = store.server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
}

// ============================================================================
// Completion
// ============================================================================

#[tokio::test]
async fn test_completed_order_deletes_cart_then_posts_order() {
    let store = TestStore::start().await;

    Mock::given(method("DELETE"))
        .and(path(store_path("/carts/R100")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("POST"))
        .and(path(store_path("/orders")))
        .and(body_partial_json(json!({ "id": "R100" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "R100" })))
        .expect(1)
        .mount(&store.server)
        .await;

    let mut order = cart(&[5]);
    order.state = OrderState::Complete;
    order.completed_at = Some(Utc::now());

    let outcome = OrderSynchronizer::new(store.ctx(), &order)
        .sync()
        .await
        .expect("Order sync failed");
    assert_eq!(outcome, SyncOutcome::Created);

    let requests = store.server.received_requests().await.unwrap_or_default();
    let sequence: Vec<_> = requests
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect();
    assert_eq!(
        sequence,
        vec![
            ("DELETE".to_string(), store_path("/carts/R100")),
            ("POST".to_string(), store_path("/orders")),
        ]
    );
}

// ============================================================================
// Customer Recovery
// ============================================================================

#[tokio::test]
async fn test_unsynced_customer_is_synced_before_retry() {
    let store = TestStore::start().await;

    Mock::given(method("POST"))
        .and(path(store_path("/carts")))
        .respond_with(ResponseTemplate::new(400).set_body_json(customer_not_synced()))
        .up_to_n_times(1)
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("POST"))
        .and(path(store_path("/carts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "R100" })))
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(store_path("/customers/jo%40example.com")))
        .and(body_partial_json(json!({ "email_address": "Jo@Example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path(store_path("/carts/R100")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "lines": [{ "id": "5" }] })))
        .mount(&store.server)
        .await;

    let order = cart(&[5]);
    let outcome = OrderSynchronizer::new(store.ctx(), &order)
        .sync()
        .await
        .expect("Order sync failed");

    assert_eq!(outcome, SyncOutcome::Created);
}

#[tokio::test]
async fn test_customer_failure_after_retry_propagates() {
    let store = TestStore::start().await;

    Mock::given(method("POST"))
        .and(path(store_path("/carts")))
        .respond_with(ResponseTemplate::new(400).set_body_json(customer_not_synced()))
        .expect(2)
        .mount(&store.server)
        .await;
    Mock::given(method("PUT"))
        .and(path(store_path("/customers/jo%40example.com")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&store.server)
        .await;

    let order = cart(&[5]);
    let err = OrderSynchronizer::new(store.ctx(), &order)
        .sync()
        .await
        .expect_err("Second failure should propagate");

    let remote = err.remote().expect("Expected a Mailchimp error");
    assert_eq!(remote.status, 400);
    assert!(remote.is_customer_not_synced());
}
