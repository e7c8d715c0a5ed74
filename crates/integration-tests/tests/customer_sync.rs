//! End-to-end customer sync and post-commit dispatch.

use chrono::Utc;
use mailchimp_sync::{
    CommitEvent, CommitObserver, SkipReason, SyncObserver, SyncOutcome, SyncPolicies,
    Synchronizer, UserSynchronizer,
};
use mailchimp_sync_core::ChangeSet;
use mailchimp_sync_integration_tests::{TestStore, cart, product, store_path, user};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

// ============================================================================
// Customers
// ============================================================================

#[tokio::test]
async fn test_customer_is_put_by_lowercased_email() {
    let store = TestStore::start().await;

    Mock::given(method("PUT"))
        .and(path(store_path("/customers/jo%40example.com")))
        .and(body_json(json!({
            "id": "jo@example.com",
            "email_address": "Jo@Example.com",
            "opt_in_status": true,
            "first_name": "Jo"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "jo@example.com" })))
        .expect(1)
        .mount(&store.server)
        .await;

    let user = user();
    let outcome = UserSynchronizer::new(store.ctx(), &user)
        .sync()
        .await
        .expect("Customer sync failed");

    assert_eq!(outcome, SyncOutcome::Upserted);
}

#[tokio::test]
async fn test_soft_deleted_user_deletes_customer() {
    let store = TestStore::start().await;

    Mock::given(method("DELETE"))
        .and(path(store_path("/customers/jo%40example.com")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&store.server)
        .await;

    let mut user = user();
    user.deleted_at = Some(Utc::now());
    let outcome = UserSynchronizer::new(store.ctx(), &user)
        .sync()
        .await
        .expect("Customer delete failed");

    assert_eq!(outcome, SyncOutcome::Deleted);
}

// ============================================================================
// Commit Observer
// ============================================================================

#[tokio::test]
async fn test_line_item_commit_syncs_cart() {
    let store = TestStore::start().await;

    Mock::given(method("POST"))
        .and(path(store_path("/carts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "R100" })))
        .expect(1)
        .mount(&store.server)
        .await;
    Mock::given(method("GET"))
        .and(path(store_path("/carts/R100")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "lines": [{ "id": "5" }] })))
        .expect(1)
        .mount(&store.server)
        .await;

    let observer = SyncObserver::new(store.client.clone(), store.policies.clone());
    let order = cart(&[5]);
    let outcome = observer
        .after_commit(CommitEvent::LineItem { order: Some(&order) })
        .await
        .expect("Observer sync failed");

    assert_eq!(outcome, SyncOutcome::Created);
}

#[tokio::test]
async fn test_unrelated_changes_send_nothing() {
    let store = TestStore::start().await;
    let observer = SyncObserver::new(store.client.clone(), store.policies.clone());

    let product = product();
    let changes: ChangeSet = ["meta_keywords"].into_iter().collect();
    let outcome = observer
        .after_commit(CommitEvent::Product {
            product: &product,
            changes: &changes,
        })
        .await
        .expect("Observer sync failed");

    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::Unchanged));
    let requests = store.server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_disabled_sync_sends_nothing() {
    let store = TestStore::start().await;
    let observer = SyncObserver::new(store.client.clone(), SyncPolicies::default().enabled(false));

    let user = user();
    let changes: ChangeSet = ["email"].into_iter().collect();
    let outcome = observer
        .after_commit(CommitEvent::User {
            user: &user,
            changes: &changes,
        })
        .await
        .expect("Observer sync failed");

    assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::Disabled));
    let requests = store.server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}
