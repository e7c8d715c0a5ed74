//! In-memory transport for synchronizer tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use mailchimp_sync_core::{Product, ProductId, Variant, VariantId};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::error::{RemoteError, SyncError};
use crate::transport::{Method, RequestOptions, Transport};

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub options: RequestOptions,
}

type Reply = Result<Value, RemoteError>;

/// Records requests and replays queued replies per `(method, path)`.
///
/// Unscripted requests succeed with `{}`. A queued 404 is turned into a
/// `null` success when the request set `ignore_404`.
#[derive(Debug, Default)]
pub struct MockTransport {
    requests: Mutex<Vec<Request>>,
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply for the next `method` request to `path`.
    pub fn respond(&self, method: Method, path: &str, reply: Reply) {
        lock(&self.replies)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<Request> {
        lock(&self.requests).clone()
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect()
    }

    pub fn body_of(&self, index: usize) -> Option<Value> {
        self.requests().get(index).and_then(|r| r.body.clone())
    }

    pub fn count(&self, method: Method) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }
}

impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<Value, SyncError> {
        lock(&self.requests).push(Request {
            method,
            path: path.to_string(),
            body: body.cloned(),
            options,
        });

        let reply = lock(&self.replies)
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(json!({})));

        match reply {
            Err(e) if e.is_not_found() && options.ignore_404 => Ok(Value::Null),
            other => other.map_err(SyncError::from),
        }
    }
}

pub fn remote_error(status: u16, body: Value) -> RemoteError {
    RemoteError::from_response(status, body)
}

pub fn already_exists() -> RemoteError {
    remote_error(
        400,
        json!({
            "title": "Bad Request",
            "status": 400,
            "detail": "A resource with the provided ID already exists in the account."
        }),
    )
}

pub fn not_found() -> RemoteError {
    remote_error(
        404,
        json!({
            "title": "Resource Not Found",
            "status": 404,
            "detail": "The requested resource could not be found."
        }),
    )
}

pub fn missing_parent() -> RemoteError {
    remote_error(
        400,
        json!({
            "title": "Parent Product Does Not Exist",
            "status": 400,
            "detail": "The product with the provided ID does not exist."
        }),
    )
}

pub fn customer_not_synced() -> RemoteError {
    remote_error(
        400,
        json!({
            "title": "Invalid Resource",
            "status": 400,
            "detail": "The resource submitted could not be validated.",
            "errors": [{
                "field": "customer.email_address",
                "message": "This value should not be blank."
            }]
        }),
    )
}

pub fn variant(id: i64, product_id: i64, is_master: bool) -> Variant {
    Variant {
        id: VariantId::new(id),
        product_id: ProductId::new(product_id),
        sku: format!("TEE-{id}"),
        name: "Pineapple Tee".to_string(),
        price: Decimal::new(2450, 2),
        is_master,
        image_url: None,
    }
}

/// Product 4 with master variant 40 and option variants 41 and 42,
/// available since yesterday.
pub fn product() -> Product {
    Product {
        id: ProductId::new(4),
        name: "Pineapple Tee".to_string(),
        description: None,
        slug: "pineapple-tee".to_string(),
        available_on: Some(Utc::now() - Duration::days(1)),
        discontinue_on: None,
        deleted_at: None,
        master: variant(40, 4, true),
        variants: vec![variant(41, 4, false), variant(42, 4, false)],
    }
}
