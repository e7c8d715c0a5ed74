//! Errors raised while synchronizing with Mailchimp.

use serde_json::Value;
use thiserror::Error;

/// `detail` fragment Mailchimp uses when a POST collides with an existing id.
const ALREADY_EXISTS: &str = "already exists";

/// `title` Mailchimp uses when a variant is written under an unknown product.
pub const PARENT_PRODUCT_MISSING: &str = "Parent Product Does Not Exist";

/// Field errors that mean the order's customer is unknown to Mailchimp.
const CUSTOMER_FIELDS: &[&str] = &["customer.email_address", "customer.opt_in_status"];

/// Errors that can occur while synchronizing an entity.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Mailchimp answered with a non-success status.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The API key cannot be used to build requests.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),
}

impl SyncError {
    /// The remote error, if Mailchimp produced one.
    #[must_use]
    pub const fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(e) => Some(e),
            _ => None,
        }
    }
}

/// A problem-detail response from the Mailchimp API.
///
/// Mailchimp reports failures as `application/problem+json` with `title`,
/// `detail`, `status` and, for validation failures, an `errors` array of
/// `{field, message}` objects. The parsed body is kept in `response`.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Mailchimp API error: {status} {title} - {detail}")]
pub struct RemoteError {
    pub status: u16,
    pub title: String,
    pub detail: String,
    pub response: Value,
}

impl RemoteError {
    /// Build an error from a status and the parsed response body.
    #[must_use]
    pub fn from_response(status: u16, response: Value) -> Self {
        let text = |key: &str| {
            response
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            status,
            title: text("title"),
            detail: text("detail"),
            response,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// A create collided with an existing resource.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        self.status == 400 && self.detail.contains(ALREADY_EXISTS)
    }

    /// A variant write referenced a product Mailchimp does not have.
    #[must_use]
    pub fn is_missing_parent(&self) -> bool {
        self.status == 400 && self.title == PARENT_PRODUCT_MISSING
    }

    /// An order write was rejected because its customer is not synced.
    #[must_use]
    pub fn is_customer_not_synced(&self) -> bool {
        self.status == 400
            && self
                .field_errors()
                .any(|field| CUSTOMER_FIELDS.contains(&field))
    }

    /// Field names listed in the response's `errors` array.
    pub fn field_errors(&self) -> impl Iterator<Item = &str> {
        self.response
            .get("errors")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|e| e.get("field").and_then(Value::as_str))
    }
}
