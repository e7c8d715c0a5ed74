//! Mailchimp Marketing API client for the e-commerce store endpoints.
//!
//! # API Reference
//!
//! - Base URL: `https://<dc>.api.mailchimp.com/3.0`, where `<dc>` is the
//!   data-center suffix of the API key (`...-us6`)
//! - Authentication: HTTP basic auth, any username, API key as password
//! - Store resources live under `/ecommerce/stores/<store_id>`

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{Method, RequestOptions, Transport};
use crate::config::MailchimpConfig;
use crate::error::{RemoteError, SyncError};

/// Username sent with basic auth. Mailchimp ignores it.
const AUTH_USER: &str = "mailchimp-sync";

/// Mailchimp API client scoped to one e-commerce store.
#[derive(Clone)]
pub struct MailchimpClient {
    inner: Arc<MailchimpClientInner>,
}

struct MailchimpClientInner {
    client: reqwest::Client,
    api_key: SecretString,
    /// `<api root>/ecommerce/stores/<store_id>`, no trailing slash.
    store_url: String,
}

impl MailchimpClient {
    /// Create a new client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MailchimpConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            inner: Arc::new(MailchimpClientInner {
                client,
                api_key: config.api_key.clone(),
                store_url: config.store_url(),
            }),
        })
    }

    /// Root URL of the store resources.
    #[must_use]
    pub fn store_url(&self) -> &str {
        &self.inner.store_url
    }

    /// Parse a response into JSON or a [`RemoteError`].
    async fn handle_response(
        response: reqwest::Response,
        options: RequestOptions,
    ) -> Result<Value, SyncError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes)
                .map_err(|e| SyncError::Parse(format!("Failed to parse response: {e}")));
        }

        if status == StatusCode::NOT_FOUND && options.ignore_404 {
            debug!("Ignoring 404 response");
            return Ok(Value::Null);
        }

        // Problem details are JSON; proxies and outages may answer with text
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Err(RemoteError::from_response(status.as_u16(), body).into())
    }
}

impl Transport for MailchimpClient {
    #[instrument(skip(self, body), fields(method = %method))]
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<Value, SyncError> {
        let url = format!("{}{path}", self.inner.store_url);
        let http_method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut request = self
            .inner
            .client
            .request(http_method, &url)
            .basic_auth(AUTH_USER, Some(self.inner.api_key.expose_secret()));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        debug!(status = response.status().as_u16(), "Mailchimp responded");
        Self::handle_response(response, options).await
    }
}

impl std::fmt::Debug for MailchimpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailchimpClient")
            .field("store_url", &self.inner.store_url)
            .finish_non_exhaustive()
    }
}
