//! Request plumbing between the synchronizers and Mailchimp.
//!
//! Synchronizers only ever talk to a [`Transport`]. [`MailchimpClient`] is
//! the production implementation; tests substitute an in-memory recorder.

mod client;

pub use client::MailchimpClient;

use std::future::Future;

use serde_json::Value;

use crate::error::SyncError;

/// HTTP verbs used against the e-commerce API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Treat a 404 response as success with a `null` body.
    pub ignore_404: bool,
}

impl RequestOptions {
    #[must_use]
    pub const fn ignore_404() -> Self {
        Self { ignore_404: true }
    }
}

/// Performs requests against the store's e-commerce API.
///
/// `path` is relative to the store root (e.g. `/carts/R100`). Success
/// returns the parsed JSON body (`null` when empty). Non-success responses
/// return [`SyncError::Remote`] unless the status is 404 and
/// [`RequestOptions::ignore_404`] is set.
pub trait Transport: Send + Sync {
    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> impl Future<Output = Result<Value, SyncError>> + Send;

    fn get(&self, path: &str) -> impl Future<Output = Result<Value, SyncError>> + Send {
        self.request(Method::Get, path, None, RequestOptions::default())
    }

    fn post(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Value, SyncError>> + Send {
        self.request(Method::Post, path, Some(body), RequestOptions::default())
    }

    fn patch(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Value, SyncError>> + Send {
        self.request(Method::Patch, path, Some(body), RequestOptions::default())
    }

    fn put(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Value, SyncError>> + Send {
        self.request(Method::Put, path, Some(body), RequestOptions::default())
    }

    fn delete(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> impl Future<Output = Result<Value, SyncError>> + Send {
        self.request(Method::Delete, path, None, options)
    }
}
