//! Store customer accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A store user account, synced as a Mailchimp customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Login email. May be blank for guest-converted or imported accounts.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Whether the user opted in to marketing email.
    #[serde(default)]
    pub accepts_marketing: bool,
    /// Set when the account is soft-deleted.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a live user with the given email.
    #[must_use]
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: Some(email.into()),
            first_name: None,
            last_name: None,
            accepts_marketing: false,
            deleted_at: None,
        }
    }

    /// Whether the account has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
