//! Create-or-update against resources whose remote existence is unknown.
//!
//! Nothing is stored locally about what has been synced before. Existence
//! is discovered from Mailchimp's own conflict response, which keeps syncs
//! idempotent across crashes and out-of-band remote edits.

use serde_json::Value;
use tracing::debug;

use crate::error::SyncError;
use crate::transport::Transport;

/// Attempts allowed per recoverable failure class: the first try plus one
/// retry after recovery.
pub const MAX_ATTEMPTS: u32 = 2;

/// Which branch an upsert took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

/// POST `body` to `create_path`; if Mailchimp reports the resource already
/// exists, PATCH the same body to `update_path` instead.
///
/// # Errors
///
/// Returns the create error unchanged unless it is an "already exists"
/// conflict, or the update error.
pub async fn upsert<T: Transport>(
    transport: &T,
    create_path: &str,
    update_path: &str,
    body: &Value,
) -> Result<Upserted, SyncError> {
    match transport.post(create_path, body).await {
        Ok(_) => Ok(Upserted::Created),
        Err(SyncError::Remote(e)) if e.is_already_exists() => {
            debug!(path = update_path, "Resource already exists, updating instead");
            transport.patch(update_path, body).await?;
            Ok(Upserted::Updated)
        }
        Err(e) => Err(e),
    }
}
