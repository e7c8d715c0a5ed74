//! One synchronizer per entity type.
//!
//! A synchronizer wraps a borrowed local entity together with the transport
//! and policies. [`Synchronizer::sync`] performs the remote writes
//! unconditionally; [`Synchronizer::auto_sync`] is what commit triggers call,
//! and it first checks the enabled switch, the gate and the changed
//! attributes.

mod order;
mod product;
mod user;
mod variant;

pub use order::OrderSynchronizer;
pub use product::ProductSynchronizer;
pub use user::UserSynchronizer;
pub use variant::VariantSynchronizer;

use std::future::Future;

use mailchimp_sync_core::ChangeSet;
use tracing::debug;

use crate::conflict::Upserted;
use crate::error::SyncError;
use crate::policies::SyncPolicies;

/// What a sync call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// POST created the resource.
    Created,
    /// POST conflicted and PATCH updated the existing resource.
    Updated,
    /// PUT created or replaced the resource.
    Upserted,
    /// The remote resource was deleted.
    Deleted,
    /// Nothing was sent.
    Skipped(SkipReason),
}

impl From<Upserted> for SyncOutcome {
    fn from(upserted: Upserted) -> Self {
        match upserted {
            Upserted::Created => Self::Created,
            Upserted::Updated => Self::Updated,
        }
    }
}

/// Why an automatic sync sent nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Syncing is switched off.
    Disabled,
    /// The entity's gate rejected it.
    GateRejected,
    /// None of the synced attributes changed.
    Unchanged,
    /// The owning record is gone or soft-deleted.
    Orphaned,
}

/// Borrowed handles every synchronizer needs.
pub struct SyncContext<'a, T> {
    pub transport: &'a T,
    pub policies: &'a SyncPolicies,
}

impl<'a, T> SyncContext<'a, T> {
    #[must_use]
    pub const fn new(transport: &'a T, policies: &'a SyncPolicies) -> Self {
        Self {
            transport,
            policies,
        }
    }
}

impl<T> Clone for SyncContext<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SyncContext<'_, T> {}

/// Syncs one local entity to its Mailchimp counterpart.
pub trait Synchronizer: Sync {
    fn policies(&self) -> &SyncPolicies;

    /// Whether the entity's gate permits a sync.
    fn can_sync(&self) -> bool;

    /// Attributes whose change should trigger an automatic sync.
    fn synced_attributes(&self) -> &[String];

    /// Write the entity to Mailchimp.
    fn sync(&self) -> impl Future<Output = Result<SyncOutcome, SyncError>> + Send;

    /// Why an automatic sync would be skipped, if it would.
    fn skip_reason(&self, changes: &ChangeSet, force: bool) -> Option<SkipReason> {
        if !self.policies().enabled {
            Some(SkipReason::Disabled)
        } else if !self.can_sync() {
            Some(SkipReason::GateRejected)
        } else if !force && !changes.touches_any(self.synced_attributes()) {
            Some(SkipReason::Unchanged)
        } else {
            None
        }
    }

    /// Sync in response to a local commit.
    ///
    /// Skips without any request when syncing is disabled, the gate rejects
    /// the entity, or (unless `force`) no synced attribute is in `changes`.
    fn auto_sync(
        &self,
        changes: &ChangeSet,
        force: bool,
    ) -> impl Future<Output = Result<SyncOutcome, SyncError>> + Send {
        async move {
            if let Some(reason) = self.skip_reason(changes, force) {
                debug!(?reason, "Skipping sync");
                return Ok(SyncOutcome::Skipped(reason));
            }
            self.sync().await
        }
    }
}
