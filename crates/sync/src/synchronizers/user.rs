use mailchimp_sync_core::User;
use tracing::{info, instrument};

use super::{SyncContext, SyncOutcome, Synchronizer};
use crate::error::SyncError;
use crate::paths;
use crate::policies::SyncPolicies;
use crate::transport::{RequestOptions, Transport};

/// Syncs a [`User`] to a Mailchimp customer.
///
/// Mailchimp customers support create-or-replace by PUT, so no conflict
/// handling is needed. Soft-deleted users are deleted remotely.
pub struct UserSynchronizer<'a, T> {
    ctx: SyncContext<'a, T>,
    user: &'a User,
}

impl<'a, T: Transport> UserSynchronizer<'a, T> {
    #[must_use]
    pub const fn new(ctx: SyncContext<'a, T>, user: &'a User) -> Self {
        Self { ctx, user }
    }

    #[must_use]
    pub fn customer_id(&self) -> String {
        self.ctx.policies.users.serializer.external_id(self.user)
    }

    #[must_use]
    pub fn path(&self) -> String {
        paths::customer(&self.customer_id())
    }
}

impl<T: Transport> Synchronizer for UserSynchronizer<'_, T> {
    fn policies(&self) -> &SyncPolicies {
        self.ctx.policies
    }

    fn can_sync(&self) -> bool {
        self.ctx.policies.users.gate.permits(self.user)
    }

    fn synced_attributes(&self) -> &[String] {
        &self.ctx.policies.users.synced_attributes
    }

    #[instrument(skip(self), fields(user_id = %self.user.id))]
    async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        let repr = self.ctx.policies.users.serializer.serialize(self.user);
        let path = paths::customer(&repr.id);

        if self.user.is_deleted() {
            self.ctx
                .transport
                .delete(&path, RequestOptions::default())
                .await?;
            info!(customer_id = %repr.id, "Deleted Mailchimp customer");
            return Ok(SyncOutcome::Deleted);
        }

        self.ctx.transport.put(&path, &repr.to_body()).await?;
        info!(customer_id = %repr.id, "Synced Mailchimp customer");
        Ok(SyncOutcome::Upserted)
    }
}
