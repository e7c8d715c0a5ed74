use mailchimp_sync_core::{Product, Variant};
use tracing::{info, instrument, warn};

use super::{ProductSynchronizer, SyncContext, SyncOutcome, Synchronizer};
use crate::conflict::MAX_ATTEMPTS;
use crate::error::SyncError;
use crate::paths;
use crate::policies::SyncPolicies;
use crate::transport::Transport;

/// Syncs a [`Variant`] to a Mailchimp product variant.
///
/// Variants are written with PUT under their product. If Mailchimp has no
/// such product yet, the product is synced first (regardless of its gate)
/// and the PUT retried once.
pub struct VariantSynchronizer<'a, T> {
    ctx: SyncContext<'a, T>,
    product: &'a Product,
    variant: &'a Variant,
}

impl<'a, T: Transport> VariantSynchronizer<'a, T> {
    #[must_use]
    pub const fn new(ctx: SyncContext<'a, T>, product: &'a Product, variant: &'a Variant) -> Self {
        Self {
            ctx,
            product,
            variant,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        let policies = self.ctx.policies;
        paths::variant(
            &policies.products.serializer.external_id(self.product),
            &policies.variants.serializer.external_id(self.variant),
        )
    }
}

impl<T: Transport> Synchronizer for VariantSynchronizer<'_, T> {
    fn policies(&self) -> &SyncPolicies {
        self.ctx.policies
    }

    fn can_sync(&self) -> bool {
        self.ctx.policies.variants.gate.permits(self.variant)
    }

    fn synced_attributes(&self) -> &[String] {
        &self.ctx.policies.variants.synced_attributes
    }

    #[instrument(skip(self), fields(product_id = %self.product.id, variant_id = %self.variant.id))]
    async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        let body = self.ctx.policies.variants.serializer.serialize(self.variant).to_body();
        let mut attempt = 1;
        loop {
            let path = self.path();
            match self.ctx.transport.put(&path, &body).await {
                Ok(_) => {
                    info!(%path, "Synced Mailchimp variant");
                    return Ok(SyncOutcome::Upserted);
                }
                Err(SyncError::Remote(e)) if attempt < MAX_ATTEMPTS && e.is_missing_parent() => {
                    warn!(error = %e, "Parent product missing, syncing product and retrying");
                    ProductSynchronizer::new(self.ctx, self.product).sync().await?;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
