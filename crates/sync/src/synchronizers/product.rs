use mailchimp_sync_core::Product;
use tracing::{info, instrument};

use super::{SyncContext, SyncOutcome, Synchronizer, VariantSynchronizer};
use crate::conflict;
use crate::error::SyncError;
use crate::paths;
use crate::policies::SyncPolicies;
use crate::transport::Transport;

/// Syncs a [`Product`], variants included, to a Mailchimp product.
pub struct ProductSynchronizer<'a, T> {
    ctx: SyncContext<'a, T>,
    product: &'a Product,
}

impl<'a, T: Transport> ProductSynchronizer<'a, T> {
    #[must_use]
    pub const fn new(ctx: SyncContext<'a, T>, product: &'a Product) -> Self {
        Self { ctx, product }
    }

    #[must_use]
    pub fn path(&self) -> String {
        paths::product(&self.ctx.policies.products.serializer.external_id(self.product))
    }

    /// Sync every variant of the product, master first.
    ///
    /// Stops at the first failing variant.
    ///
    /// # Errors
    ///
    /// Returns the first variant sync error.
    #[instrument(skip(self), fields(product_id = %self.product.id))]
    pub async fn sync_all_variants(&self) -> Result<Vec<SyncOutcome>, SyncError> {
        let mut outcomes = Vec::with_capacity(self.product.variants.len() + 1);
        for variant in self.product.variants_including_master() {
            let outcome = VariantSynchronizer::new(self.ctx, self.product, variant)
                .sync()
                .await?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

impl<T: Transport> Synchronizer for ProductSynchronizer<'_, T> {
    fn policies(&self) -> &SyncPolicies {
        self.ctx.policies
    }

    fn can_sync(&self) -> bool {
        self.ctx.policies.products.gate.permits(self.product)
    }

    fn synced_attributes(&self) -> &[String] {
        &self.ctx.policies.products.synced_attributes
    }

    #[instrument(skip(self), fields(product_id = %self.product.id))]
    async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        let repr = self.ctx.policies.products.serializer.serialize(self.product);
        let upserted = conflict::upsert(
            self.ctx.transport,
            paths::PRODUCTS,
            &paths::product(&repr.id),
            &repr.to_body(),
        )
        .await?;
        info!(remote_id = %repr.id, ?upserted, "Synced Mailchimp product");
        Ok(upserted.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use mailchimp_sync_core::ChangeSet;

    use super::*;
    use crate::synchronizers::SkipReason;
    use crate::testing::{MockTransport, already_exists, product, remote_error};
    use crate::transport::Method;

    #[tokio::test]
    async fn test_sync_creates_product_with_variants() {
        let transport = MockTransport::new();
        let policies = SyncPolicies::default();
        let product = product();

        let outcome = ProductSynchronizer::new(SyncContext::new(&transport, &policies), &product)
            .sync()
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Created);
        assert_eq!(transport.calls(), vec![(Method::Post, "/products".to_string())]);
        let body = transport.body_of(0).unwrap();
        assert_eq!(body["id"], "4");
        assert_eq!(body["handle"], "pineapple-tee");
        assert_eq!(body["variants"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_second_sync_updates() {
        let transport = MockTransport::new();
        transport.respond(Method::Post, "/products", Err(already_exists()));
        let policies = SyncPolicies::default();
        let product = product();

        let outcome = ProductSynchronizer::new(SyncContext::new(&transport, &policies), &product)
            .sync()
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Updated);
        assert_eq!(
            transport.calls(),
            vec![
                (Method::Post, "/products".to_string()),
                (Method::Patch, "/products/4".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_auto_sync_skips_unavailable_product() {
        let transport = MockTransport::new();
        let policies = SyncPolicies::default();
        let mut product = product();
        product.available_on = Some(Utc::now() + Duration::days(7));
        let changes: ChangeSet = ["name"].into_iter().collect();

        let outcome = ProductSynchronizer::new(SyncContext::new(&transport, &policies), &product)
            .auto_sync(&changes, false)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Skipped(SkipReason::GateRejected));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_sync_all_variants_includes_master() {
        let transport = MockTransport::new();
        let policies = SyncPolicies::default();
        let product = product();

        let outcomes = ProductSynchronizer::new(SyncContext::new(&transport, &policies), &product)
            .sync_all_variants()
            .await
            .unwrap();

        assert_eq!(outcomes, vec![SyncOutcome::Upserted; 3]);
        assert_eq!(
            transport.calls(),
            vec![
                (Method::Put, "/products/4/variants/40".to_string()),
                (Method::Put, "/products/4/variants/41".to_string()),
                (Method::Put, "/products/4/variants/42".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_sync_all_variants_stops_at_first_error() {
        let transport = MockTransport::new();
        transport.respond(
            Method::Put,
            "/products/4/variants/41",
            Err(remote_error(400, serde_json::json!({ "title": "Invalid Resource" }))),
        );
        let policies = SyncPolicies::default();
        let product = product();

        let result = ProductSynchronizer::new(SyncContext::new(&transport, &policies), &product)
            .sync_all_variants()
            .await;

        assert!(result.is_err());
        assert_eq!(transport.count(Method::Put), 2);
    }
}
