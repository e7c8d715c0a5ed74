//! Post-commit hook the storage layer calls after each write.
//!
//! The store publishes a [`CommitEvent`] once a write has committed;
//! [`SyncObserver`] turns it into the matching automatic sync.

use std::future::Future;

use mailchimp_sync_core::{ChangeSet, Order, Product, User, Variant};
use tracing::debug;

use crate::error::SyncError;
use crate::policies::SyncPolicies;
use crate::synchronizers::{
    OrderSynchronizer, ProductSynchronizer, SkipReason, SyncContext, SyncOutcome, Synchronizer,
    UserSynchronizer, VariantSynchronizer,
};
use crate::transport::Transport;

/// A committed local write.
#[derive(Debug, Clone, Copy)]
pub enum CommitEvent<'a> {
    Order {
        order: &'a Order,
        changes: &'a ChangeSet,
    },
    /// A line item was added, changed or removed. `order` is `None` when the
    /// owning order no longer exists.
    LineItem { order: Option<&'a Order> },
    Product {
        product: &'a Product,
        changes: &'a ChangeSet,
    },
    /// `product` is `None` when the owning product no longer exists.
    Variant {
        product: Option<&'a Product>,
        variant: &'a Variant,
        changes: &'a ChangeSet,
    },
    User {
        user: &'a User,
        changes: &'a ChangeSet,
    },
}

/// Receives commit notifications from the storage layer.
pub trait CommitObserver: Send + Sync {
    fn after_commit(
        &self,
        event: CommitEvent<'_>,
    ) -> impl Future<Output = Result<SyncOutcome, SyncError>> + Send;
}

/// Syncs each committed entity to Mailchimp.
#[derive(Debug, Clone)]
pub struct SyncObserver<T> {
    transport: T,
    policies: SyncPolicies,
}

impl<T: Transport> SyncObserver<T> {
    pub const fn new(transport: T, policies: SyncPolicies) -> Self {
        Self {
            transport,
            policies,
        }
    }

    pub const fn context(&self) -> SyncContext<'_, T> {
        SyncContext::new(&self.transport, &self.policies)
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub const fn policies(&self) -> &SyncPolicies {
        &self.policies
    }
}

impl<T: Transport> CommitObserver for SyncObserver<T> {
    async fn after_commit(&self, event: CommitEvent<'_>) -> Result<SyncOutcome, SyncError> {
        let ctx = self.context();
        match event {
            CommitEvent::Order { order, changes } => {
                OrderSynchronizer::new(ctx, order).auto_sync(changes, false).await
            }
            // Line item edits can leave every order attribute unchanged.
            CommitEvent::LineItem { order: Some(order) } => {
                OrderSynchronizer::new(ctx, order)
                    .auto_sync(&ChangeSet::new(), true)
                    .await
            }
            CommitEvent::Product { product, changes } => {
                ProductSynchronizer::new(ctx, product)
                    .auto_sync(changes, false)
                    .await
            }
            CommitEvent::Variant {
                product: Some(product),
                variant,
                changes,
            } if !product.is_deleted() => {
                VariantSynchronizer::new(ctx, product, variant)
                    .auto_sync(changes, false)
                    .await
            }
            CommitEvent::User { user, changes } => {
                UserSynchronizer::new(ctx, user).auto_sync(changes, false).await
            }
            CommitEvent::LineItem { order: None } | CommitEvent::Variant { .. } => {
                debug!("Owning record gone, skipping sync");
                Ok(SyncOutcome::Skipped(SkipReason::Orphaned))
            }
        }
    }
}
