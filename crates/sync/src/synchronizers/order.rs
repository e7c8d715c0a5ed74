use std::collections::HashSet;

use mailchimp_sync_core::Order;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{SyncContext, SyncOutcome, Synchronizer, UserSynchronizer};
use crate::conflict::{self, MAX_ATTEMPTS};
use crate::error::SyncError;
use crate::paths;
use crate::policies::SyncPolicies;
use crate::serializers::RemoteRepresentation;
use crate::transport::{RequestOptions, Transport};

/// Syncs an [`Order`] as a Mailchimp cart while incomplete and as a
/// Mailchimp order once complete.
///
/// Only one of the two representations is kept live: completing an order
/// deletes its cart, and an order with no line items is deleted outright.
pub struct OrderSynchronizer<'a, T> {
    ctx: SyncContext<'a, T>,
    order: &'a Order,
}

impl<'a, T: Transport> OrderSynchronizer<'a, T> {
    #[must_use]
    pub const fn new(ctx: SyncContext<'a, T>, order: &'a Order) -> Self {
        Self { ctx, order }
    }

    /// Current remote path: the order path once complete, else the cart path.
    #[must_use]
    pub fn path(&self) -> String {
        let id = self.ctx.policies.orders.serializer.external_id(self.order);
        paths::order_or_cart(&id, self.order.is_complete())
    }

    async fn sync_once(&self) -> Result<SyncOutcome, SyncError> {
        let repr = self.ctx.policies.orders.serializer.serialize(self.order);
        let cart_path = paths::cart(&repr.id);
        let transport = self.ctx.transport;

        if self.order.is_empty() {
            transport.delete(&cart_path, RequestOptions::ignore_404()).await?;
            info!(order_id = %repr.id, "Deleted empty Mailchimp cart");
            return Ok(SyncOutcome::Deleted);
        }

        let complete = self.order.is_complete();
        if complete {
            transport.delete(&cart_path, RequestOptions::ignore_404()).await?;
        }

        let upserted = conflict::upsert(
            transport,
            paths::order_or_cart_collection(complete),
            &paths::order_or_cart(&repr.id, complete),
            &repr.to_body(),
        )
        .await?;
        info!(order_id = %repr.id, complete, ?upserted, "Synced Mailchimp order");

        if !complete {
            self.remove_stale_lines(&repr, &cart_path).await?;
        }
        Ok(upserted.into())
    }

    /// Delete remote cart lines that are no longer on the local order.
    async fn remove_stale_lines(
        &self,
        repr: &RemoteRepresentation,
        cart_path: &str,
    ) -> Result<(), SyncError> {
        let remote = self.ctx.transport.get(cart_path).await?;
        let local: HashSet<&str> = repr.line_ids().collect();

        for line_id in remote_line_ids(&remote) {
            if local.contains(line_id.as_str()) {
                continue;
            }
            debug!(order_id = %repr.id, %line_id, "Removing stale cart line");
            self.ctx
                .transport
                .delete(&paths::cart_line(&repr.id, &line_id), RequestOptions::ignore_404())
                .await?;
        }
        Ok(())
    }
}

/// Line ids of a remote cart. Mailchimp returns them as strings, but numeric
/// ids are accepted too so that a line is never left behind unmatched.
fn remote_line_ids(cart: &Value) -> impl Iterator<Item = String> + '_ {
    cart.get("lines")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|line| match line.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
}

impl<T: Transport> Synchronizer for OrderSynchronizer<'_, T> {
    fn policies(&self) -> &SyncPolicies {
        self.ctx.policies
    }

    fn can_sync(&self) -> bool {
        self.ctx.policies.orders.gate.permits(self.order)
    }

    fn synced_attributes(&self) -> &[String] {
        &self.ctx.policies.orders.synced_attributes
    }

    /// Sync the order, syncing its customer first if Mailchimp rejects the
    /// embedded customer. The order is retried at most once.
    #[instrument(skip(self), fields(order_number = %self.order.number))]
    async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        let mut attempt = 1;
        loop {
            match self.sync_once().await {
                Err(SyncError::Remote(e))
                    if attempt < MAX_ATTEMPTS && e.is_customer_not_synced() =>
                {
                    let Some(user) = &self.order.user else {
                        return Err(e.into());
                    };
                    warn!(error = %e, "Customer not synced, syncing customer and retrying order");
                    UserSynchronizer::new(self.ctx, user).sync().await?;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
