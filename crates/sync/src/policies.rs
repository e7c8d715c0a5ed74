//! Per-entity-type sync configuration.
//!
//! Each entity type gets an [`EntityPolicy`]: the gate deciding whether it may
//! sync, the attributes whose change triggers an automatic sync, and the
//! serializer that maps it to Mailchimp. [`SyncPolicies`] bundles the four
//! policies and is handed to every synchronizer at construction.

use std::sync::Arc;

use mailchimp_sync_core::{Order, Product, User, Variant};

use crate::config::MailchimpConfig;
use crate::gate::{self, EmailAttribute, Gate};
use crate::serializers::{
    CustomerSerializer, OrderSerializer, ProductSerializer, Serializer, VariantSerializer,
};

/// Order writes that change these attributes trigger a sync. Line item
/// changes are caught separately since swapping one item for another of the
/// same price leaves all of them unchanged.
pub const ORDER_SYNCED_ATTRIBUTES: &[&str] = &["state", "total", "tax_total"];
pub const PRODUCT_SYNCED_ATTRIBUTES: &[&str] = &["name", "description", "slug", "available_on"];
pub const VARIANT_SYNCED_ATTRIBUTES: &[&str] = &["id", "sku"];
pub const USER_SYNCED_ATTRIBUTES: &[&str] = &["email"];

/// Sync configuration for one entity type.
pub struct EntityPolicy<E> {
    pub gate: Gate<E>,
    pub synced_attributes: Vec<String>,
    pub serializer: Arc<dyn Serializer<E>>,
}

impl<E> EntityPolicy<E> {
    pub fn new<S>(gate: Gate<E>, synced_attributes: &[&str], serializer: S) -> Self
    where
        S: Serializer<E> + 'static,
    {
        Self {
            gate,
            synced_attributes: synced_attributes.iter().map(ToString::to_string).collect(),
            serializer: Arc::new(serializer),
        }
    }

    #[must_use]
    pub fn with_gate(mut self, gate: Gate<E>) -> Self {
        self.gate = gate;
        self
    }

    #[must_use]
    pub fn with_serializer<S>(mut self, serializer: S) -> Self
    where
        S: Serializer<E> + 'static,
    {
        self.serializer = Arc::new(serializer);
        self
    }

    #[must_use]
    pub fn with_synced_attributes(mut self, attributes: &[&str]) -> Self {
        self.synced_attributes = attributes.iter().map(ToString::to_string).collect();
        self
    }
}

impl<E> Clone for EntityPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            synced_attributes: self.synced_attributes.clone(),
            serializer: Arc::clone(&self.serializer),
        }
    }
}

impl<E> std::fmt::Debug for EntityPolicy<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityPolicy")
            .field("synced_attributes", &self.synced_attributes)
            .finish_non_exhaustive()
    }
}

/// Sync configuration for every entity type.
#[derive(Debug, Clone)]
pub struct SyncPolicies {
    /// When false, every automatic sync is skipped.
    pub enabled: bool,
    pub orders: EntityPolicy<Order>,
    pub products: EntityPolicy<Product>,
    pub variants: EntityPolicy<Variant>,
    pub users: EntityPolicy<User>,
}

impl SyncPolicies {
    /// Default policies reading customer emails through `email`.
    #[must_use]
    pub fn with_email_attribute(email: EmailAttribute) -> Self {
        let customer = CustomerSerializer::new(email.clone());
        Self {
            enabled: true,
            orders: EntityPolicy::new(
                gate::order_has_customer(email.clone()),
                ORDER_SYNCED_ATTRIBUTES,
                OrderSerializer::new(customer.clone()),
            ),
            products: EntityPolicy::new(
                gate::product_is_available(),
                PRODUCT_SYNCED_ATTRIBUTES,
                ProductSerializer::default(),
            ),
            variants: EntityPolicy::new(
                gate::variant_always(),
                VARIANT_SYNCED_ATTRIBUTES,
                VariantSerializer,
            ),
            users: EntityPolicy::new(gate::user_has_email(email), USER_SYNCED_ATTRIBUTES, customer),
        }
    }

    /// Default policies, switched on or off by the configuration.
    #[must_use]
    pub fn from_config(config: &MailchimpConfig) -> Self {
        Self::default().enabled(config.enabled)
    }

    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for SyncPolicies {
    fn default() -> Self {
        Self::with_email_attribute(EmailAttribute::default())
    }
}
