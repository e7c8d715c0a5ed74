//! Orders and their line items.
//!
//! An incomplete order is a shopping cart. Mailchimp models the two
//! separately, so the synchronizer needs to know which one an order is.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::User;
use crate::types::{CurrencyCode, LineItemId, OrderId, OrderState, ProductId, VariantId};

/// A store order. While incomplete it is the customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Public order number (e.g. `R123456789`).
    pub number: String,
    #[serde(default)]
    pub state: OrderState,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub item_total: Decimal,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub tax_total: Decimal,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Order {
    /// Create an empty cart.
    #[must_use]
    pub fn new(id: OrderId, number: impl Into<String>) -> Self {
        Self {
            id,
            number: number.into(),
            state: OrderState::Cart,
            completed_at: None,
            currency: CurrencyCode::default(),
            item_total: Decimal::ZERO,
            total: Decimal::ZERO,
            tax_total: Decimal::ZERO,
            user: None,
            line_items: Vec::new(),
        }
    }

    /// Whether the order has finished checkout.
    ///
    /// Both the completion timestamp and the state are checked: during the
    /// commit that completes an order, `state` can already be `complete`
    /// while `completed_at` is still unset.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some() || self.state == OrderState::Complete
    }

    /// Whether the order has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price.
    pub price: Decimal,
}
