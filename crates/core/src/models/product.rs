//! Products and their purchasable variants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, VariantId};

/// A catalog product.
///
/// Every product has a master variant carrying its default SKU and price,
/// plus zero or more option variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// URL slug.
    pub slug: String,
    /// When the product becomes purchasable. `None` means never.
    #[serde(default)]
    pub available_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discontinue_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub master: Variant,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// Whether the product can be bought at `now`.
    #[must_use]
    pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_deleted()
            && self.available_on.is_some_and(|on| on <= now)
            && self.discontinue_on.is_none_or(|off| off > now)
    }

    /// Whether the product can be bought right now.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.is_available_at(Utc::now())
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The master variant followed by every option variant.
    pub fn variants_including_master(&self) -> impl Iterator<Item = &Variant> {
        std::iter::once(&self.master).chain(self.variants.iter())
    }

    /// Look up a variant (master included) by id.
    #[must_use]
    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variants_including_master().find(|v| v.id == id)
    }
}

/// A purchasable SKU of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    #[serde(default)]
    pub sku: String,
    /// Display name, usually the product name plus option values.
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub is_master: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}
