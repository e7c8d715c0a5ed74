use mailchimp_sync_core::{Product, Variant, to_remote_amount};
use serde_json::{Value, json};

use super::{RemoteRepresentation, Serializer, attributes};

/// Serializes a [`Variant`] as a Mailchimp product variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantSerializer;

impl Serializer<Variant> for VariantSerializer {
    fn serialize(&self, variant: &Variant) -> RemoteRepresentation {
        let mut attrs = attributes(json!({
            "title": variant.name,
            "sku": variant.sku,
            "price": to_remote_amount(variant.price),
        }));
        if let Some(image_url) = &variant.image_url {
            attrs.insert("image_url".to_string(), json!(image_url));
        }
        RemoteRepresentation::new(variant.id.to_string(), attrs)
    }
}

/// Serializes a [`Product`], with all of its variants, as a Mailchimp product.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductSerializer {
    variant: VariantSerializer,
}

impl Serializer<Product> for ProductSerializer {
    fn serialize(&self, product: &Product) -> RemoteRepresentation {
        let variants: Vec<Value> = product
            .variants_including_master()
            .map(|v| self.variant.serialize(v).to_body())
            .collect();
        let mut attrs = attributes(json!({
            "title": product.name,
            "handle": product.slug,
            "description": product.description.as_deref().unwrap_or_default(),
            "variants": variants,
        }));
        if let Some(available_on) = product.available_on {
            attrs.insert(
                "published_at_foreign".to_string(),
                json!(available_on.to_rfc3339()),
            );
        }
        RemoteRepresentation::new(product.id.to_string(), attrs)
    }
}
