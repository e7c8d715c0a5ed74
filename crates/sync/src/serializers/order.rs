use mailchimp_sync_core::{LineItem, Order, to_remote_amount};
use serde_json::json;

use super::{CustomerSerializer, RemoteLine, RemoteRepresentation, Serializer, attributes};

/// Serializes an [`Order`] as a Mailchimp cart or order.
///
/// The external id is the order number, shared by the cart and order
/// representations.
#[derive(Debug, Clone, Default)]
pub struct OrderSerializer {
    customer: CustomerSerializer,
}

impl OrderSerializer {
    #[must_use]
    pub const fn new(customer: CustomerSerializer) -> Self {
        Self { customer }
    }

    fn line(item: &LineItem) -> RemoteLine {
        RemoteLine {
            id: item.id.to_string(),
            attributes: attributes(json!({
                "product_id": item.product_id.to_string(),
                "product_variant_id": item.variant_id.to_string(),
                "quantity": item.quantity,
                "price": to_remote_amount(item.price),
            })),
        }
    }
}

impl Serializer<Order> for OrderSerializer {
    fn serialize(&self, order: &Order) -> RemoteRepresentation {
        let mut attrs = attributes(json!({
            "currency_code": order.currency.code(),
            "order_total": to_remote_amount(order.total),
            "tax_total": to_remote_amount(order.tax_total),
        }));
        if let Some(user) = &order.user {
            attrs.insert("customer".to_string(), self.customer.embedded(user));
        }
        if let Some(completed_at) = order.completed_at {
            attrs.insert(
                "processed_at_foreign".to_string(),
                json!(completed_at.to_rfc3339()),
            );
        }

        let lines = order.line_items.iter().map(Self::line).collect();
        RemoteRepresentation::new(order.number.clone(), attrs).with_lines(lines)
    }
}
