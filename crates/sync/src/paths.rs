//! Remote resource paths for each synced entity.
//!
//! Paths are relative to the store root. Every segment built from an
//! external id is percent-escaped, since ids derived from emails or SKUs may
//! contain `@`, `/` or spaces.

use std::borrow::Cow;

/// Percent-escape one path segment.
#[must_use]
pub fn escape(segment: &str) -> Cow<'_, str> {
    urlencoding::encode(segment)
}

pub const CARTS: &str = "/carts";
pub const ORDERS: &str = "/orders";
pub const PRODUCTS: &str = "/products";
pub const CUSTOMERS: &str = "/customers";

#[must_use]
pub fn cart(cart_id: &str) -> String {
    format!("{CARTS}/{}", escape(cart_id))
}

#[must_use]
pub fn cart_line(cart_id: &str, line_id: &str) -> String {
    format!("{}/lines/{}", cart(cart_id), escape(line_id))
}

#[must_use]
pub fn order(order_id: &str) -> String {
    format!("{ORDERS}/{}", escape(order_id))
}

/// Where an order lives remotely: `/orders/{id}` once complete, otherwise `/carts/{id}`.
#[must_use]
pub fn order_or_cart(order_id: &str, complete: bool) -> String {
    if complete { order(order_id) } else { cart(order_id) }
}

/// Collection an order is created in.
#[must_use]
pub const fn order_or_cart_collection(complete: bool) -> &'static str {
    if complete { ORDERS } else { CARTS }
}

#[must_use]
pub fn product(product_id: &str) -> String {
    format!("{PRODUCTS}/{}", escape(product_id))
}

#[must_use]
pub fn variant(product_id: &str, variant_id: &str) -> String {
    format!("{}/variants/{}", product(product_id), escape(variant_id))
}

#[must_use]
pub fn customer(customer_id: &str) -> String {
    format!("{CUSTOMERS}/{}", escape(customer_id))
}
