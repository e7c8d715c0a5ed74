//! Local store records that are mirrored into Mailchimp.

pub mod order;
pub mod product;
pub mod user;

pub use order::{LineItem, Order};
pub use product::{Product, Variant};
pub use user::User;
