//! Core types for the synchronizer.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod changes;
pub mod id;
pub mod price;
pub mod status;

pub use changes::ChangeSet;
pub use id::*;
pub use price::{CurrencyCode, to_remote_amount};
pub use status::{OrderState, OrderStateError};
