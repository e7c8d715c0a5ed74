//! Mailchimp Sync Core - Store entity model.
//!
//! This crate provides the local records the synchronizer mirrors into
//! Mailchimp's e-commerce API:
//! - [`Order`] with its [`LineItem`]s (a Mailchimp cart or order)
//! - [`Product`] and its [`Variant`]s
//! - [`User`] (a Mailchimp customer)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O and no HTTP clients. The
//! storage layer builds these records and hands them to the `mailchimp-sync`
//! engine after a commit.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, order states, currency and change tracking
//! - [`models`] - The syncable store records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
