//! Mailchimp Sync - mirrors store records into Mailchimp's e-commerce API.
//!
//! After a local write commits, the store hands the record to a
//! [`SyncObserver`], which picks the matching synchronizer:
//!
//! - [`OrderSynchronizer`] keeps a cart while the order is open and an order
//!   once it completes, deleting the cart on completion and removing cart
//!   lines that no longer exist locally
//! - [`ProductSynchronizer`] and [`VariantSynchronizer`] create or update
//!   catalog entries, syncing a missing parent product on demand
//! - [`UserSynchronizer`] upserts or deletes the customer
//!
//! Every synchronizer checks its [`Gate`] and the changed attributes before
//! any request is made, and recovers from a known failure at most once.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`transport`] - The [`Transport`] seam and its reqwest implementation
//! - [`serializers`] - Entity to Mailchimp resource mapping
//! - [`policies`] - Per-entity gates, synced attributes and serializers
//! - [`synchronizers`] - Per-entity sync logic
//! - [`observer`] - Post-commit entry point

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod conflict;
pub mod error;
pub mod gate;
pub mod observer;
pub mod paths;
pub mod policies;
pub mod serializers;
pub mod synchronizers;
pub mod transport;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, MailchimpConfig};
pub use error::{RemoteError, SyncError};
pub use gate::{EmailAttribute, Gate};
pub use observer::{CommitEvent, CommitObserver, SyncObserver};
pub use policies::{EntityPolicy, SyncPolicies};
pub use synchronizers::{
    OrderSynchronizer, ProductSynchronizer, SkipReason, SyncContext, SyncOutcome, Synchronizer,
    UserSynchronizer, VariantSynchronizer,
};
pub use transport::{MailchimpClient, Method, RequestOptions, Transport};
