//! Preconditions evaluated before any sync request is made.
//!
//! A [`Gate`] is a pure predicate over a local entity. When it rejects, the
//! sync is skipped silently and nothing is sent to Mailchimp.

use std::sync::Arc;

use mailchimp_sync_core::{Order, Product, User, Variant};

type Predicate<E> = dyn Fn(&E) -> bool + Send + Sync;

/// A pluggable sync precondition for entities of type `E`.
pub struct Gate<E> {
    predicate: Arc<Predicate<E>>,
}

impl<E> Gate<E> {
    /// Gate on an arbitrary predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// A gate that permits everything.
    #[must_use]
    pub fn allow_all() -> Self {
        Self::new(|_| true)
    }

    #[must_use]
    pub fn permits(&self, entity: &E) -> bool {
        (self.predicate)(entity)
    }
}

impl<E> Clone for Gate<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<E> std::fmt::Debug for Gate<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate").finish_non_exhaustive()
    }
}

/// Reads the email Mailchimp identifies a customer by.
///
/// Deployments that keep the marketing email somewhere other than the login
/// email supply their own accessor; both the user and order gates and the
/// customer serializer read through it.
#[derive(Clone)]
pub struct EmailAttribute {
    accessor: Arc<dyn Fn(&User) -> Option<&str> + Send + Sync>,
}

impl EmailAttribute {
    pub fn new<F>(accessor: F) -> Self
    where
        F: Fn(&User) -> Option<&str> + Send + Sync + 'static,
    {
        Self {
            accessor: Arc::new(accessor),
        }
    }

    /// The user's email, trimmed, or `None` when absent or blank.
    #[must_use]
    pub fn value<'u>(&self, user: &'u User) -> Option<&'u str> {
        (self.accessor)(user)
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    #[must_use]
    pub fn is_present(&self, user: &User) -> bool {
        self.value(user).is_some()
    }
}

impl Default for EmailAttribute {
    fn default() -> Self {
        Self::new(|user| user.email.as_deref())
    }
}

impl std::fmt::Debug for EmailAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailAttribute").finish_non_exhaustive()
    }
}

/// Orders sync only once they belong to a user with an email.
#[must_use]
pub fn order_has_customer(email: EmailAttribute) -> Gate<Order> {
    Gate::new(move |order: &Order| order.user.as_ref().is_some_and(|u| email.is_present(u)))
}

/// Products sync only once purchasable: Mailchimp products cannot be
/// edited after creation, so an unfinished product must not be created.
#[must_use]
pub fn product_is_available() -> Gate<Product> {
    Gate::new(Product::is_available)
}

#[must_use]
pub fn variant_always() -> Gate<Variant> {
    Gate::allow_all()
}

/// Users sync only with an email.
#[must_use]
pub fn user_has_email(email: EmailAttribute) -> Gate<User> {
    Gate::new(move |user: &User| email.is_present(user))
}
