use mailchimp_sync_core::User;
use serde_json::{Value, json};

use super::{RemoteRepresentation, Serializer, attributes};
use crate::gate::EmailAttribute;

/// Serializes a [`User`] as a Mailchimp customer.
///
/// The external id is the lowercased email. Emails can change locally but
/// Mailchimp customer ids cannot, so an email change orphans the old
/// customer remotely.
#[derive(Debug, Clone, Default)]
pub struct CustomerSerializer {
    email: EmailAttribute,
}

impl CustomerSerializer {
    #[must_use]
    pub const fn new(email: EmailAttribute) -> Self {
        Self { email }
    }

    /// Customer object as embedded in carts and orders.
    #[must_use]
    pub fn embedded(&self, user: &User) -> Value {
        self.serialize(user).to_body()
    }
}

impl Serializer<User> for CustomerSerializer {
    fn serialize(&self, user: &User) -> RemoteRepresentation {
        let email = self.email.value(user).unwrap_or_default();
        let mut attrs = attributes(json!({
            "email_address": email,
            "opt_in_status": user.accepts_marketing,
        }));
        if let Some(first_name) = &user.first_name {
            attrs.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = &user.last_name {
            attrs.insert("last_name".to_string(), json!(last_name));
        }
        RemoteRepresentation::new(email.to_lowercase(), attrs)
    }
}
