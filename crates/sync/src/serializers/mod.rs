//! Entity → Mailchimp resource mapping.
//!
//! A [`Serializer`] turns a local record into the JSON Mailchimp stores and
//! derives the record's external id. The id is recomputed from current
//! attributes on every call and never stored locally, so a changed natural
//! key (such as a customer's email) produces a different remote resource.

mod customer;
mod order;
mod product;

pub use customer::CustomerSerializer;
pub use order::OrderSerializer;
pub use product::{ProductSerializer, VariantSerializer};

use serde_json::{Map, Value};

/// Serializes one kind of local entity.
pub trait Serializer<E>: Send + Sync {
    fn serialize(&self, entity: &E) -> RemoteRepresentation;

    /// The external id Mailchimp addresses `entity` by.
    fn external_id(&self, entity: &E) -> String {
        self.serialize(entity).id
    }
}

/// The remote shape of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRepresentation {
    pub id: String,
    /// Every field except `id` and `lines`.
    pub attributes: Map<String, Value>,
    /// Sub-resources, for entities that own a collection (carts/orders).
    pub lines: Option<Vec<RemoteLine>>,
}

/// One sub-resource of a [`RemoteRepresentation`].
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteLine {
    pub id: String,
    pub attributes: Map<String, Value>,
}

impl RemoteRepresentation {
    #[must_use]
    pub fn new(id: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            attributes,
            lines: None,
        }
    }

    #[must_use]
    pub fn with_lines(mut self, lines: Vec<RemoteLine>) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Ids of the local lines, empty when the entity has none.
    pub fn line_ids(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().flatten().map(|line| line.id.as_str())
    }

    /// The request body: `id`, the attributes, then `lines` if any.
    #[must_use]
    pub fn to_body(&self) -> Value {
        let mut body = with_id(&self.id, &self.attributes);
        if let Some(lines) = &self.lines {
            let lines = lines
                .iter()
                .map(|line| Value::Object(with_id(&line.id, &line.attributes)))
                .collect();
            body.insert("lines".to_string(), Value::Array(lines));
        }
        Value::Object(body)
    }
}

fn with_id(id: &str, attributes: &Map<String, Value>) -> Map<String, Value> {
    let mut object = Map::with_capacity(attributes.len() + 1);
    object.insert("id".to_string(), Value::String(id.to_string()));
    object.extend(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
    object
}

/// Build an attribute map from `json!({...})` output.
///
/// Non-object values produce an empty map.
pub(crate) fn attributes(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
