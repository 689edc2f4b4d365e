//! Generic JSON-object-shaped protocol resource.
//!
//! Federated servers disagree wildly about which properties an object may
//! carry, so `Resource` stays an open map rather than a closed struct. The
//! accessors cover the handful of properties the harness itself relies on
//! (`id`, `type`, `attributedTo`, `totalItems`); everything else passes
//! through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::vocab;

/// Error building a [`Resource`] from arbitrary JSON.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The value was not a JSON object.
    #[error("resource must be a JSON object, got {found}")]
    NotAnObject {
        /// JSON kind of the rejected value (e.g. "array", "string").
        found: &'static str,
    },
}

/// A protocol resource: an open JSON object addressable by `id`.
///
/// Resource identifiers, once assigned, are stable for the life of a test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Map<String, Value>);

impl Resource {
    /// Create an empty resource.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a resource from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, ResourceError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ResourceError::NotAnObject { found: json_kind(&other) }),
        }
    }

    /// Consume the resource, yielding the underlying JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// The resource identifier, if assigned.
    pub fn id(&self) -> Option<&str> {
        self.str_property("id")
    }

    /// The resource `type`, if present.
    pub fn kind(&self) -> Option<&str> {
        self.str_property("type")
    }

    /// The actor this resource is attributed to, if present.
    pub fn attributed_to(&self) -> Option<&str> {
        self.str_property("attributedTo")
    }

    /// Collection item count, if present.
    pub fn total_items(&self) -> Option<u64> {
        self.0.get("totalItems").and_then(Value::as_u64)
    }

    /// Look up an arbitrary property.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the resource carries a property.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a property, replacing any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Set a property only when absent.
    ///
    /// Returns `true` if the value was inserted. Supplied properties are
    /// never overridden by harness defaulting.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) -> bool {
        if self.0.contains_key(key) {
            return false;
        }

        self.0.insert(key.to_string(), value.into());
        true
    }

    /// Build an empty collection owned by `attributed_to`.
    ///
    /// `totalItems` starts at 0; the harness never mutates a collection
    /// after creation. Only the server under test appends to it.
    pub fn collection(id: &str, attributed_to: &str, ordered: bool) -> Self {
        let kind = if ordered { "OrderedCollection" } else { "Collection" };

        let mut resource = Self::new();
        resource.set("id", id);
        resource.set("attributedTo", attributed_to);
        resource.set("type", kind);
        resource.set("totalItems", 0);
        resource
    }

    /// Build a credential record attributing private key material to an actor.
    ///
    /// The record is addressed by a freshly generated URN and exists only
    /// inside the store.
    pub fn credential(actor_id: &str, private_key_pem: &str) -> Self {
        let mut resource = Self::new();
        resource.set("id", format!("urn:uuid:{}", Uuid::new_v4()));
        resource.set("type", vocab::CREDENTIALS_TYPE);
        resource.set("attributedTo", actor_id);
        resource.set(vocab::PRIVATE_KEY_PROPERTY, private_key_pem);
        resource
    }

    fn str_property(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Resource {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
