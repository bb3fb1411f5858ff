//! Entity references and concurrency tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque platform-assigned identifier.
///
/// The platform hands out both integer and string ids depending on the
/// entity, so both are accepted and passed back verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Str(String),
}

impl EntityId {
    /// The JSON value to splice into mutation variables.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            EntityId::Int(n) => serde_json::Value::from(*n),
            EntityId::Str(s) => serde_json::Value::from(s.clone()),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(n) => write!(f, "{}", n),
            EntityId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Int(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Str(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Str(s)
    }
}

/// An opaque optimistic-concurrency token.
///
/// The platform returns one with every read of a mutable entity; the next
/// mutation of that entity must supply it unchanged, and every successful
/// mutation invalidates the previous token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Etag(String);

impl Etag {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Etag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fetch-before-mutate unit: an entity id paired with the etag from its
/// most recent read.
///
/// A stale etag is rejected by the platform; the holder must re-fetch after
/// any intervening mutation of the same entity.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EntityRef {
    pub id: EntityId,
    #[serde(rename = "_etag")]
    pub etag: Etag,
}

impl EntityRef {
    pub fn new(id: impl Into<EntityId>, etag: Etag) -> Self {
        Self { id: id.into(), etag }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entity_id_deserializes_both_shapes() {
        let int: EntityId = serde_json::from_value(json!(42)).unwrap();
        let string: EntityId = serde_json::from_value(json!("ab-12")).unwrap();
        assert_eq!(int, EntityId::Int(42));
        assert_eq!(string, EntityId::Str("ab-12".to_string()));
    }

    #[test]
    fn entity_ref_reads_platform_node_shape() {
        let node = json!({"id": 7, "_etag": "W/\"3\""});
        let entity: EntityRef = serde_json::from_value(node).unwrap();
        assert_eq!(entity.id, EntityId::Int(7));
        assert_eq!(entity.etag.as_str(), "W/\"3\"");
    }
}
