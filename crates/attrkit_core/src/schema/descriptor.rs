//! Attribute descriptors and declaration options.

use crate::model::types::TypeTag;
use crate::model::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared metadata for one named attribute.
///
/// Owned by exactly one `Schema`; never mutated after declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    /// Accepted type tags in declaration order. Never empty.
    pub types: Vec<TypeTag>,
    pub default: Option<Value>,
    /// Auxiliary declaration flags, passed through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, Value>,
}

impl AttributeDescriptor {
    /// Union of the value kinds accepted by every declared tag.
    pub fn accepted_kinds(&self) -> Vec<ValueKind> {
        let mut kinds = Vec::new();
        for tag in &self.types {
            for kind in tag.accepted_kinds() {
                if !kinds.contains(kind) {
                    kinds.push(*kind);
                }
            }
        }
        kinds
    }

    pub fn accepts(&self, value: &Value) -> bool {
        self.types.iter().any(|tag| tag.accepts(value))
    }

    pub fn is_timestamp(&self) -> bool {
        self.types.contains(&TypeTag::Timestamp)
    }

    pub fn flag(&self, key: &str) -> Option<&Value> {
        self.flags.get(key)
    }
}

/// Options accepted by `Schema::declare`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeOptions {
    pub default: Option<Value>,
    pub flags: BTreeMap<String, Value>,
}

impl AttributeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_flag(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.flags.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributeDescriptor, AttributeOptions};
    use crate::model::types::TypeTag;
    use crate::model::value::{Value, ValueKind};
    use std::collections::BTreeMap;

    fn descriptor(types: Vec<TypeTag>) -> AttributeDescriptor {
        AttributeDescriptor {
            name: "score".to_string(),
            types,
            default: None,
            flags: BTreeMap::new(),
        }
    }

    #[test]
    fn union_descriptor_accepts_any_member_kind() {
        let score = descriptor(vec![TypeTag::Integer, TypeTag::Float]);
        assert!(score.accepts(&Value::Integer(3)));
        assert!(score.accepts(&Value::Float(3.5)));
        assert!(!score.accepts(&Value::from("3")));
        assert_eq!(
            score.accepted_kinds(),
            vec![ValueKind::Integer, ValueKind::Float]
        );
    }

    #[test]
    fn options_builder_collects_default_and_flags() {
        let options = AttributeOptions::new()
            .with_default(0)
            .with_flag("index", true);
        assert_eq!(options.default, Some(Value::Integer(0)));
        assert_eq!(options.flags.get("index"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn serializes_with_snake_case_tags() {
        let mut created_at = descriptor(vec![TypeTag::Timestamp]);
        created_at.name = "created_at".to_string();

        let json = serde_json::to_value(&created_at).unwrap();
        assert_eq!(json["name"], "created_at");
        assert_eq!(json["types"], serde_json::json!(["timestamp"]));
        assert!(json.get("flags").is_none());
        assert!(created_at.is_timestamp());
    }
}
