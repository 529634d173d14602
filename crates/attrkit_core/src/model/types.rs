//! Type registry: symbolic type tags and the value kinds they accept.
//!
//! # Responsibility
//! - Parse type symbols (`"integer"`, `"timestamp"`, ...) into `TypeTag`.
//! - Answer whether a value is acceptable for a tag.
//!
//! # Invariants
//! - The symbol table is process-wide, immutable and built once.
//! - Unknown symbols are rejected with `UnsupportedAttributeType`.

use crate::error::{AttributeError, AttributeResult};
use crate::model::value::{Value, ValueKind};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Declarable attribute type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    String,
    Integer,
    Float,
    Timestamp,
    Hash,
    Array,
    Boolean,
}

const ALL_TAGS: &[TypeTag] = &[
    TypeTag::String,
    TypeTag::Integer,
    TypeTag::Float,
    TypeTag::Timestamp,
    TypeTag::Hash,
    TypeTag::Array,
    TypeTag::Boolean,
];

static TYPE_REGISTRY: Lazy<BTreeMap<&'static str, TypeTag>> =
    Lazy::new(|| ALL_TAGS.iter().map(|tag| (tag.as_str(), *tag)).collect());

static SUPPORTED_SYMBOLS: Lazy<Vec<&'static str>> =
    Lazy::new(|| TYPE_REGISTRY.keys().copied().collect());

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Timestamp => "timestamp",
            Self::Hash => "hash",
            Self::Array => "array",
            Self::Boolean => "boolean",
        }
    }

    /// Value kinds accepted by this tag.
    pub fn accepted_kinds(self) -> &'static [ValueKind] {
        match self {
            Self::String => &[ValueKind::Text],
            Self::Integer => &[ValueKind::Integer],
            Self::Float => &[ValueKind::Float],
            Self::Timestamp => &[ValueKind::Timestamp],
            Self::Hash => &[ValueKind::Hash],
            Self::Array => &[ValueKind::Array],
            Self::Boolean => &[ValueKind::True, ValueKind::False],
        }
    }

    /// Returns whether `value` matches any representation of this tag.
    pub fn accepts(self, value: &Value) -> bool {
        self.accepted_kinds().contains(&value.kind())
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = AttributeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        resolve_tag(value)
    }
}

/// Looks up one type symbol in the registry.
pub fn resolve_tag(symbol: &str) -> AttributeResult<TypeTag> {
    TYPE_REGISTRY
        .get(symbol)
        .copied()
        .ok_or_else(|| AttributeError::UnsupportedAttributeType {
            tag: symbol.to_string(),
        })
}

/// Returns the supported type symbols in sorted order.
pub fn supported_type_tags() -> &'static [&'static str] {
    SUPPORTED_SYMBOLS.as_slice()
}

/// Returns whether `value` is accepted by `tag`.
pub fn accepts(tag: TypeTag, value: &Value) -> bool {
    tag.accepts(value)
}

/// Type part of an attribute declaration: one symbol or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDecl {
    Single(String),
    Union(Vec<String>),
}

impl TypeDecl {
    /// Resolves every symbol, failing on the first unknown one.
    pub fn resolve(&self) -> AttributeResult<Vec<TypeTag>> {
        match self {
            Self::Single(symbol) => Ok(vec![resolve_tag(symbol)?]),
            Self::Union(symbols) if symbols.is_empty() => {
                Err(AttributeError::UnsupportedAttributeType {
                    tag: "[]".to_string(),
                })
            }
            Self::Union(symbols) => symbols.iter().map(|s| resolve_tag(s)).collect(),
        }
    }
}

impl From<&str> for TypeDecl {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for TypeDecl {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<TypeTag> for TypeDecl {
    fn from(value: TypeTag) -> Self {
        Self::Single(value.as_str().to_string())
    }
}

impl From<&[&str]> for TypeDecl {
    fn from(value: &[&str]) -> Self {
        Self::Union(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TypeDecl {
    fn from(value: [&str; N]) -> Self {
        Self::Union(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<&str>> for TypeDecl {
    fn from(value: Vec<&str>) -> Self {
        Self::from(value.as_slice())
    }
}

impl From<Vec<TypeTag>> for TypeDecl {
    fn from(value: Vec<TypeTag>) -> Self {
        Self::Union(value.iter().map(|tag| tag.as_str().to_string()).collect())
    }
}
