//! Error contract for schema declaration and attribute writes.
//!
//! # Invariants
//! - Every error is reported synchronously to the call that triggered it.
//! - A failed operation leaves schemas and instance stores untouched.

use crate::model::types::TypeTag;
use crate::model::value::ValueKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AttributeResult<T> = Result<T, AttributeError>;

/// Coarse category of an `AttributeError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Declaration-time conflict (duplicate or malformed names).
    Declaration,
    /// Type tag not present in the type registry.
    Type,
    /// Assigned value does not match the declared type.
    Coercion,
    /// Access to an attribute the schema does not declare.
    Lookup,
    /// Model registry conflicts and resolution failures.
    Registry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeError {
    /// Attribute name already declared on this schema (own or inherited).
    DuplicateAttribute { model: String, attribute: String },
    /// Type symbol is not a known type tag.
    UnsupportedAttributeType { tag: String },
    /// Assigned value representation is not accepted by the attribute type.
    AttributeCoercion {
        attribute: String,
        received: ValueKind,
        expected: Vec<TypeTag>,
    },
    UnknownAttribute { model: String, attribute: String },
    InvalidAttributeName(String),
    /// Name is owned by the schema itself, e.g. the `type` discriminator.
    ReservedAttribute(String),
    InvalidModelName(String),
    DuplicateModel(String),
    UnknownModel(String),
    /// Record discriminator names a model outside the requested hierarchy.
    NotASubtype { model: String, base: String },
}

impl AttributeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateAttribute { .. }
            | Self::InvalidAttributeName(_)
            | Self::ReservedAttribute(_)
            | Self::InvalidModelName(_) => ErrorKind::Declaration,
            Self::UnsupportedAttributeType { .. } => ErrorKind::Type,
            Self::AttributeCoercion { .. } => ErrorKind::Coercion,
            Self::UnknownAttribute { .. } => ErrorKind::Lookup,
            Self::DuplicateModel(_) | Self::UnknownModel(_) | Self::NotASubtype { .. } => {
                ErrorKind::Registry
            }
        }
    }
}

impl Display for AttributeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateAttribute { model, attribute } => {
                write!(f, "attribute `{attribute}` is already declared on `{model}`")
            }
            Self::UnsupportedAttributeType { tag } => {
                write!(f, "unsupported attribute type: {tag}")
            }
            Self::AttributeCoercion {
                attribute,
                received,
                expected,
            } => {
                let expected = expected
                    .iter()
                    .map(|tag| tag.as_str())
                    .collect::<Vec<_>>()
                    .join("|");
                write!(
                    f,
                    "cannot assign {received} to attribute `{attribute}` (expected {expected})"
                )
            }
            Self::UnknownAttribute { model, attribute } => {
                write!(f, "attribute `{attribute}` is not declared on `{model}`")
            }
            Self::InvalidAttributeName(value) => write!(f, "attribute name is invalid: `{value}`"),
            Self::ReservedAttribute(value) => write!(f, "attribute name is reserved: `{value}`"),
            Self::InvalidModelName(value) => write!(f, "model name is invalid: `{value}`"),
            Self::DuplicateModel(value) => write!(f, "model already registered: {value}"),
            Self::UnknownModel(value) => write!(f, "model not registered: {value}"),
            Self::NotASubtype { model, base } => {
                write!(f, "model `{model}` is not `{base}` or one of its subtypes")
            }
        }
    }
}

impl Error for AttributeError {}

#[cfg(test)]
mod tests {
    use super::{AttributeError, ErrorKind};
    use crate::model::types::TypeTag;
    use crate::model::value::ValueKind;

    #[test]
    fn coercion_message_names_attribute_and_kinds() {
        let err = AttributeError::AttributeCoercion {
            attribute: "age".to_string(),
            received: ValueKind::Text,
            expected: vec![TypeTag::Integer, TypeTag::Float],
        };
        assert_eq!(
            err.to_string(),
            "cannot assign text to attribute `age` (expected integer|float)"
        );
        assert_eq!(err.kind(), ErrorKind::Coercion);
    }

    #[test]
    fn classifies_declaration_errors() {
        let err = AttributeError::DuplicateAttribute {
            model: "User".to_string(),
            attribute: "name".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Declaration);
        assert!(err.to_string().contains("already declared"));
    }
}
