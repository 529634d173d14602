//! Per-model schema: declared attributes, defaults and accessors.
//!
//! # Responsibility
//! - Bootstrap a model's schema, either empty (root) or copied from a parent.
//! - Register attribute declarations and their accessors.
//! - Expose read-only introspection to the persistence layer.
//!
//! # Invariants
//! - Root schemas always declare `id: integer`; derived schemas inherit it.
//! - Derived schemas declare the reserved `type: string` discriminator;
//!   callers can never declare it themselves.
//! - A derived schema is an independent copy: later declarations on either
//!   side never reach the other.
//! - Attribute names are unique within one schema.

use crate::error::{AttributeError, AttributeResult};
use crate::model::types::{TypeDecl, TypeTag};
use crate::model::value::Value;
use crate::schema::accessor::Accessor;
use crate::schema::descriptor::{AttributeDescriptor, AttributeOptions};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Implicit primary key declared on every root schema.
pub const ID_ATTRIBUTE: &str = "id";

/// Reserved attribute holding the concrete model name of subtype instances.
pub const DISCRIMINATOR_ATTRIBUTE: &str = "type";

static ATTRIBUTE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid attribute name regex"));
static MODEL_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_:]*$").expect("valid model name regex"));

/// Attribute schema of one model.
#[derive(Debug, Clone)]
pub struct Schema {
    model_name: String,
    parent_model: Option<String>,
    base_model: Option<String>,
    attributes: BTreeMap<String, AttributeDescriptor>,
    defaults: BTreeMap<String, Value>,
    accessors: BTreeMap<String, Accessor>,
}

impl Schema {
    /// Initializes the schema of `model_name`.
    ///
    /// With a `parent`, copies its descriptors, defaults and accessors and
    /// records the hierarchy root as `base_model`, then declares
    /// `type: string` unless it was inherited. Without one, starts empty and
    /// declares `id: integer`.
    ///
    /// # Errors
    /// - `InvalidModelName` when `model_name` is not an identifier path.
    pub fn bootstrap(model_name: impl Into<String>, parent: Option<&Schema>) -> AttributeResult<Self> {
        let model_name = model_name.into();
        if !MODEL_NAME_RE.is_match(&model_name) {
            return Err(AttributeError::InvalidModelName(model_name));
        }

        match parent {
            Some(parent) => {
                let base_model = parent
                    .base_model
                    .clone()
                    .unwrap_or_else(|| parent.model_name.clone());
                debug!(
                    "event=schema_bootstrap module=schema status=ok model={} parent={} base={} inherited={}",
                    model_name,
                    parent.model_name,
                    base_model,
                    parent.attributes.len()
                );
                let mut schema = Self {
                    model_name,
                    parent_model: Some(parent.model_name.clone()),
                    base_model: Some(base_model),
                    attributes: parent.attributes.clone(),
                    defaults: parent.defaults.clone(),
                    accessors: parent.accessors.clone(),
                };
                if !schema.contains(DISCRIMINATOR_ATTRIBUTE) {
                    schema.insert_attribute(
                        DISCRIMINATOR_ATTRIBUTE,
                        vec![TypeTag::String],
                        AttributeOptions::new(),
                    );
                }
                Ok(schema)
            }
            None => {
                let mut schema = Self {
                    model_name,
                    parent_model: None,
                    base_model: None,
                    attributes: BTreeMap::new(),
                    defaults: BTreeMap::new(),
                    accessors: BTreeMap::new(),
                };
                schema.declare(ID_ATTRIBUTE, TypeTag::Integer, AttributeOptions::new())?;
                debug!(
                    "event=schema_bootstrap module=schema status=ok model={} parent=none",
                    schema.model_name
                );
                Ok(schema)
            }
        }
    }

    /// Shorthand for `bootstrap(model_name, None)`.
    pub fn root(model_name: impl Into<String>) -> AttributeResult<Self> {
        Self::bootstrap(model_name, None)
    }

    /// Shorthand for `bootstrap(model_name, Some(self))`.
    pub fn derive(&self, model_name: impl Into<String>) -> AttributeResult<Self> {
        Self::bootstrap(model_name, Some(self))
    }

    /// Declares one attribute.
    ///
    /// # Errors
    /// - `InvalidAttributeName` when `name` is not an identifier.
    /// - `ReservedAttribute` for the `type` discriminator.
    /// - `DuplicateAttribute` when `name` is already present, inherited
    ///   names included.
    /// - `UnsupportedAttributeType` when any type component is unknown.
    pub fn declare(
        &mut self,
        name: &str,
        types: impl Into<TypeDecl>,
        options: AttributeOptions,
    ) -> AttributeResult<&AttributeDescriptor> {
        if !ATTRIBUTE_NAME_RE.is_match(name) {
            return Err(AttributeError::InvalidAttributeName(name.to_string()));
        }
        if name == DISCRIMINATOR_ATTRIBUTE {
            return Err(AttributeError::ReservedAttribute(name.to_string()));
        }
        if self.attributes.contains_key(name) {
            return Err(AttributeError::DuplicateAttribute {
                model: self.model_name.clone(),
                attribute: name.to_string(),
            });
        }
        let types = types.into().resolve()?;
        Ok(self.insert_attribute(name, types, options))
    }

    fn insert_attribute(
        &mut self,
        name: &str,
        types: Vec<TypeTag>,
        options: AttributeOptions,
    ) -> &AttributeDescriptor {
        let AttributeOptions { default, flags } = options;
        let descriptor = AttributeDescriptor {
            name: name.to_string(),
            types,
            default,
            flags,
        };

        if let Some(default) = descriptor.default.clone() {
            self.defaults.insert(name.to_string(), default);
        }
        self.accessors
            .insert(name.to_string(), Accessor::for_descriptor(&descriptor));

        debug!(
            "event=attribute_declare module=schema status=ok model={} attribute={} types={} has_default={}",
            self.model_name,
            name,
            descriptor
                .types
                .iter()
                .map(|tag| tag.as_str())
                .collect::<Vec<_>>()
                .join("|"),
            descriptor.default.is_some()
        );

        &*self
            .attributes
            .entry(name.to_string())
            .or_insert(descriptor)
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Direct parent model, for derived schemas.
    pub fn parent_model(&self) -> Option<&str> {
        self.parent_model.as_deref()
    }

    /// Root of the inheritance hierarchy, for derived schemas.
    pub fn base_model(&self) -> Option<&str> {
        self.base_model.as_deref()
    }

    pub fn is_subtype(&self) -> bool {
        self.base_model.is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Declared attribute names in sorted order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn descriptor(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.get(name)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.attributes.values()
    }

    /// Default mapping, inherited defaults included.
    pub fn defaults(&self) -> &BTreeMap<String, Value> {
        &self.defaults
    }

    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.defaults.get(name)
    }

    pub(crate) fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }
}
