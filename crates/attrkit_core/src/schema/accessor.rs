//! Accessor dispatch entries built at declaration time.
//!
//! One `Accessor` exists per declared attribute. Instances look it up by
//! name and route typed reads and writes through it.
//!
//! # Invariants
//! - A write that is not a mutation never type-checks and never marks dirty.
//! - A rejected write leaves both the store and the change set untouched.

use crate::error::{AttributeError, AttributeResult};
use crate::model::types::TypeTag;
use crate::model::value::{timestamp_from_components, Value};
use crate::schema::descriptor::AttributeDescriptor;
use crate::tracker::ChangeSet;
use log::debug;
use std::collections::BTreeMap;

/// Per-instance attribute storage.
pub type ValueStore = BTreeMap<String, Value>;

/// Read and validated-write pair for one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    attribute: String,
    types: Vec<TypeTag>,
    coerce_timestamp: bool,
}

impl Accessor {
    pub(crate) fn for_descriptor(descriptor: &AttributeDescriptor) -> Self {
        Self {
            attribute: descriptor.name.clone(),
            types: descriptor.types.clone(),
            coerce_timestamp: descriptor.is_timestamp(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn read<'store>(&self, store: &'store ValueStore) -> Option<&'store Value> {
        store.get(&self.attribute)
    }

    /// Writes `value`, returning whether the store changed.
    ///
    /// # Errors
    /// - `AttributeCoercion` when a changed, present value has a kind none of
    ///   the declared tags accept.
    pub fn write(
        &self,
        store: &mut ValueStore,
        changes: &mut ChangeSet,
        value: Option<Value>,
    ) -> AttributeResult<bool> {
        let value = match value {
            Some(Value::Array(parts)) if self.coerce_timestamp => {
                match timestamp_from_components(&parts) {
                    Some(timestamp) => Some(Value::Timestamp(timestamp)),
                    None => Some(Value::Array(parts)),
                }
            }
            other => other,
        };

        if !is_mutation(store.get(&self.attribute), value.as_ref()) {
            return Ok(false);
        }

        if let Some(candidate) = value.as_ref() {
            if !self.types.iter().any(|tag| tag.accepts(candidate)) {
                debug!(
                    "event=attribute_write module=schema status=error attribute={} received={} error_code=attribute_coercion",
                    self.attribute,
                    candidate.kind()
                );
                return Err(AttributeError::AttributeCoercion {
                    attribute: self.attribute.clone(),
                    received: candidate.kind(),
                    expected: self.types.clone(),
                });
            }
        }

        changes.mark_changed(&self.attribute);
        match value {
            Some(value) => {
                store.insert(self.attribute.clone(), value);
            }
            None => {
                store.remove(&self.attribute);
            }
        }
        Ok(true)
    }
}

/// Absent-vs-present is always a mutation; otherwise values compare by `==`.
pub fn is_mutation(current: Option<&Value>, next: Option<&Value>) -> bool {
    match (current, next) {
        (None, None) => false,
        (Some(_), None) | (None, Some(_)) => true,
        (Some(current), Some(next)) => current != next,
    }
}
