//! Model instances: value store, change set and write paths.
//!
//! # Responsibility
//! - Hold one object's attribute values and pending changes.
//! - Route typed reads/writes through the schema's accessor table.
//! - Provide untracked raw paths for hydration, defaults and discriminators.
//!
//! # Invariants
//! - A freshly constructed or hydrated instance has an empty change set.
//! - Raw paths never type-check and never touch the change set.
//! - The schema is shared read-only; instances never mutate it.

use crate::error::{AttributeError, AttributeResult};
use crate::model::value::Value;
use crate::schema::accessor::ValueStore;
use crate::schema::registry::{Schema, DISCRIMINATOR_ATTRIBUTE};
use crate::tracker::ChangeSet;
use std::sync::Arc;

/// One model object.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    schema: Arc<Schema>,
    values: ValueStore,
    changes: ChangeSet,
}

impl ModelInstance {
    /// Creates an instance with every declared default applied.
    ///
    /// Defaults are not user edits, so the change set starts empty.
    pub fn new(schema: Arc<Schema>) -> Self {
        let mut instance = Self {
            schema,
            values: ValueStore::new(),
            changes: ChangeSet::new(),
        };
        instance.apply_defaults();
        instance.reset_changes();
        instance
    }

    /// Creates an instance from a trusted persisted record.
    ///
    /// Defaults are applied first and then overwritten by `record`, without
    /// validation. The change set starts empty.
    pub fn hydrate<I, K>(schema: Arc<Schema>, record: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut instance = Self::new(schema);
        instance.assign_all(record);
        instance.reset_changes();
        instance
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn model_name(&self) -> &str {
        self.schema.model_name()
    }

    /// Reads a declared attribute.
    ///
    /// # Errors
    /// - `UnknownAttribute` when `name` is not declared on the schema.
    pub fn read(&self, name: &str) -> AttributeResult<Option<&Value>> {
        let accessor = self
            .schema
            .accessor(name)
            .ok_or_else(|| self.unknown_attribute(name))?;
        Ok(accessor.read(&self.values))
    }

    /// Writes a declared attribute with type validation and change tracking.
    ///
    /// Returns `true` when the stored value changed. `None` clears the slot.
    ///
    /// # Errors
    /// - `UnknownAttribute` when `name` is not declared on the schema.
    /// - `AttributeCoercion` when the value kind is not accepted.
    pub fn write(&mut self, name: &str, value: Option<Value>) -> AttributeResult<bool> {
        let accessor = self
            .schema
            .accessor(name)
            .ok_or_else(|| self.unknown_attribute(name))?;
        accessor.write(&mut self.values, &mut self.changes, value)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> AttributeResult<bool> {
        self.write(name, Some(value.into()))
    }

    pub fn clear(&mut self, name: &str) -> AttributeResult<bool> {
        self.write(name, None)
    }

    /// Reads any slot without schema lookup.
    pub fn read_raw(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Writes any slot without validation or change tracking.
    pub fn write_raw(&mut self, name: &str, value: Option<Value>) {
        match value {
            Some(value) => {
                self.values.insert(name.to_string(), value);
            }
            None => {
                self.values.remove(name);
            }
        }
    }

    /// Overwrites every given slot without validation or change tracking.
    pub fn assign_all<I, K>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (name, value) in values {
            self.values.insert(name.into(), value);
        }
    }

    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    pub fn mark_changed(&mut self, name: &str) {
        self.changes.mark_changed(name);
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.changes.is_changed(name)
    }

    pub fn changed_names(&self) -> impl Iterator<Item = &str> {
        self.changes.names()
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Clears pending changes, typically after a successful save.
    pub fn reset_changes(&mut self) {
        self.changes.reset();
    }

    /// Raw-writes every schema default, inherited defaults included.
    pub fn apply_defaults(&mut self) {
        let schema = Arc::clone(&self.schema);
        for (name, default) in schema.defaults() {
            self.write_raw(name, Some(default.clone()));
        }
    }

    /// Raw-writes the concrete model name into `type` for subtype instances.
    ///
    /// Returns whether a discriminator was written. Root models are left
    /// untouched. Subtype schemas declare `type: string`, so the value is
    /// also readable through the typed path.
    pub fn apply_discriminator(&mut self) -> bool {
        if !self.schema.is_subtype() {
            return false;
        }
        let model_name = Value::Text(self.schema.model_name().to_string());
        self.write_raw(DISCRIMINATOR_ATTRIBUTE, Some(model_name));
        true
    }

    fn unknown_attribute(&self, name: &str) -> AttributeError {
        AttributeError::UnknownAttribute {
            model: self.schema.model_name().to_string(),
            attribute: name.to_string(),
        }
    }
}
