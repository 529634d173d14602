//! In-process model registry and subtype resolution.
//!
//! Finished schemas are frozen behind `Arc` on registration. Records loaded
//! from a backing store are turned back into instances of their concrete
//! subtype through the `type` discriminator.

use crate::error::{AttributeError, AttributeResult};
use crate::instance::ModelInstance;
use crate::model::value::Value;
use crate::schema::registry::{Schema, DISCRIMINATOR_ATTRIBUTE};
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registered model schemas keyed by model name.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<Schema>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freezes and registers one schema.
    ///
    /// # Errors
    /// - `DuplicateModel` when the model name is taken.
    /// - `UnknownModel` when a derived schema's parent is not registered.
    pub fn register(&mut self, schema: Schema) -> AttributeResult<Arc<Schema>> {
        let model_name = schema.model_name().to_string();
        if self.models.contains_key(model_name.as_str()) {
            return Err(AttributeError::DuplicateModel(model_name));
        }
        if let Some(parent) = schema.parent_model() {
            if !self.models.contains_key(parent) {
                return Err(AttributeError::UnknownModel(parent.to_string()));
            }
        }

        info!(
            "event=model_register module=catalog status=ok model={} base={} attributes={}",
            model_name,
            schema.base_model().unwrap_or("none"),
            schema.len()
        );
        let schema = Arc::new(schema);
        self.models.insert(model_name, Arc::clone(&schema));
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, model_name: &str) -> Option<Arc<Schema>> {
        self.models.get(model_name).cloned()
    }

    /// Returns sorted model names.
    pub fn model_names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    /// Registered schemas whose hierarchy root is `base_model`.
    pub fn subtypes_of(&self, base_model: &str) -> Vec<&Arc<Schema>> {
        self.models
            .values()
            .filter(|schema| schema.base_model() == Some(base_model))
            .collect()
    }

    /// Returns whether `model_name` is `ancestor` or derives from it.
    pub fn is_descendant(&self, model_name: &str, ancestor: &str) -> bool {
        let mut current = self.models.get(model_name);
        while let Some(schema) = current {
            if schema.model_name() == ancestor {
                return true;
            }
            current = schema.parent_model().and_then(|parent| self.models.get(parent));
        }
        false
    }

    /// Creates a default instance of a registered model.
    pub fn instantiate(&self, model_name: &str) -> AttributeResult<ModelInstance> {
        let schema = self.require(model_name)?;
        Ok(ModelInstance::new(schema))
    }

    /// Rebuilds an instance from a flat record.
    ///
    /// A text `type` discriminator selects the concrete model, which must be
    /// `model_name` or one of its descendants. Records without a text
    /// discriminator hydrate as `model_name`.
    ///
    /// # Errors
    /// - `UnknownModel` when `model_name` or the discriminator is unregistered.
    /// - `NotASubtype` when the discriminator names a model outside the
    ///   `model_name` hierarchy.
    pub fn hydrate(
        &self,
        model_name: &str,
        record: BTreeMap<String, Value>,
    ) -> AttributeResult<ModelInstance> {
        let requested = self.require(model_name)?;
        let schema = match record.get(DISCRIMINATOR_ATTRIBUTE) {
            Some(Value::Text(concrete)) if concrete != model_name => {
                let concrete_schema = self.require(concrete)?;
                if !self.is_descendant(concrete, model_name) {
                    return Err(AttributeError::NotASubtype {
                        model: concrete.clone(),
                        base: model_name.to_string(),
                    });
                }
                concrete_schema
            }
            Some(Value::Text(_)) | None => requested,
            Some(other) => {
                debug!(
                    "event=model_hydrate module=catalog status=ok model={} discriminator_kind={} note=ignored",
                    model_name,
                    other.kind()
                );
                requested
            }
        };

        Ok(ModelInstance::hydrate(schema, record))
    }

    fn require(&self, model_name: &str) -> AttributeResult<Arc<Schema>> {
        self.get(model_name)
            .ok_or_else(|| AttributeError::UnknownModel(model_name.to_string()))
    }
}
