//! Typed attribute schemas for persisted model objects.
//!
//! Models declare named, typed attributes; instances validate writes against
//! those types, track what changed since the last save, apply declared
//! defaults and carry a `type` discriminator for single-table inheritance.

pub mod error;
pub mod instance;
pub mod logging;
pub mod model;
pub mod schema;
pub mod tracker;

pub use error::{AttributeError, AttributeResult, ErrorKind};
pub use instance::ModelInstance;
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::types::{accepts, resolve_tag, supported_type_tags, TypeDecl, TypeTag};
pub use model::value::{timestamp_from_components, Value, ValueKind};
pub use schema::accessor::{is_mutation, Accessor, ValueStore};
pub use schema::catalog::ModelRegistry;
pub use schema::descriptor::{AttributeDescriptor, AttributeOptions};
pub use schema::registry::{Schema, DISCRIMINATOR_ATTRIBUTE, ID_ATTRIBUTE};
pub use tracker::ChangeSet;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
