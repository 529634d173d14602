//! Schema declaration, inheritance and accessor dispatch.
//!
//! # Responsibility
//! - Build per-model schemas from attribute declarations.
//! - Copy schemas on derive so subtypes extend them independently.
//! - Keep finished schemas in a registry for subtype reconstruction.
//!
//! # Invariants
//! - Schemas are mutated only while a model is being defined; afterwards
//!   they are shared read-only behind `Arc`.

pub mod accessor;
pub mod catalog;
pub mod descriptor;
pub mod registry;
