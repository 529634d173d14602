//! Value and type model shared by schemas and instances.
//!
//! # Responsibility
//! - Define the closed set of value representations (`Value`, `ValueKind`).
//! - Define the type registry mapping type tags to accepted kinds.
//!
//! # Invariants
//! - Every type tag maps to at least one value kind.
//! - The registry is immutable after first use.

pub mod types;
pub mod value;
