//! Per-instance change tracking.
//!
//! # Invariants
//! - A name appears at most once, however many times it was changed.
//! - `reset` is the only operation that removes names.

use serde::Serialize;
use std::collections::BTreeSet;

/// Attribute names mutated since the last reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    names: BTreeSet<String>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_changed(&mut self, name: &str) {
        if !self.names.contains(name) {
            self.names.insert(name.to_string());
        }
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Changed names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn reset(&mut self) {
        self.names.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeSet;

    #[test]
    fn marks_each_name_once() {
        let mut changes = ChangeSet::new();
        changes.mark_changed("age");
        changes.mark_changed("age");
        changes.mark_changed("name");

        assert_eq!(changes.len(), 2);
        assert!(changes.is_changed("age"));
        assert_eq!(changes.names().collect::<Vec<_>>(), vec!["age", "name"]);
    }

    #[test]
    fn reset_clears_all_names() {
        let mut changes = ChangeSet::new();
        changes.mark_changed("age");
        changes.reset();

        assert!(changes.is_empty());
        assert!(!changes.is_changed("age"));
    }

    #[test]
    fn serializes_as_sorted_name_list() {
        let mut changes = ChangeSet::new();
        changes.mark_changed("title");
        changes.mark_changed("body");

        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(json, serde_json::json!(["body", "title"]));
    }
}
