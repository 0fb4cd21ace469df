//! Reverse index of hard references.

use arbor_core::{Identifier, PropertyValue};
use std::collections::{BTreeMap, BTreeSet};

/// Maps each referenced node to the (node, property) pairs holding a hard
/// reference to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIndex {
    by_target: BTreeMap<Identifier, BTreeSet<(Identifier, String)>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every hard reference held by `value`.
    pub fn insert(&mut self, source: Identifier, property: &str, value: &PropertyValue) {
        for target in value.hard_references() {
            self.by_target
                .entry(target)
                .or_default()
                .insert((source, property.to_string()));
        }
    }

    /// Drop the entries contributed by `value`.
    pub fn remove(&mut self, source: Identifier, property: &str, value: &PropertyValue) {
        for target in value.hard_references() {
            if let Some(referrers) = self.by_target.get_mut(&target) {
                referrers.remove(&(source, property.to_string()));
                if referrers.is_empty() {
                    self.by_target.remove(&target);
                }
            }
        }
    }

    /// Nodes and properties referencing `target`.
    pub fn referrers(&self, target: Identifier) -> impl Iterator<Item = &(Identifier, String)> + '_ {
        self.by_target.get(&target).into_iter().flatten()
    }

    pub fn is_referenced(&self, target: Identifier) -> bool {
        self.by_target.contains_key(&target)
    }

    /// All referenced targets.
    pub fn targets(&self) -> impl Iterator<Item = Identifier> + '_ {
        self.by_target.keys().copied()
    }

    pub fn clear(&mut self) {
        self.by_target.clear();
    }
}
