//! Snapshot of current field values
//!
//! A snapshot maps every schema field to its decoded value as of one
//! point in the store's history. It is purely derived: the engine
//! recomputes it only when the store version moves.

use std::collections::HashMap;

use facet_core::FieldValue;

/// Typed view of all schema fields at a point in time
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    names: Vec<String>,
    values: HashMap<String, Option<FieldValue>>,
}

impl Snapshot {
    pub(crate) fn new(entries: Vec<(String, Option<FieldValue>)>) -> Self {
        let mut names = Vec::with_capacity(entries.len());
        let mut values = HashMap::with_capacity(entries.len());
        for (name, value) in entries {
            names.push(name.clone());
            values.insert(name, value);
        }
        Snapshot { names, values }
    }

    /// Current value for a field
    ///
    /// `None` both for absent/null values and for names outside the
    /// schema; use [`contains`](Snapshot::contains) to tell them apart.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name).and_then(|v| v.as_ref())
    }

    /// Whether the snapshot covers a field
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate `(name, value)` in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.names.iter().map(move |name| {
            (
                name.as_str(),
                self.values.get(name).and_then(|v| v.as_ref()),
            )
        })
    }

    /// Number of covered fields
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the snapshot covers no fields
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
