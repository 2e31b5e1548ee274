//! Value cache
//!
//! Shadow copy of the last-observed decoded value per field, owned
//! exclusively by the engine and used only to detect transitions between
//! reconciliation passes. It never outlives the engine's session.

use std::collections::HashMap;

use facet_core::FieldValue;

/// One cache slot per observed field
#[derive(Clone, Debug, PartialEq)]
pub enum CacheSlot {
    /// Last value read from the store (`None` = observed as absent)
    Observed(Option<FieldValue>),
    /// Cleared by invalidation; the clearing itself has not yet been
    /// re-observed, so the next pass treats it as a transition
    Cleared,
}

/// Last-observed values keyed by field name
///
/// A missing key means the field has never been observed, which the
/// engine compares as absent.
#[derive(Clone, Debug, Default)]
pub struct ValueCache {
    slots: HashMap<String, CacheSlot>,
}

impl ValueCache {
    pub fn new() -> Self {
        ValueCache::default()
    }

    /// Slot for a field, if it was ever observed or cleared
    #[inline]
    pub fn get(&self, name: &str) -> Option<&CacheSlot> {
        self.slots.get(name)
    }

    /// Record an observation
    pub fn record(&mut self, name: &str, value: Option<FieldValue>) {
        self.slots.insert(name.to_string(), CacheSlot::Observed(value));
    }

    /// Mark a field as cleared by invalidation
    pub fn clear(&mut self, name: &str) {
        self.slots.insert(name.to_string(), CacheSlot::Cleared);
    }

    /// Number of tracked fields
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if nothing has been observed yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_clear() {
        let mut cache = ValueCache::new();
        assert!(cache.get("q").is_none());

        cache.record("q", Some(FieldValue::from("rust")));
        assert_eq!(
            cache.get("q"),
            Some(&CacheSlot::Observed(Some(FieldValue::from("rust"))))
        );

        cache.clear("q");
        assert_eq!(cache.get("q"), Some(&CacheSlot::Cleared));
    }

    #[test]
    fn test_observed_absent_is_distinct_from_cleared() {
        let mut cache = ValueCache::new();
        cache.record("a", None);
        cache.clear("b");

        assert_ne!(cache.get("a"), cache.get("b"));
        assert_eq!(cache.len(), 2);
    }
}
