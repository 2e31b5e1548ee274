//! In-memory parameter store
//!
//! Insertion-ordered pairs, matching the query-string model: small entry
//! counts, order preserved, linear scans.

use crate::ParamStore;

/// Insertion-ordered in-memory store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Vec<(String, String)>,
    version: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Store pre-populated with entries, modelling state already carried
    /// in the medium before first observation. Later duplicates of a key
    /// overwrite earlier ones; the initial version is zero.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut store = MemoryStore::new();
        for (key, value) in pairs {
            store.apply_set(&key.into(), &value.into());
        }
        store
    }

    /// Number of present entries
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entries are present
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Returns true if the store changed
    fn apply_set(&mut self, key: &str, value: &str) -> bool {
        match self.position(key) {
            Some(i) => {
                if self.entries[i].1 == value {
                    false
                } else {
                    self.entries[i].1 = value.to_string();
                    true
                }
            }
            None => {
                self.entries.push((key.to_string(), value.to_string()));
                true
            }
        }
    }

    /// Returns true if the store changed
    fn apply_delete(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }
}

impl ParamStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.entries[i].1.as_str())
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.apply_set(key, value) {
            self.version += 1;
        }
    }

    fn delete(&mut self, key: &str) {
        if self.apply_delete(key) {
            self.version += 1;
        }
    }

    fn entries(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[inline]
    fn version(&self) -> u64 {
        self.version
    }

    fn set_many(&mut self, entries: &[(String, String)]) {
        let mut changed = false;
        for (key, value) in entries {
            changed |= self.apply_set(key, value);
        }
        if changed {
            self.version += 1;
        }
    }

    fn delete_many(&mut self, keys: &[String]) {
        let mut changed = false;
        for key in keys {
            changed |= self.apply_delete(key);
        }
        if changed {
            self.version += 1;
        }
    }
}
