//! Parameter store contract
//!
//! The store is injected into the engine, never ambient, so tests and
//! hosts can substitute their own medium. Absence of a key means "no
//! value set"; the engine normalizes explicit empties to absence before
//! they reach the store.
//!
//! The version counter is the change notification channel in polled
//! form: it advances exactly once per observable mutation, with a
//! batched call counting as one mutation. Calls that change nothing do
//! not advance it.

/// String-keyed, string-valued persisted store
pub trait ParamStore {
    /// Current value for a key, if present
    fn get(&self, key: &str) -> Option<&str>;

    /// Set a single key
    fn set(&mut self, key: &str, value: &str);

    /// Delete a single key; deleting an absent key is a no-op
    fn delete(&mut self, key: &str);

    /// Ordered snapshot of present entries
    fn entries(&self) -> Vec<(&str, &str)>;

    /// Mutation counter, advanced once per observable mutation
    fn version(&self) -> u64;

    /// Batched write, observable as a single mutation
    ///
    /// The default implementation loops `set`; stores with a real
    /// transaction boundary override it to commit once.
    fn set_many(&mut self, entries: &[(String, String)]) {
        for (key, value) in entries {
            self.set(key, value);
        }
    }

    /// Batched delete, observable as a single mutation
    fn delete_many(&mut self, keys: &[String]) {
        for key in keys {
            self.delete(key);
        }
    }
}
