//! Shared store handle
//!
//! The parameter store is shared with the hosting environment:
//! navigation or any other outside actor may mutate it between
//! reconciliation passes. `SharedStore` wraps the in-memory store in a
//! lock so the host and the engine can hold handles to the same store.
//! Cloning produces a second handle to the same underlying store.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::MemoryStore;

/// Cloneable handle to a lock-protected in-memory store
#[derive(Clone, Debug, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<MemoryStore>>,
}

impl SharedStore {
    pub fn new() -> Self {
        SharedStore::default()
    }

    /// Wrap an existing store
    pub fn from_store(store: MemoryStore) -> Self {
        SharedStore {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Read access to the underlying store
    pub fn read(&self) -> RwLockReadGuard<'_, MemoryStore> {
        self.inner.read()
    }

    /// Write access to the underlying store
    pub fn write(&self) -> RwLockWriteGuard<'_, MemoryStore> {
        self.inner.write()
    }
}
