//! Facet Store - External parameter store contract and implementations
//!
//! The store is the source of truth for field values: a persisted,
//! string-keyed, string-valued medium (the query-string model). It is
//! shared with the hosting environment, which may mutate it outside the
//! engine's control. This crate provides:
//! - The injected store contract (`ParamStore`)
//! - An insertion-ordered in-memory implementation (`MemoryStore`)
//! - A lock-wrapped handle for host/engine sharing (`SharedStore`)

pub mod memory;
pub mod shared;
pub mod store;

pub use memory::*;
pub use shared::*;
pub use store::*;
