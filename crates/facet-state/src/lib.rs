//! Facet State - Dependency-aware reconciliation engine
//!
//! This crate implements the consistency protocol between typed fields
//! and the string-only parameter store:
//! - Dependency graph derived from `depends_on` declarations
//! - Value cache tracking last-observed values per field
//! - Reconciler seeding defaults and invalidating dependents on change
//! - Snapshot accessor and field setter exposed to the consumer

pub mod cache;
pub mod engine;
pub mod graph;
pub mod snapshot;

pub use cache::*;
pub use engine::*;
pub use graph::*;
pub use snapshot::*;
