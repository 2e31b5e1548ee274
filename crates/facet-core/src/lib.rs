//! Facet Core - Fundamental types for the filter state engine
//!
//! This crate defines the types shared across the facet workspace:
//! - Field types and typed values
//! - Field definitions and the validated schema
//! - Error taxonomy

pub mod error;
pub mod field;
pub mod schema;

pub use error::*;
pub use field::*;
pub use schema::*;
