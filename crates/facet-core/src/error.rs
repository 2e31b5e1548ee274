//! Error types for the facet engine
//!
//! Schema construction is the only fallible surface in the workspace.
//! Runtime degradation (malformed store strings, unknown fields) is
//! handled by decoding to absent values, never by returning errors.

use thiserror::Error;

use crate::FieldType;

/// Schema configuration errors
#[derive(Error, Debug)]
pub enum FacetError {
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    #[error("default for field '{field}' does not match declared type {expected}")]
    DefaultTypeMismatch { field: String, expected: FieldType },

    #[error("dependency cycle: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),
}

/// Result type for facet operations
pub type FacetResult<T> = Result<T, FacetError>;
