//! Facet Codec - String serialization for field values
//!
//! The external store holds only strings. This crate converts between
//! typed field values and that representation:
//! - Encoding is total and never fails
//! - Decoding degrades to absence on malformed input, never errors
//! - Absent or empty raw input decodes to absent for every type

pub mod param;

pub use param::*;
