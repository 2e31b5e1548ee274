//! Per-type value encoding for the parameter store
//!
//! The uniform absent rule runs before any type-specific logic: an absent
//! or empty raw string decodes to `None` regardless of declared type.
//! Only a present, non-empty string is type-decoded.
//!
//! List elements are joined with a comma; embedded separators and the
//! escape character itself are escaped so the encoding is reversible.

use facet_core::{FieldType, FieldValue};

/// Separator between encoded list elements
pub const LIST_SEPARATOR: char = ',';

/// Escape lead-in for separators and escapes inside list elements
const LIST_ESCAPE: char = '\\';

/// Encode a typed value into its store string representation
pub fn encode(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Bool(true) => "true".to_string(),
        FieldValue::Bool(false) => "false".to_string(),
        FieldValue::List(items) => join_list(items),
    }
}

/// Decode a raw store string (or absence) into a typed value
///
/// A present non-empty string that fails numeric parsing decodes to
/// `None`, indistinguishable from absence. A present non-empty string
/// that is not the literal `true` decodes to `Bool(false)`.
pub fn decode(raw: Option<&str>, field_type: FieldType) -> Option<FieldValue> {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return None,
    };

    match field_type {
        FieldType::Text => Some(FieldValue::Text(raw.to_string())),
        FieldType::Number => raw.parse::<f64>().ok().map(FieldValue::Number),
        FieldType::Bool => Some(FieldValue::Bool(raw == "true")),
        FieldType::List => Some(FieldValue::List(split_list(raw))),
    }
}

fn join_list(items: &[String]) -> String {
    let mut out = String::with_capacity(items.iter().map(|s| s.len() + 1).sum());
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(LIST_SEPARATOR);
        }
        for ch in item.chars() {
            if ch == LIST_SEPARATOR || ch == LIST_ESCAPE {
                out.push(LIST_ESCAPE);
            }
            out.push(ch);
        }
    }
    out
}

fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch == LIST_ESCAPE {
            // Trailing lone escape is dropped rather than erroring
            if let Some(escaped) = chars.next() {
                current.push(escaped);
            }
        } else if ch == LIST_SEPARATOR {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    items.push(current);
    items
}
