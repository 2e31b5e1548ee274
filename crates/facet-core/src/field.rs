//! Field definitions and typed values
//!
//! A field is a named, typed unit of filter state kept in sync with the
//! external parameter store. Values are tagged with their type so the
//! engine can round-trip them through the store's string representation.

use std::fmt;

/// Declared type of a field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    /// Free-form text
    Text,
    /// Floating-point number
    Number,
    /// Boolean toggle
    Bool,
    /// List of strings
    List,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Bool => "bool",
            FieldType::List => "list",
        };
        write!(f, "{}", name)
    }
}

/// A typed field value
#[derive(Clone, Debug)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
}

impl FieldValue {
    /// The type this value carries
    #[inline]
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Number(_) => FieldType::Number,
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::List(_) => FieldType::List,
        }
    }

    /// True for values that normalize to "unset" when written to the store
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Borrow the text content, if this is a text value
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The numeric content, if this is a number value
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean content, if this is a bool value
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the list content, if this is a list value
    #[inline]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Structural equality. Numbers compare NaN equal to NaN so a NaN stored
/// value does not register as a fresh change on every reconciliation pass.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Number(a), FieldValue::Number(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::List(a), FieldValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(String::from).collect())
    }
}

/// Static schema entry for a single field
///
/// Defined once per schema and immutable for the schema's lifetime.
#[derive(Clone, Debug)]
pub struct FieldDef {
    /// Unique field name, used as the store key
    pub name: String,
    /// Declared value type
    pub field_type: FieldType,
    /// Written to the store when the entry is absent at first observation
    pub default: Option<FieldValue>,
    /// Fields whose change clears this one
    pub depends_on: Vec<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        FieldDef {
            name: name.into(),
            field_type,
            default: None,
            depends_on: Vec::new(),
        }
    }

    /// Attach a default value, validated against the declared type when the
    /// schema is built
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Declare dependencies; a change to any of them clears this field
    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(deps.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_tags() {
        assert_eq!(FieldValue::from("a").field_type(), FieldType::Text);
        assert_eq!(FieldValue::from(1.5).field_type(), FieldType::Number);
        assert_eq!(FieldValue::from(true).field_type(), FieldType::Bool);
        assert_eq!(
            FieldValue::from(vec!["x", "y"]).field_type(),
            FieldType::List
        );
    }

    #[test]
    fn test_nan_compares_equal_to_itself() {
        let a = FieldValue::Number(f64::NAN);
        let b = FieldValue::Number(f64::NAN);
        assert_eq!(a, b);
        assert_ne!(FieldValue::Number(1.0), FieldValue::Number(2.0));
    }

    #[test]
    fn test_cross_type_values_never_equal() {
        assert_ne!(FieldValue::from("true"), FieldValue::from(true));
        assert_ne!(FieldValue::from("1"), FieldValue::from(1.0));
    }

    #[test]
    fn test_empty_normalization_candidates() {
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::List(Vec::new()).is_empty());
        assert!(!FieldValue::from(false).is_empty());
        assert!(!FieldValue::from(0.0).is_empty());
    }

    #[test]
    fn test_field_def_builder() {
        let def = FieldDef::new("city", FieldType::Text)
            .with_default("madrid")
            .depends_on(["country"]);

        assert_eq!(def.name, "city");
        assert_eq!(def.field_type, FieldType::Text);
        assert_eq!(def.default, Some(FieldValue::from("madrid")));
        assert_eq!(def.depends_on, vec!["country".to_string()]);
    }
}
