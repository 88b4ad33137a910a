//! Validation reports
//!
//! A [`FieldErrors`] maps field names to the single error recorded for each
//! invalid field. Nested records keep their own report, so the result
//! mirrors the record hierarchy rather than flattening it.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

use super::errors::{ErrorCode, FieldError};

/// Per-field validation failures for one record.
///
/// Validation only returns this when at least one field is invalid.
/// Iteration is ordered by field name, so reports are deterministic.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error for a field, replacing any earlier one
    pub fn insert(&mut self, field: impl Into<String>, error: FieldError) {
        self.errors.insert(field.into(), error);
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over `(field, error)` pairs in field-name order
    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldError> {
        self.errors.iter()
    }

    /// Invalid field names in order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> BTreeMap<String, FieldError> {
        self.errors
    }

    /// Returns `None` for an empty report.
    pub(crate) fn into_option(self) -> Option<Self> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Flattens the report into one entry per leaf error.
    ///
    /// Nested reports contribute dotted paths such as `address.zip`.
    pub fn violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        self.collect_violations("", &mut out);
        out
    }

    fn collect_violations(&self, prefix: &str, out: &mut Vec<Violation>) {
        for (field, error) in &self.errors {
            let path = make_path(prefix, field);
            match error {
                FieldError::Nested(nested) => nested.collect_violations(&path, out),
                other => out.push(Violation {
                    path,
                    code: other.code(),
                    message: other.to_string(),
                }),
            }
        }
    }

    /// Renders the report as JSON: nested reports become objects,
    /// every other error becomes its message string.
    pub fn to_json(&self) -> JsonValue {
        let map = self
            .errors
            .iter()
            .map(|(field, error)| (field.clone(), error_to_json(error)))
            .collect();
        JsonValue::Object(map)
    }
}

fn error_to_json(error: &FieldError) -> JsonValue {
    match error {
        FieldError::Nested(nested) => nested.to_json(),
        other => JsonValue::String(other.to_string()),
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = (&'a String, &'a FieldError);
    type IntoIter = btree_map::Iter<'a, String, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl IntoIterator for FieldErrors {
    type Item = (String, FieldError);
    type IntoIter = btree_map::IntoIter<String, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (field, error)) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field, error)?;
        }
        write!(f, "}}")
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, error) in &self.errors {
            map.serialize_entry(field, error)?;
        }
        map.end()
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldError::Nested(nested) => nested.serialize(serializer),
            other => serializer.collect_str(other),
        }
    }
}

/// One leaf error with its dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field path (e.g., "user.address.city")
    pub path: String,
    pub code: ErrorCode,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.path, self.code, self.message)
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
