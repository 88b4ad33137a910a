//! Validation error types
//!
//! Error codes:
//! - RULE_VIOLATION (a rule rejected the field value)
//! - UNKNOWN_RULE (the field names a rule the registry does not have)
//! - NESTED_VIOLATION (a `struct` field's own record is invalid)
//! - DEPTH_EXCEEDED (nesting went past the configured limit)
//!
//! None of these abort a validation call. They are collected per field
//! into a [`FieldErrors`] report.

use std::fmt;

use thiserror::Error;

use super::report::FieldErrors;

/// Error payload returned by a rule function.
///
/// Opaque to the registry. Rules may return anything convertible into a
/// boxed error, including `&str` and `String`.
pub type RuleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stable codes for each kind of field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A rule function reported a failure
    RuleViolation,
    /// The field references a rule name missing from the registry
    UnknownRule,
    /// A nested record produced its own errors
    NestedViolation,
    /// Nested validation went deeper than `max_depth`
    DepthExceeded,
}

impl ErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::RuleViolation => "RULE_VIOLATION",
            ErrorCode::UnknownRule => "UNKNOWN_RULE",
            ErrorCode::NestedViolation => "NESTED_VIOLATION",
            ErrorCode::DepthExceeded => "DEPTH_EXCEEDED",
        }
    }

    /// Returns true when the error points at a registry or schema defect
    /// rather than at bad data.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, ErrorCode::UnknownRule | ErrorCode::DepthExceeded)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The error recorded against a single field.
///
/// A field carries at most one of these: evaluation stops at the first
/// failing rule.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A rule rejected the value; carries the rule's own error
    #[error("{0}")]
    Rule(RuleError),

    /// The field names a rule the registry does not define
    #[error("undefined validator: {0:?}")]
    UnknownRule(String),

    /// The field's nested record has errors of its own
    #[error("{0}")]
    Nested(FieldErrors),

    /// Recursion through `struct` fields hit the configured limit
    #[error("nesting depth limit of {limit} exceeded")]
    DepthExceeded {
        /// The configured maximum depth
        limit: usize,
    },
}

impl FieldError {
    /// Returns the error code for this field error
    pub fn code(&self) -> ErrorCode {
        match self {
            FieldError::Rule(_) => ErrorCode::RuleViolation,
            FieldError::UnknownRule(_) => ErrorCode::UnknownRule,
            FieldError::Nested(_) => ErrorCode::NestedViolation,
            FieldError::DepthExceeded { .. } => ErrorCode::DepthExceeded,
        }
    }

    /// Returns the nested report when this is a nested violation
    pub fn as_nested(&self) -> Option<&FieldErrors> {
        match self {
            FieldError::Nested(errors) => Some(errors),
            _ => None,
        }
    }

    /// Returns the rule's own error when this is a rule violation
    pub fn as_rule_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            FieldError::Rule(err) => Some(&**err),
            _ => None,
        }
    }

    /// Returns the missing rule name when this is an unknown rule
    pub fn unknown_rule(&self) -> Option<&str> {
        match self {
            FieldError::UnknownRule(name) => Some(name),
            _ => None,
        }
    }
}

/// Errors raised while building a [`Registry`](super::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The name `struct` is reserved for nested validation
    #[error("rule name {0:?} is reserved")]
    ReservedName(String),

    /// Rule names must contain a non-whitespace character
    #[error("rule name must not be empty")]
    EmptyName,

    /// The same rule name was registered more than once
    #[error("rule {0:?} registered more than once")]
    DuplicateRule(String),
}

/// Result type for registry construction
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while building a [`Schema`](super::Schema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields share a name
    #[error("record '{record}' declares field '{field}' more than once")]
    DuplicateField {
        /// Record type name
        record: String,
        /// Repeated field name
        field: String,
    },
}

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, SchemaError>;
