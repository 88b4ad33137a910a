//! Observability events for fieldrules
//!
//! Every log line emitted by the crate carries one of these as its
//! `event` field, so downstream filters can match on a stable name.
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events during registry construction and validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Construction
    /// Registry built and ready for use
    RegistryBuilt,
    /// Registry construction rejected
    RegistryRejected,

    // Validation
    /// Validation of a record begins
    ValidationStart,
    /// Input was not a record; nothing validated
    NotARecord,
    /// Field skipped (untagged or not exported)
    FieldSkipped,
    /// Field references a rule the registry lacks
    RuleUnknown,
    /// Field failed a rule or nested validation
    FieldInvalid,
    /// Nesting limit reached
    DepthExceeded,
    /// Validation of a record finished
    ValidationComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RegistryBuilt => "REGISTRY_BUILT",
            Event::RegistryRejected => "REGISTRY_REJECTED",

            Event::ValidationStart => "VALIDATION_BEGIN",
            Event::NotARecord => "VALIDATION_NOT_A_RECORD",
            Event::FieldSkipped => "FIELD_SKIPPED",
            Event::RuleUnknown => "RULE_UNKNOWN",
            Event::FieldInvalid => "FIELD_INVALID",
            Event::DepthExceeded => "DEPTH_EXCEEDED",
            Event::ValidationComplete => "VALIDATION_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
