//! Field traversal and rule dispatch
//!
//! Validation semantics:
//! - Input is dereferenced exactly once; anything that is not then a
//!   record is vacuously valid
//! - Fields are visited in declaration order
//! - Untagged and non-exported fields are skipped without being read
//! - A field's rules run in order and stop at the first failure
//! - `struct` validates the field as a nested record, keeping its report
//! - Unknown rule names are reported per field, never raised
//!
//! Validation never mutates the record and never fails as a whole.

use tracing::{debug, trace, warn};

use super::errors::FieldError;
use super::registry::Registry;
use super::report::FieldErrors;
use super::tags::is_struct_rule;
use super::types::{FieldMeta, Record, RecordView, Value};
use crate::observability::Event;

impl Registry {
    /// Validates a record, or a single indirection to one.
    ///
    /// Returns `None` when every tagged field passes, when the record has
    /// no fields, or when `value` is not a record at all. Otherwise returns
    /// the report of invalid fields.
    pub fn validate(&self, value: Value<'_>) -> Option<FieldErrors> {
        self.validate_at(&value, 0)
    }

    /// Validates a typed record; same as `validate(Value::record(record))`.
    pub fn validate_record<R: Record>(&self, record: &R) -> Option<FieldErrors> {
        self.validate(Value::record(record))
    }

    fn validate_at(&self, value: &Value<'_>, depth: usize) -> Option<FieldErrors> {
        let Some(record) = as_record(value) else {
            trace!(event = %Event::NotARecord, kind = value.type_name(), "nothing to validate");
            return None;
        };

        debug!(
            event = %Event::ValidationStart,
            record = record.record_name(),
            depth,
            "validating record"
        );

        let mut errors = FieldErrors::new();
        for (index, field) in record.fields().iter().enumerate() {
            if !field.is_tagged() || !field.is_exported() {
                trace!(
                    event = %Event::FieldSkipped,
                    record = record.record_name(),
                    field = field.name(),
                    tagged = field.is_tagged(),
                    exported = field.is_exported(),
                    "field skipped"
                );
                continue;
            }

            let Some(field_value) = record.field_value(index) else {
                continue;
            };

            if let Some(error) = self.check_field(record, field, &field_value, depth) {
                trace!(
                    event = %Event::FieldInvalid,
                    record = record.record_name(),
                    field = field.name(),
                    code = %error.code(),
                    "field invalid"
                );
                errors.insert(field.name(), error);
            }
        }

        debug!(
            event = %Event::ValidationComplete,
            record = record.record_name(),
            invalid = errors.len(),
            "record validated"
        );

        errors.into_option()
    }

    /// Runs a field's rules in order and returns the first failure.
    fn check_field(
        &self,
        record: &dyn RecordView,
        field: &FieldMeta,
        value: &Value<'_>,
        depth: usize,
    ) -> Option<FieldError> {
        for rule in field.rules() {
            if is_struct_rule(rule) {
                if as_record(value).is_some() && depth >= self.config().max_depth {
                    warn!(
                        event = %Event::DepthExceeded,
                        record = record.record_name(),
                        field = field.name(),
                        limit = self.config().max_depth,
                        "nesting limit reached"
                    );
                    return Some(FieldError::DepthExceeded {
                        limit: self.config().max_depth,
                    });
                }
                match self.validate_at(value, depth + 1) {
                    Some(nested) => return Some(FieldError::Nested(nested)),
                    None => continue,
                }
            }

            let Some(rule_fn) = self.get(rule) else {
                warn!(
                    event = %Event::RuleUnknown,
                    record = record.record_name(),
                    field = field.name(),
                    rule = rule.as_str(),
                    "undefined validator"
                );
                return Some(FieldError::UnknownRule(rule.clone()));
            };

            if let Err(err) = rule_fn(value) {
                return Some(FieldError::Rule(err));
            }
        }

        None
    }
}

/// The record behind `value` after one dereference, if any.
fn as_record<'v, 'a>(value: &'v Value<'a>) -> Option<&'a dyn RecordView> {
    value.deref_once().and_then(Value::as_record)
}
