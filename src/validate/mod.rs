//! Rule-driven record validation
//!
//! Records declare their fields through a static [`Schema`]; each field may
//! carry an ordered list of rule names. A [`Registry`] maps those names to
//! rule functions and walks a record's fields, recording at most one error
//! per field.
//!
//! # Semantics
//!
//! - Rules run in declaration order and stop at a field's first failure
//! - The reserved rule `struct` validates a field as a nested record
//! - Unknown rule names are reported as field errors
//! - Untagged and non-exported fields are never read
//! - A fully valid record, or a non-record value, yields `None`

mod errors;
mod registry;
mod report;
mod tags;
mod types;
mod validator;

pub use errors::{
    ErrorCode, FieldError, RegistryError, RegistryResult, RuleError, SchemaError, SchemaResult,
};
pub use registry::{Registry, RegistryBuilder, RuleFn};
pub use report::{FieldErrors, Violation};
pub use tags::{parse_rules, STRUCT_RULE};
pub use types::{FieldMeta, Getter, Record, RecordView, Schema, SchemaBuilder, Value};
