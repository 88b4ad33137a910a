//! fieldrules - rule-driven field validation for in-memory records
//!
//! ```
//! use fieldrules::{Record, Registry, Schema, Value};
//! use once_cell::sync::Lazy;
//!
//! struct Signup {
//!     name: String,
//! }
//!
//! static SIGNUP: Lazy<Schema<Signup>> = Lazy::new(|| {
//!     Schema::<Signup>::builder("Signup")
//!         .field("name", "long", |s| Value::from(&s.name))
//!         .build()
//!         .unwrap()
//! });
//!
//! impl Record for Signup {
//!     fn schema() -> &'static Schema<Self> {
//!         &SIGNUP
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Registry::builder()
//!         .rule("long", |v: &Value<'_>| match v.as_str() {
//!             Some(s) if s.len() > 5 => Ok(()),
//!             _ => Err("too short".into()),
//!         })
//!         .build()?;
//!
//!     let errors = registry.validate_record(&Signup { name: "hi".into() });
//!     assert_eq!(errors.unwrap().to_json(), serde_json::json!({ "name": "too short" }));
//!     assert!(registry.validate_record(&Signup { name: "Rosalind".into() }).is_none());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod observability;
pub mod validate;

pub use config::ValidatorConfig;
pub use validate::{
    ErrorCode, FieldError, FieldErrors, FieldMeta, Record, RecordView, Registry, RegistryBuilder,
    RegistryError, RuleError, Schema, SchemaError, Value, Violation,
};
