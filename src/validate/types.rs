//! Record and value type definitions
//!
//! Records describe themselves through a static [`Schema`]: an ordered list
//! of fields, each with a name, its parsed rule list, a visibility flag and
//! a getter producing a borrowed [`Value`]. Nothing is discovered at call
//! time.

use std::any::Any;
use std::fmt;

use super::errors::{SchemaError, SchemaResult};
use super::tags::parse_rules;

/// Borrowed runtime view of a field value, handed to rule functions.
pub enum Value<'a> {
    /// Absent or unit value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point
    Float(f64),
    /// UTF-8 string
    Str(&'a str),
    /// Sequence; elements are never validated individually
    List(Vec<Value<'a>>),
    /// A nested record
    Record(&'a dyn RecordView),
    /// One level of pointer or option indirection; `None` is a null pointer
    Indirect(Option<Box<Value<'a>>>),
    /// Any other host value, for rules that downcast
    Other(&'a (dyn Any + 'static)),
}

impl<'a> Value<'a> {
    /// Wraps a record
    pub fn record<R: Record>(record: &'a R) -> Self {
        Value::Record(record)
    }

    /// Wraps a value behind one level of indirection
    pub fn indirect(inner: Option<Value<'a>>) -> Self {
        Value::Indirect(inner.map(Box::new))
    }

    /// Wraps an optional record, e.g. an `Option<Address>` field
    pub fn optional_record<R: Record>(record: Option<&'a R>) -> Self {
        Value::indirect(record.map(Value::record))
    }

    /// Wraps an arbitrary host value
    pub fn other<T: Any>(value: &'a T) -> Self {
        Value::Other(value)
    }

    /// Builds a list value
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value<'a>>,
    {
        Value::List(items.into_iter().collect())
    }

    /// Strips exactly one level of indirection.
    ///
    /// Returns `None` for a null indirection. Values that are not
    /// indirect are returned unchanged.
    pub fn deref_once(&self) -> Option<&Value<'a>> {
        match self {
            Value::Indirect(inner) => inner.as_deref(),
            other => Some(other),
        }
    }

    /// Returns the record when this value is one (no dereferencing)
    pub fn as_record(&self) -> Option<&'a dyn RecordView> {
        match self {
            Value::Record(record) => Some(*record),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Str(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as `i64` if it is an integer that fits
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Returns the value as `u64` if it is a non-negative integer
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(n) => Some(*n),
            Value::Int(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Returns the value as `f64`, accepting integers too
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            Value::UInt(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Downcasts an [`Value::Other`] to a concrete host type
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        match self {
            Value::Other(any) => {
                let any: &'a (dyn Any + 'static) = *any;
                any.downcast_ref::<T>()
            }
            _ => None,
        }
    }

    /// True for `Null` and for a null indirection
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::Indirect(None))
    }

    /// Returns the value's kind for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Indirect(_) => "indirect",
            Value::Other(_) => "other",
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::UInt(n) => f.debug_tuple("UInt").field(n).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Record(record) => f.debug_tuple("Record").field(&record.record_name()).finish(),
            Value::Indirect(inner) => f.debug_tuple("Indirect").field(inner).finish(),
            Value::Other(_) => write!(f, "Other(..)"),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(s)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::Str(s.as_str())
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value<'_> {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<f64> for Value<'_> {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Value<'_> {
                fn from(n: $t) -> Self {
                    Value::$variant(n as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int, i64: i8, i16, i32, i64, isize);
impl_from_int!(UInt, u64: u8, u16, u32, u64, usize);

impl<'a, V> From<Option<V>> for Value<'a>
where
    V: Into<Value<'a>>,
{
    fn from(opt: Option<V>) -> Self {
        Value::indirect(opt.map(Into::into))
    }
}

/// Metadata for one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    name: String,
    rules: Vec<String>,
    exported: bool,
}

impl FieldMeta {
    /// Creates field metadata from a raw annotation string
    pub fn new(name: impl Into<String>, tag: &str, exported: bool) -> Self {
        Self {
            name: name.into(),
            rules: parse_rules(tag),
            exported,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered rule names for this field
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Whether the field may be read during validation
    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// Whether the field carries any rules
    pub fn is_tagged(&self) -> bool {
        !self.rules.is_empty()
    }
}

/// Field getter: borrows a field out of a record as a [`Value`].
pub type Getter<T> = for<'r> fn(&'r T) -> Value<'r>;

/// Static descriptor of a record type.
///
/// Built once per type and handed out as `&'static` from
/// [`Record::schema`].
pub struct Schema<T> {
    name: String,
    fields: Vec<FieldMeta>,
    getters: Vec<Getter<T>>,
}

impl<T> Schema<T> {
    /// Starts a schema for the record type named `name`
    pub fn builder(name: impl Into<String>) -> SchemaBuilder<T> {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            getters: Vec::new(),
            error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reads the field at `index` out of `record`
    pub fn get<'r>(&self, record: &'r T, index: usize) -> Option<Value<'r>> {
        self.getters.get(index).map(|getter| getter(record))
    }

    /// Every distinct rule name referenced by this schema, in first-use order
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for field in &self.fields {
            for rule in field.rules() {
                if !names.contains(&rule.as_str()) {
                    names.push(rule);
                }
            }
        }
        names
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder for [`Schema`]; fields are kept in the order they are added.
pub struct SchemaBuilder<T> {
    name: String,
    fields: Vec<FieldMeta>,
    getters: Vec<Getter<T>>,
    error: Option<SchemaError>,
}

impl<T> SchemaBuilder<T> {
    /// Declares a readable field with a rule annotation such as `"long,proper"`
    pub fn field(self, name: &str, tag: &str, getter: Getter<T>) -> Self {
        self.push(FieldMeta::new(name, tag, true), getter)
    }

    /// Declares a field that validation must not read
    pub fn private_field(self, name: &str, tag: &str, getter: Getter<T>) -> Self {
        self.push(FieldMeta::new(name, tag, false), getter)
    }

    /// Declares a field with no rules
    pub fn untagged(self, name: &str, getter: Getter<T>) -> Self {
        self.push(FieldMeta::new(name, "", true), getter)
    }

    fn push(mut self, meta: FieldMeta, getter: Getter<T>) -> Self {
        if self.error.is_none() && self.fields.iter().any(|f| f.name == meta.name) {
            self.error = Some(SchemaError::DuplicateField {
                record: self.name.clone(),
                field: meta.name.clone(),
            });
        }
        self.fields.push(meta);
        self.getters.push(getter);
        self
    }

    /// Finishes the schema
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateField` if a field name was declared twice.
    pub fn build(self) -> SchemaResult<Schema<T>> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Schema {
            name: self.name,
            fields: self.fields,
            getters: self.getters,
        })
    }
}

/// A type that can be validated field by field.
///
/// Implementors hand out a schema built once, typically held in a
/// `once_cell::sync::Lazy` static.
pub trait Record: Any {
    fn schema() -> &'static Schema<Self>
    where
        Self: Sized;
}

/// Type-erased access to a record's fields, used for nested traversal.
pub trait RecordView {
    /// Name of the record type
    fn record_name(&self) -> &str;

    /// Field metadata in declaration order
    fn fields(&self) -> &[FieldMeta];

    /// Reads the field at `index`
    fn field_value(&self, index: usize) -> Option<Value<'_>>;
}

impl<T: Record> RecordView for T {
    fn record_name(&self) -> &str {
        T::schema().name()
    }

    fn fields(&self) -> &[FieldMeta] {
        T::schema().fields()
    }

    fn field_value(&self, index: usize) -> Option<Value<'_>> {
        T::schema().get(self, index)
    }
}
