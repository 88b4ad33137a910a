//! Validation Invariant Tests
//!
//! - Untagged records are always valid
//! - Valid records yield no report
//! - Rules short-circuit at a field's first failure
//! - Unknown rules are reported per field
//! - Non-records are vacuously valid
//! - Validation is deterministic and thread-safe

use fieldrules::validate::RuleError;
use fieldrules::{ErrorCode, FieldError, Record, Registry, Schema, Value};
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// Helper Types
// =============================================================================

struct Plain {
    name: String,
    count: u32,
}

static PLAIN_SCHEMA: Lazy<Schema<Plain>> = Lazy::new(|| {
    Schema::<Plain>::builder("Plain")
        .untagged("name", |p| Value::from(&p.name))
        .untagged("count", |p| Value::from(p.count))
        .build()
        .unwrap()
});

impl Record for Plain {
    fn schema() -> &'static Schema<Self> {
        &PLAIN_SCHEMA
    }
}

struct Single {
    a: String,
}

static SINGLE_SCHEMA: Lazy<Schema<Single>> = Lazy::new(|| {
    Schema::<Single>::builder("Single")
        .field("A", "long", |s| Value::from(&s.a))
        .build()
        .unwrap()
});

impl Record for Single {
    fn schema() -> &'static Schema<Self> {
        &SINGLE_SCHEMA
    }
}

struct Chained {
    value: String,
}

static CHAINED_SCHEMA: Lazy<Schema<Chained>> = Lazy::new(|| {
    Schema::<Chained>::builder("Chained")
        .field("value", "first,second", |c| Value::from(&c.value))
        .build()
        .unwrap()
});

impl Record for Chained {
    fn schema() -> &'static Schema<Self> {
        &CHAINED_SCHEMA
    }
}

struct Misconfigured {
    title: String,
    body: String,
}

static MISCONFIGURED_SCHEMA: Lazy<Schema<Misconfigured>> = Lazy::new(|| {
    Schema::<Misconfigured>::builder("Misconfigured")
        .field("title", "bogus", |m| Value::from(&m.title))
        .field("body", "long,bogus", |m| Value::from(&m.body))
        .build()
        .unwrap()
});

impl Record for Misconfigured {
    fn schema() -> &'static Schema<Self> {
        &MISCONFIGURED_SCHEMA
    }
}

struct Hidden {
    visible: String,
    hidden: String,
}

static HIDDEN_SCHEMA: Lazy<Schema<Hidden>> = Lazy::new(|| {
    Schema::<Hidden>::builder("Hidden")
        .field("visible", "long", |h| Value::from(&h.visible))
        .private_field("hidden", "explode", |h| Value::from(&h.hidden))
        .build()
        .unwrap()
});

impl Record for Hidden {
    fn schema() -> &'static Schema<Self> {
        &HIDDEN_SCHEMA
    }
}

struct Malformed {
    a: String,
    b: String,
    c: String,
}

static MALFORMED_SCHEMA: Lazy<Schema<Malformed>> = Lazy::new(|| {
    Schema::<Malformed>::builder("Malformed")
        .field("A", ",", |m| Value::from(&m.a))
        .field("B", "long,,long", |m| Value::from(&m.b))
        .field("C", "long, short", |m| Value::from(&m.c))
        .build()
        .unwrap()
});

impl Record for Malformed {
    fn schema() -> &'static Schema<Self> {
        &MALFORMED_SCHEMA
    }
}

struct Empty;

static EMPTY_SCHEMA: Lazy<Schema<Empty>> =
    Lazy::new(|| Schema::<Empty>::builder("Empty").build().unwrap());

impl Record for Empty {
    fn schema() -> &'static Schema<Self> {
        &EMPTY_SCHEMA
    }
}

fn long(v: &Value<'_>) -> Result<(), RuleError> {
    match v.as_str() {
        Some(s) if s.len() > 5 => Ok(()),
        _ => Err("long-error".into()),
    }
}

fn explode(_: &Value<'_>) -> Result<(), RuleError> {
    panic!("rule must not be invoked");
}

fn long_registry() -> Registry {
    Registry::builder()
        .rule("long", long)
        .rule("explode", explode)
        .build()
        .unwrap()
}

// =============================================================================
// Baseline Tests
// =============================================================================

/// Concrete scenario: a short value fails "long", a longer one passes.
#[test]
fn test_long_rule_scenario() {
    let registry = long_registry();

    let errors = registry
        .validate_record(&Single { a: "hi".into() })
        .expect("short value must be reported");
    assert_eq!(errors.to_json(), json!({ "A": "long-error" }));

    assert!(registry.validate_record(&Single { a: "hello!".into() }).is_none());
}

/// A record without annotations is always valid.
#[test]
fn test_untagged_record_is_valid() {
    let registry = long_registry();
    let plain = Plain {
        name: String::new(),
        count: 0,
    };
    assert!(registry.validate_record(&plain).is_none());
}

/// A record with no fields is vacuously valid.
#[test]
fn test_empty_record_is_valid() {
    assert!(long_registry().validate_record(&Empty).is_none());
}

/// Non-exported fields are never read, even with rules attached.
#[test]
fn test_private_field_skipped() {
    let registry = long_registry();
    let hidden = Hidden {
        visible: "long enough".into(),
        hidden: "x".into(),
    };
    assert!(registry.validate_record(&hidden).is_none());
}

// =============================================================================
// Short-circuit Tests
// =============================================================================

/// The first failing rule is reported and later rules never run.
#[test]
fn test_first_failure_stops_field() {
    let second_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&second_calls);

    let registry = Registry::builder()
        .rule("first", |_: &Value<'_>| Err("first failed".into()))
        .rule("second", move |_: &Value<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            panic!("second rule must not run");
        })
        .build()
        .unwrap();

    let errors = registry
        .validate_record(&Chained { value: "x".into() })
        .unwrap();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("value").unwrap().to_string(), "first failed");
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

/// Later rules run when earlier ones pass.
#[test]
fn test_rules_run_in_order() {
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));
    let first_log = Arc::clone(&order);
    let second_log = Arc::clone(&order);

    let registry = Registry::builder()
        .rule("first", move |_: &Value<'_>| {
            first_log.lock().unwrap().push("first");
            Ok(())
        })
        .rule("second", move |_: &Value<'_>| {
            second_log.lock().unwrap().push("second");
            Err("second failed".into())
        })
        .build()
        .unwrap();

    let errors = registry
        .validate_record(&Chained { value: "x".into() })
        .unwrap();

    assert_eq!(errors.get("value").unwrap().to_string(), "second failed");
    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
}

// =============================================================================
// Unknown Rule Tests
// =============================================================================

/// An unknown rule name is reported against the field, naming the rule.
#[test]
fn test_unknown_rule_reported() {
    let registry = long_registry();
    let record = Misconfigured {
        title: "anything".into(),
        body: "a long enough body".into(),
    };

    let errors = registry.validate_record(&record).unwrap();
    assert_eq!(errors.len(), 2);

    let title = errors.get("title").unwrap();
    assert_eq!(title.code(), ErrorCode::UnknownRule);
    assert_eq!(title.unknown_rule(), Some("bogus"));
    assert!(title.to_string().contains("\"bogus\""));

    // "long" passes first, then "bogus" is looked up
    assert_eq!(errors.get("body").unwrap().unknown_rule(), Some("bogus"));
}

/// A data failure before the unknown rule wins.
#[test]
fn test_rule_failure_before_unknown_rule() {
    let registry = long_registry();
    let record = Misconfigured {
        title: "x".into(),
        body: "short".into(),
    };

    let errors = registry.validate_record(&record).unwrap();
    assert!(matches!(errors.get("body"), Some(FieldError::Rule(_))));
}

/// Empty segments in a tag are reported as an undefined rule named "".
#[test]
fn test_malformed_tags_reported() {
    let registry = Registry::builder().rule("long", long).build().unwrap();
    let record = Malformed {
        a: "long enough".into(),
        b: "long enough".into(),
        c: "long enough".into(),
    };

    let errors = registry.validate_record(&record).unwrap();
    assert_eq!(
        errors.to_json(),
        json!({
            "A": "undefined validator: \"\"",
            "B": "undefined validator: \"\"",
            "C": "undefined validator: \"short\""
        })
    );
    assert_eq!(errors.get("A").unwrap().unknown_rule(), Some(""));
    assert_eq!(
        registry.unknown_rules::<Malformed>(),
        vec![String::new(), "short".to_string()]
    );
}

/// Unknown rules can be found before any data is validated.
#[test]
fn test_unknown_rules_detected_up_front() {
    let registry = long_registry();
    assert_eq!(registry.unknown_rules::<Misconfigured>(), vec!["bogus".to_string()]);
    assert!(registry.unknown_rules::<Single>().is_empty());
}

// =============================================================================
// Non-record Tests
// =============================================================================

/// Primitives are not validated and no rule is called.
#[test]
fn test_non_record_invokes_nothing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let registry = Registry::builder()
        .rule("long", move |_: &Value<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .build()
        .unwrap();

    let names = vec![1, 2, 3];
    for value in [
        Value::from("hi"),
        Value::from(7u64),
        Value::from(false),
        Value::Null,
        Value::list([Value::from("a")]),
        Value::other(&names),
    ] {
        assert!(registry.validate(value).is_none());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// A reference to a record behaves like the record itself.
#[test]
fn test_reference_matches_value() {
    let registry = long_registry();
    let record = Single { a: "hi".into() };

    let by_value = registry.validate(Value::record(&record)).unwrap();
    let by_ref = registry
        .validate(Value::optional_record(Some(&record)))
        .unwrap();

    assert_eq!(by_value.to_json(), by_ref.to_json());
}

// =============================================================================
// Determinism and Concurrency
// =============================================================================

/// Same record validates the same way every time.
#[test]
fn test_validation_is_deterministic() {
    let registry = long_registry();
    let record = Misconfigured {
        title: "t".into(),
        body: "b".into(),
    };

    let expected = registry.validate_record(&record).unwrap().to_json();
    for _ in 0..100 {
        assert_eq!(registry.validate_record(&record).unwrap().to_json(), expected);
    }
}

/// A shared registry validates from many threads at once.
#[test]
fn test_concurrent_validation() {
    let registry = long_registry();

    std::thread::scope(|scope| {
        for i in 0..8 {
            let registry = &registry;
            scope.spawn(move || {
                let value = if i % 2 == 0 { "hi" } else { "hello world" };
                let record = Single { a: value.into() };
                let result = registry.validate_record(&record);
                assert_eq!(result.is_some(), i % 2 == 0);
            });
        }
    });
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Untagged records are valid whatever they contain.
    #[test]
    fn prop_untagged_always_valid(name in ".*", count in any::<u32>()) {
        let registry = long_registry();
        let result = registry.validate_record(&Plain { name, count });
        prop_assert!(result.is_none());
    }

    /// Values that satisfy every rule never produce a report.
    #[test]
    fn prop_passing_values_yield_none(a in "[a-z]{6,24}") {
        let registry = long_registry();
        let result = registry.validate_record(&Single { a });
        prop_assert!(result.is_none());
    }

    /// Values that fail produce exactly the rule's error.
    #[test]
    fn prop_failing_values_reported(a in "[a-z]{0,5}") {
        let registry = long_registry();
        let errors = registry.validate_record(&Single { a }).unwrap();
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors.get("A").unwrap().to_string(), "long-error");
    }
}
