//! End-to-end properties of the compile/validate pipeline.

use conforma::{Engine, ValidationErrorKind};
use serde_json::json;

/// Compiling a schema never mutates the raw document, and neither do
/// subsequent validations.
#[test]
fn test_compile_never_mutates_schema() {
    let engine = Engine::new();
    let raw = json!({
        "type": "object",
        "properties": {
            "age": {"type": "number", "minimum": 18, "default": 21},
            "tags": {"type": "array", "items": {"type": "string"}}
        },
        "required": ["age"],
        "additionalProperties": false
    });
    let snapshot = raw.clone();

    let schema = engine.compile(&raw).expect("schema compiles");
    assert_eq!(raw, snapshot);

    let _ = schema.validate(&json!({"age": 15}));
    let _ = schema.validate(&json!({}));
    let _ = schema.validate(&json!("not even an object"));
    assert_eq!(raw, snapshot);
}

/// Two independent validations of equal data produce structurally equal
/// results.
#[test]
fn test_validation_is_deterministic() {
    let schema = conforma::compile(&json!({
        "type": "object",
        "properties": {
            "h": {"type": "string", "default": "world"},
            "n": {"type": "number", "minimum": 3}
        },
        "required": ["h"]
    }))
    .expect("schema compiles");

    for data in [json!({}), json!({"n": 1}), json!({"h": "x", "n": 10})] {
        let first = schema.validate(&data);
        let second = schema.validate(&data);
        assert_eq!(first.valid, second.valid);
        assert_eq!(first.data, second.data);
        assert_eq!(
            first.error.map(|e| (e.pointer, e.keyword)),
            second.error.map(|e| (e.pointer, e.keyword))
        );
    }
}

/// The documented failure chain for a nested property violation.
#[test]
fn test_nested_property_failure_chain() {
    let schema = conforma::compile(&json!({
        "type": "object",
        "properties": {"age": {"type": "number", "minimum": 18}}
    }))
    .expect("schema compiles");

    let outcome = schema.validate(&json!({"name": "John Doe", "age": 15}));
    assert!(!outcome.valid);

    let error = outcome.error.expect("failure chain");
    assert!(error.message().contains("is invalid"));

    let cause = error.cause.as_deref().expect("cause");
    assert_eq!(cause.pointer, "#/properties/age/minimum");
    assert_eq!(cause.keyword, "minimum");
    assert_eq!(cause.schema, json!(18));
    assert_eq!(cause.data, json!(15));
}

/// Structurally equal objects count as duplicates regardless of key order.
#[test]
fn test_unique_items_structural_duplicates() {
    let schema = conforma::compile(&json!({"type": "array", "uniqueItems": true}))
        .expect("schema compiles");

    assert!(!schema.is_valid(&json!([{"a": 1}, {"a": 1}])));

    let reordered = serde_json::from_str::<serde_json::Value>(
        r#"[{"a": 1, "b": 2}, {"b": 2, "a": 1}]"#,
    )
    .expect("parses");
    assert!(!schema.is_valid(&reordered));

    assert!(schema.is_valid(&json!([{"a": 1}, {"a": 2}])));
}

/// Undeclared properties fail at the pointer of the offending data key.
#[test]
fn test_additional_properties_pointer() {
    let schema = conforma::compile(&json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {"a": {"type": "string"}}
    }))
    .expect("schema compiles");

    let outcome = schema.validate(&json!({"a": "x", "b": 1}));
    assert!(!outcome.valid);
    assert_eq!(outcome.error.expect("error").pointer, "#/b");
}

/// Required properties with declared defaults are injected as deep copies.
#[test]
fn test_required_default_injection() {
    let schema = conforma::compile(&json!({
        "type": "object",
        "properties": {"h": {"type": "string", "default": "world"}},
        "required": ["h"]
    }))
    .expect("schema compiles");

    let outcome = schema.validate(&json!({}));
    assert!(outcome.valid);
    assert_eq!(outcome.data["h"], json!("world"));
}

/// Boolean schemas: `true` accepts every primitive kind, `false` rejects
/// everything.
#[test]
fn test_boolean_schemas() {
    let accept = conforma::compile(&json!(true)).expect("schema compiles");
    for value in [
        json!("s"),
        json!(3),
        json!(true),
        json!([1, 2]),
        json!({"k": "v"}),
        json!(null),
    ] {
        assert!(accept.is_valid(&value));
    }

    let reject = conforma::compile(&json!(false)).expect("schema compiles");
    for value in [
        json!("s"),
        json!(3),
        json!(true),
        json!([1, 2]),
        json!({"k": "v"}),
        json!(null),
    ] {
        assert!(!reject.is_valid(&value));
    }
}

/// Decimal multiples survive binary floating-point representation error.
#[test]
fn test_multiple_of_tolerance() {
    let schema = conforma::compile(&json!({"type": "number", "multipleOf": 0.01}))
        .expect("schema compiles");
    assert!(schema.is_valid(&json!(29.99)));
}

/// Structural compile defects are fatal and synchronous.
#[test]
fn test_compile_errors_are_fatal() {
    let engine = Engine::new();
    assert!(engine.compile(&json!({"type": "nonsense"})).is_err());
    assert!(engine.compile(&json!({"pattern": "("})).is_err());
    assert!(engine
        .compile(&json!({"type": "object", "patternProperties": {"(": {}}}))
        .is_err());
}

/// Validation failures come back in the outcome, never as panics, and the
/// unknown-format case is a failure kind of its own.
#[test]
fn test_failures_are_values() {
    let schema = conforma::compile(&json!({"type": "string", "format": "no-such-format"}))
        .expect("schema compiles");
    let outcome = schema.validate(&json!("data"));
    assert!(!outcome.valid);
    assert!(matches!(
        outcome.error.expect("error").kind,
        ValidationErrorKind::UnknownFormat { .. }
    ));
}
