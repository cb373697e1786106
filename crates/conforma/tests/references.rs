//! Reference resolution and registry extension.

use conforma::{Engine, SchemaRegistry, ValidationErrorKind};
use serde_json::{json, Value};
use std::sync::Arc;

fn engine_with(registry: &SchemaRegistry) -> Engine {
    Engine::new().with_resolver(Arc::new(registry.clone()))
}

#[test]
fn test_ref_resolves_through_registry() {
    let registry = SchemaRegistry::new();
    let engine = engine_with(&registry);

    let person = engine
        .compile(&json!({
            "type": "object",
            "properties": {"name": {"type": "string"}},
            "required": ["name"]
        }))
        .expect("person compiles");
    registry.register("person", person);

    let schema = engine
        .compile(&json!({
            "type": "object",
            "properties": {"owner": {"$ref": "person"}}
        }))
        .expect("schema compiles");

    assert!(schema.is_valid(&json!({"owner": {"name": "Ada"}})));
    assert!(!schema.is_valid(&json!({"owner": {}})));
}

#[test]
fn test_ref_failure_chains_into_target() {
    let registry = SchemaRegistry::new();
    let engine = engine_with(&registry);

    let positive = engine
        .compile(&json!({"type": "number", "minimum": 0}))
        .expect("target compiles");
    registry.register("positive", positive);

    let schema = engine
        .compile(&json!({"$ref": "positive"}))
        .expect("schema compiles");

    let outcome = schema.validate(&json!(-3));
    let error = outcome.error.expect("error");
    assert!(matches!(
        error.kind,
        ValidationErrorKind::ReferencedSchemaFailed { .. }
    ));
    assert_eq!(error.leaf().keyword, "minimum");
}

#[test]
fn test_unresolved_ref_is_validation_failure() {
    let registry = SchemaRegistry::new();
    let engine = engine_with(&registry);

    let schema = engine
        .compile(&json!({"$ref": "never-registered"}))
        .expect("schema compiles");

    let outcome = schema.validate(&json!(1));
    assert!(!outcome.valid);
    assert_eq!(
        outcome.error.expect("error").kind,
        ValidationErrorKind::UnresolvedReference {
            reference: "never-registered".to_string()
        }
    );
}

#[test]
fn test_ref_without_resolver_is_unresolved() {
    let schema = conforma::compile(&json!({"$ref": "anything"})).expect("schema compiles");
    let outcome = schema.validate(&json!(1));
    assert!(matches!(
        outcome.error.expect("error").kind,
        ValidationErrorKind::UnresolvedReference { .. }
    ));
}

#[test]
fn test_ref_target_memoized_across_calls() {
    let registry = SchemaRegistry::new();
    let engine = engine_with(&registry);

    let target = engine
        .compile(&json!({"type": "string"}))
        .expect("target compiles");
    registry.register("word", target);

    let schema = engine
        .compile(&json!({"$ref": "word"}))
        .expect("schema compiles");

    // first call resolves and memoizes, later calls reuse the target
    assert!(schema.is_valid(&json!("a")));
    assert!(schema.is_valid(&json!("b")));
    assert!(!schema.is_valid(&json!(1)));
}

#[test]
fn test_cyclic_ref_hits_depth_budget() {
    let registry = SchemaRegistry::new();
    let mut engine = Engine::new().with_resolver(Arc::new(registry.clone()));
    engine.set_ref_depth_limit(8);

    let cyclic = engine
        .compile(&json!({"$ref": "loop"}))
        .expect("schema compiles");
    let handle = registry.register("loop", cyclic);

    let outcome = handle.validate(&json!(1));
    assert!(!outcome.valid);
    assert!(matches!(
        outcome.error.expect("error").leaf().kind,
        ValidationErrorKind::ReferenceDepthExceeded { limit: 8, .. }
    ));
}

#[test]
fn test_recursive_schema_on_finite_data() {
    let registry = SchemaRegistry::new();
    let engine = engine_with(&registry);

    // a tree: every node has a value and optional children of the same shape
    let tree = engine
        .compile(&json!({
            "type": "object",
            "properties": {
                "value": {"type": "number"},
                "children": {"type": "array", "items": {"$ref": "tree"}}
            },
            "required": ["value"]
        }))
        .expect("tree compiles");
    let handle = registry.register("tree", tree);

    let data = json!({
        "value": 1,
        "children": [
            {"value": 2},
            {"value": 3, "children": [{"value": 4}]}
        ]
    });
    assert!(handle.is_valid(&data));

    let broken = json!({"value": 1, "children": [{"no_value": true}]});
    assert!(!handle.is_valid(&broken));
}

// ==================== Registration Surface ====================

#[test]
fn test_custom_type_predicate() {
    let mut engine = Engine::new();
    engine.add_type("even", |value: &Value| {
        value.as_i64().is_some_and(|n| n % 2 == 0)
    });

    let schema = engine
        .compile(&json!({"type": "even"}))
        .expect("schema compiles");
    assert!(schema.is_valid(&json!(4)));
    assert!(!schema.is_valid(&json!(3)));
}

#[test]
fn test_custom_format_predicate() {
    let mut engine = Engine::new();
    engine.add_format("shouting", |s: &str| {
        !s.is_empty() && s.chars().all(|c| !c.is_lowercase())
    });

    let schema = engine
        .compile(&json!({"type": "string", "format": "shouting"}))
        .expect("schema compiles");
    assert!(schema.is_valid(&json!("LOUD")));
    assert!(!schema.is_valid(&json!("quiet")));
}

#[test]
fn test_custom_keyword_validator() {
    let mut engine = Engine::new();
    engine.add_keyword(
        "evenLength",
        |_node, kw, data, _scope| {
            let Value::String(s) = &*data else {
                return Ok(());
            };
            if kw.value == &Value::Bool(true) && s.len() % 2 != 0 {
                return Err(kw
                    .fail(ValidationErrorKind::StringLengthInvalid {
                        length: s.len(),
                        min_length: None,
                        max_length: None,
                    })
                    .with_schema(kw.value.clone())
                    .with_data(data.clone()));
            }
            Ok(())
        },
        Some("string"),
    );

    let schema = engine
        .compile(&json!({"type": "string", "evenLength": true}))
        .expect("schema compiles");
    assert!(schema.is_valid(&json!("abcd")));
    assert!(!schema.is_valid(&json!("abc")));
    // type-scoped: non-string data is not this keyword's business
    let untyped = engine
        .compile(&json!({"evenLength": true}))
        .expect("schema compiles");
    assert!(untyped.is_valid(&json!(123)));
}

#[test]
fn test_registry_mutation_after_compile_has_no_effect() {
    let mut engine = Engine::new();
    let compiled = engine
        .compile(&json!({"type": "string", "format": "email"}))
        .expect("schema compiles");

    // replacing the format after compilation does not reach the snapshot
    engine.add_format("email", |_s: &str| false);
    assert!(compiled.is_valid(&json!("user@example.com")));
}
