//! Primitive type classification
//!
//! Pure predicates classifying a data value as one of the primitive kinds.
//! The engine's type registry maps kind names to these predicates; `type`
//! resolution at compile time captures them into the compiled node.

use serde_json::{Map, Value};
use std::sync::Arc;

/// A type predicate: classifies a data value as one primitive kind.
pub type TypePredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Human-readable kind name for a data value
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn is_object(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

pub(crate) fn is_array(value: &Value) -> bool {
    match value {
        Value::Array(_) => true,
        Value::Object(map) => is_array_like(map),
        _ => false,
    }
}

/// Array-like duck typing: a mapping with a numeric `length` whose other
/// keys are exactly the contiguous integers `0..length-1`, with `"0"` as the
/// first key when any exist.
///
/// Sparse or out-of-order mappings are deliberately rejected; the heuristic
/// is part of the observable `type: array` contract.
pub(crate) fn is_array_like(map: &Map<String, Value>) -> bool {
    let Some(length) = map.get("length").and_then(Value::as_u64) else {
        return false;
    };
    let keys: Vec<&String> = map.keys().filter(|k| k.as_str() != "length").collect();
    if keys.len() as u64 != length {
        return false;
    }
    if length > 0 && keys[0] != "0" {
        return false;
    }
    (0..length).all(|i| map.contains_key(&i.to_string()))
}

pub(crate) fn is_string(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

pub(crate) fn is_number(value: &Value) -> bool {
    matches!(value, Value::Number(_))
}

pub(crate) fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        _ => false,
    }
}

pub(crate) fn is_boolean(value: &Value) -> bool {
    matches!(value, Value::Bool(_))
}

pub(crate) fn is_null(value: &Value) -> bool {
    matches!(value, Value::Null)
}

/// The built-in kinds registered on every new engine, in registration order.
pub(crate) fn built_in() -> Vec<(&'static str, TypePredicate)> {
    vec![
        ("object", Arc::new(is_object) as TypePredicate),
        ("array", Arc::new(is_array)),
        ("string", Arc::new(is_string)),
        ("number", Arc::new(is_number)),
        ("integer", Arc::new(is_integer)),
        ("boolean", Arc::new(is_boolean)),
        ("null", Arc::new(is_null)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!(true)), "boolean");
        assert_eq!(type_name(&json!(42)), "integer");
        assert_eq!(type_name(&json!(3.5)), "number");
        assert_eq!(type_name(&json!("x")), "string");
        assert_eq!(type_name(&json!([])), "array");
        assert_eq!(type_name(&json!({})), "object");
    }

    #[test]
    fn test_integer_predicate() {
        assert!(is_integer(&json!(42)));
        assert!(is_integer(&json!(-7)));
        assert!(is_integer(&json!(2.0)));
        assert!(!is_integer(&json!(2.5)));
        assert!(!is_integer(&json!("2")));
    }

    #[test]
    fn test_array_like_accepted() {
        let value = json!({"0": "a", "1": "b", "length": 2});
        assert!(is_array(&value));

        let empty = json!({"length": 0});
        assert!(is_array(&empty));
    }

    #[test]
    fn test_array_like_rejected() {
        // no length
        assert!(!is_array(&json!({"0": "a"})));
        // length mismatch
        assert!(!is_array(&json!({"0": "a", "length": 2})));
        // first key is not "0" (out-of-order false negative is intentional)
        assert!(!is_array(&json!({"1": "b", "0": "a", "length": 2})));
        // sparse
        assert!(!is_array(&json!({"0": "a", "2": "c", "length": 2})));
        // non-numeric length
        assert!(!is_array(&json!({"0": "a", "length": "1"})));
        // plain object
        assert!(!is_array(&json!({"a": 1})));
    }

    #[test]
    fn test_object_excludes_array() {
        assert!(is_object(&json!({"a": 1})));
        assert!(!is_object(&json!([1, 2])));
        assert!(!is_object(&json!(null)));
    }
}
