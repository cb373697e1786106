//! Value comparison helpers
//!
//! Deep structural equality (numbers compared by numeric value, the way
//! `enum`/`const` candidates are matched) and the canonical comparison key
//! used by `uniqueItems` to detect duplicates regardless of object key
//! order.

use serde_json::Value;

/// Deep structural equality with numeric values compared by value,
/// so `1` and `1.0` are equal candidates.
pub(crate) fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| json_eq(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| json_eq(v, w)))
        }
        _ => a == b,
    }
}

/// Canonical comparison key for duplicate detection.
///
/// Strings carry a distinguishing prefix so `"5"` and `5` never collide;
/// objects are serialized with keys sorted lexically at every level; arrays
/// are serialized in order; all other scalars stringify.
pub(crate) fn comparison_key(value: &Value) -> String {
    match value {
        Value::String(s) => format!("s#{}", s),
        Value::Object(_) | Value::Array(_) => {
            let mut out = String::new();
            write_canonical(value, &mut out);
            out
        }
        other => other.to_string(),
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                if let Some(v) = map.get(*key) {
                    write_canonical(v, out);
                }
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_eq_numbers_by_value() {
        assert!(json_eq(&json!(1), &json!(1.0)));
        assert!(!json_eq(&json!(1), &json!(2)));
    }

    #[test]
    fn test_json_eq_deep() {
        assert!(json_eq(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2]})));
        assert!(!json_eq(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!json_eq(&json!([1, 2]), &json!([2, 1])));
    }

    #[test]
    fn test_comparison_key_distinguishes_string_from_number() {
        assert_ne!(comparison_key(&json!("5")), comparison_key(&json!(5)));
    }

    #[test]
    fn test_comparison_key_ignores_object_key_order() {
        let a = serde_json::from_str::<Value>(r#"{"a": 1, "b": 2}"#).unwrap();
        let b = serde_json::from_str::<Value>(r#"{"b": 2, "a": 1}"#).unwrap();
        assert_eq!(comparison_key(&a), comparison_key(&b));
    }

    #[test]
    fn test_comparison_key_nested_objects_sorted() {
        let a = serde_json::from_str::<Value>(r#"[{"x": 1, "y": 2}]"#).unwrap();
        let b = serde_json::from_str::<Value>(r#"[{"y": 2, "x": 1}]"#).unwrap();
        assert_eq!(comparison_key(&a), comparison_key(&b));
    }

    #[test]
    fn test_comparison_key_arrays_keep_order() {
        assert_ne!(comparison_key(&json!([1, 2])), comparison_key(&json!([2, 1])));
    }
}
