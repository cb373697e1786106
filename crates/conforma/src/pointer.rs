//! Schema and data pointers
//!
//! Pointers are `/`-delimited paths rooted at `#` (`#`, `#/properties/age`).
//! They are assigned to compiled nodes once at compile time and reused in
//! every error the node reports; `resolve` walks a pointer through a data
//! value for diagnostics.

use serde_json::Value;
use std::fmt;

/// The document root pointer
pub const ROOT: &str = "#";

/// Extend a pointer with one segment
pub fn join(base: &str, segment: impl fmt::Display) -> String {
    format!("{}/{}", base, segment)
}

/// Navigate a data value along a pointer.
///
/// Returns the referenced value, or `None` when the path walks off the
/// data (missing key, out-of-range index, or descent into a scalar).
pub fn resolve<'a>(data: &'a Value, pointer: &str) -> Option<&'a Value> {
    let path = pointer.strip_prefix(ROOT).unwrap_or(pointer);
    let mut current = data;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join() {
        assert_eq!(join(ROOT, "properties"), "#/properties");
        assert_eq!(join("#/properties", "age"), "#/properties/age");
        assert_eq!(join("#/items", 0), "#/items/0");
    }

    #[test]
    fn test_resolve_root() {
        let data = json!({"a": 1});
        assert_eq!(resolve(&data, "#"), Some(&data));
    }

    #[test]
    fn test_resolve_object_key() {
        let data = json!({"a": {"b": 2}});
        assert_eq!(resolve(&data, "#/a/b"), Some(&json!(2)));
    }

    #[test]
    fn test_resolve_array_index() {
        let data = json!({"items": [10, 20, 30]});
        assert_eq!(resolve(&data, "#/items/1"), Some(&json!(20)));
    }

    #[test]
    fn test_resolve_misses() {
        let data = json!({"a": [1]});
        assert_eq!(resolve(&data, "#/missing"), None);
        assert_eq!(resolve(&data, "#/a/5"), None);
        assert_eq!(resolve(&data, "#/a/0/deeper"), None);
        assert_eq!(resolve(&data, "#/a/x"), None);
    }
}
