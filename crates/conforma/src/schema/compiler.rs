//! Schema compiler
//!
//! Recursive descent over a raw schema document, producing one
//! [`SchemaNode`](super::SchemaNode) per schema occurrence. The compiler
//! normalizes boolean and literal schemas, resolves the `type` union
//! against the engine's type registry, binds keyword validators in
//! encounter order, and compiles nested sub-schemas into children at
//! extended pointers. The raw document is never mutated.

use crate::engine::Engine;
use crate::error::{SchemaError, SchemaResult};
use crate::pointer;
use crate::schema::{BoundKeyword, ChildEntry, ChildSlot, NodeCaches, ResolvedType, SchemaNode};
use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Keys whose mapping value is a single nested schema.
const SINGLE_SCHEMA_KEYS: &[&str] = &[
    "additionalProperties",
    "additionalItems",
    "propertyNames",
    "contains",
    "not",
    "if",
    "then",
    "else",
];

/// Keys whose mapping value is a map of named sub-schemas.
const MAP_SCHEMA_KEYS: &[&str] = &["properties", "patternProperties", "dependencies"];

/// Keys whose array value is compiled element-wise.
const LIST_SCHEMA_KEYS: &[&str] = &["allOf", "anyOf", "oneOf"];

pub(crate) struct Compiler<'e> {
    engine: &'e Engine,
}

impl<'e> Compiler<'e> {
    pub(crate) fn new(engine: &'e Engine) -> Self {
        Self { engine }
    }

    pub(crate) fn compile(&self, raw: &Value) -> SchemaResult<SchemaNode> {
        self.compile_node(raw, pointer::ROOT.to_string())
    }

    fn compile_node(&self, raw: &Value, pointer: String) -> SchemaResult<SchemaNode> {
        trace!(pointer = %pointer, "compiling schema node");
        let map = self.normalize(raw);
        let types = self.resolve_types(&map, &pointer)?;
        self.check_patterns(&map, &pointer)?;

        let mut keywords = Vec::new();
        for (key, value) in &map {
            if key == "type" {
                continue;
            }
            if let Some(spec) = self.engine.keyword(key) {
                let applicable = spec
                    .applicable
                    .as_deref()
                    .filter(|name| *name != "any")
                    .and_then(|name| self.engine.lookup_type(name))
                    .cloned();
                keywords.push(BoundKeyword {
                    name: key.clone(),
                    value: value.clone(),
                    validator: spec.validator.clone(),
                    applicable,
                });
            }
            // unrecognized keys are preserved in `raw` but not interpreted
        }

        let children = self.compile_children(&map, &pointer)?;

        Ok(SchemaNode {
            pointer,
            raw: map,
            types,
            keywords,
            children,
            caches: NodeCaches::default(),
        })
    }

    /// Boolean and literal schemas expand to equivalent mappings: `true`
    /// accepts any of the known primitive types, `false` accepts from an
    /// empty alternative set, any other non-mapping value becomes a
    /// single-value equality constraint.
    fn normalize(&self, raw: &Value) -> Map<String, Value> {
        match raw {
            Value::Object(map) => map.clone(),
            Value::Bool(true) => {
                let names: Vec<Value> = self
                    .engine
                    .type_names()
                    .map(|name| Value::String(name.to_string()))
                    .collect();
                let mut map = Map::new();
                map.insert("type".to_string(), Value::Array(names));
                map
            }
            Value::Bool(false) => {
                let mut map = Map::new();
                map.insert("anyOf".to_string(), json!([]));
                map
            }
            literal => {
                let mut map = Map::new();
                map.insert("enum".to_string(), json!([literal.clone()]));
                map
            }
        }
    }

    /// Resolve the declared `type` into a union of known type predicates.
    /// Accepts a single name, a comma-separated list, or an array of
    /// names; unknown names are silently dropped. A declared type that
    /// resolves to nothing is a fatal schema error.
    fn resolve_types(
        &self,
        map: &Map<String, Value>,
        pointer: &str,
    ) -> SchemaResult<Vec<ResolvedType>> {
        let Some(declared) = map.get("type") else {
            return Ok(Vec::new());
        };
        let names: Vec<String> = match declared {
            Value::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            Value::Array(list) => list
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        let mut resolved = Vec::new();
        for name in names {
            match self.engine.lookup_type(&name) {
                Some(check) => resolved.push(ResolvedType {
                    name,
                    check: check.clone(),
                }),
                None => debug!(type_name = %name, pointer = %pointer, "dropping unknown type"),
            }
        }
        if resolved.is_empty() {
            return Err(SchemaError::EmptyTypeUnion {
                pointer: pointer.to_string(),
                declared: match declared {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            });
        }
        Ok(resolved)
    }

    /// Pattern syntax is verified up front so `compile` fails fast; the
    /// compiled regexes themselves are cached lazily on first validation.
    fn check_patterns(&self, map: &Map<String, Value>, pointer: &str) -> SchemaResult<()> {
        if let Some(Value::String(pattern)) = map.get("pattern") {
            Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
                pointer: pointer::join(pointer, "pattern"),
                pattern: pattern.clone(),
                source: Box::new(source),
            })?;
        }
        if let Some(Value::Object(patterns)) = map.get("patternProperties") {
            for pattern in patterns.keys() {
                Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
                    pointer: pointer::join(pointer, "patternProperties"),
                    pattern: pattern.clone(),
                    source: Box::new(source),
                })?;
            }
        }
        Ok(())
    }

    /// Compile nested sub-schemas into children at extended pointers.
    /// Non-schema-like array members are preserved as literals for the
    /// keywords that compare by value.
    fn compile_children(
        &self,
        map: &Map<String, Value>,
        parent: &str,
    ) -> SchemaResult<HashMap<String, ChildSlot>> {
        let mut children = HashMap::new();
        for (key, value) in map {
            if key == "items" {
                match value {
                    Value::Object(_) => {
                        let node = self.compile_node(value, pointer::join(parent, key))?;
                        children.insert(key.clone(), ChildSlot::Node(Box::new(node)));
                    }
                    Value::Array(entries) => {
                        let list = self.compile_list(entries, parent, key)?;
                        children.insert(key.clone(), ChildSlot::List(list));
                    }
                    _ => {}
                }
            } else if SINGLE_SCHEMA_KEYS.contains(&key.as_str()) {
                if let Value::Object(_) = value {
                    let node = self.compile_node(value, pointer::join(parent, key))?;
                    children.insert(key.clone(), ChildSlot::Node(Box::new(node)));
                }
            } else if MAP_SCHEMA_KEYS.contains(&key.as_str()) {
                if let Value::Object(entries) = value {
                    let base = pointer::join(parent, key);
                    let mut compiled = HashMap::new();
                    for (name, sub) in entries {
                        if let Value::Object(_) = sub {
                            let node = self.compile_node(sub, pointer::join(&base, name))?;
                            compiled.insert(name.clone(), node);
                        }
                    }
                    children.insert(key.clone(), ChildSlot::Map(compiled));
                }
            } else if LIST_SCHEMA_KEYS.contains(&key.as_str()) {
                if let Value::Array(entries) = value {
                    let list = self.compile_list(entries, parent, key)?;
                    children.insert(key.clone(), ChildSlot::List(list));
                }
            } else if !matches!(key.as_str(), "enum" | "const")
                && self.engine.keyword(key).is_some()
                && self.is_schema_like(value)
            {
                // registered custom keywords get the generic treatment:
                // a schema-like mapping compiles into a single child
                let node = self.compile_node(value, pointer::join(parent, key))?;
                children.insert(key.clone(), ChildSlot::Node(Box::new(node)));
            }
        }
        Ok(children)
    }

    fn compile_list(
        &self,
        entries: &[Value],
        parent: &str,
        key: &str,
    ) -> SchemaResult<Vec<ChildEntry>> {
        let base = pointer::join(parent, key);
        let mut list = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match entry {
                Value::Object(_) => {
                    let node = self.compile_node(entry, pointer::join(&base, index))?;
                    list.push(ChildEntry::Node(node));
                }
                other => list.push(ChildEntry::Literal(other.clone())),
            }
        }
        Ok(list)
    }

    /// A mapping is schema-like when it declares `type` or any key the
    /// keyword registry recognizes.
    fn is_schema_like(&self, value: &Value) -> bool {
        match value {
            Value::Object(map) => {
                map.contains_key("type")
                    || map.keys().any(|key| self.engine.keyword(key).is_some())
            }
            _ => false,
        }
    }
}
