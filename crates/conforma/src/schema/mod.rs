//! Compiled schema representation
//!
//! A raw schema document compiles once into a tree of [`SchemaNode`]s. Each
//! node carries its pointer, the captured type predicates and keyword
//! validators, its compiled children, and a set of write-once caches that
//! are filled lazily on first validation. Apart from those caches a node is
//! immutable after compilation, which is what makes a [`CompiledSchema`]
//! freely shareable across threads.

pub(crate) mod compiler;

use crate::engine::FormatPredicate;
use crate::error::ValidationResult;
use crate::keywords::KeywordFn;
use crate::registry::ResolveRef;
use crate::types::TypePredicate;
use crate::validator::{Outcome, Scope};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A compiled, reusable validator for one schema document.
pub struct CompiledSchema {
    pub(crate) root: SchemaNode,
    pub(crate) context: Arc<CompileContext>,
}

impl CompiledSchema {
    /// Validate a data value without touching it: the input is deep-cloned
    /// wholly before any keyword runs, and the (possibly defaulted) clone is
    /// returned in the outcome.
    pub fn validate(&self, data: &Value) -> Outcome {
        let mut clone = data.clone();
        match self.validate_mut(&mut clone) {
            Ok(()) => Outcome {
                valid: true,
                data: clone,
                error: None,
            },
            Err(error) => Outcome {
                valid: false,
                data: clone,
                error: Some(error),
            },
        }
    }

    /// Validate a data value in place. Defaults declared for required,
    /// absent properties are injected directly into `data`.
    pub fn validate_mut(&self, data: &mut Value) -> ValidationResult<()> {
        let scope = Scope::new(self.context.as_ref());
        self.root.validate_value(data, &scope)
    }

    /// Convenience pass/fail check; never mutates the input.
    pub fn is_valid(&self, data: &Value) -> bool {
        self.validate(data).valid
    }

    /// The compiled root node.
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Snapshot of the engine state a schema was compiled against.
///
/// Compiled nodes never reach back into the engine; everything they need at
/// validation time lives here, so mutating the engine's registries after
/// compilation cannot affect existing validators.
pub(crate) struct CompileContext {
    pub(crate) formats: HashMap<String, FormatPredicate>,
    pub(crate) resolver: Option<Arc<dyn ResolveRef>>,
    pub(crate) ref_depth_limit: usize,
}

/// One compiled schema occurrence: a pointer-tagged node with its captured
/// validators, compiled children, and lazy caches.
pub struct SchemaNode {
    pub(crate) pointer: String,
    /// The normalized raw schema mapping this node was compiled from
    pub(crate) raw: Map<String, Value>,
    /// Resolved `type` union; empty when the schema declares no type
    pub(crate) types: Vec<ResolvedType>,
    /// Keyword validators bound in encounter order
    pub(crate) keywords: Vec<BoundKeyword>,
    /// Compiled children per schema key
    pub(crate) children: HashMap<String, ChildSlot>,
    pub(crate) caches: NodeCaches,
}

pub(crate) struct ResolvedType {
    pub(crate) name: String,
    pub(crate) check: TypePredicate,
}

pub(crate) struct BoundKeyword {
    pub(crate) name: String,
    pub(crate) value: Value,
    pub(crate) validator: KeywordFn,
    /// Data-kind gate captured from the keyword's declared applicability
    pub(crate) applicable: Option<TypePredicate>,
}

/// Compiled children of one schema key.
pub enum ChildSlot {
    /// A single nested schema (`items` uniform form, `not`, `if`, ...)
    Node(Box<SchemaNode>),
    /// Element-wise compiled array (`allOf`, tuple `items`, ...); entries
    /// that are not schema-like stay literal
    List(Vec<ChildEntry>),
    /// Name-keyed nested schemas (`properties`, `patternProperties`, ...)
    Map(HashMap<String, SchemaNode>),
}

/// One member of a compiled schema array.
pub enum ChildEntry {
    Node(SchemaNode),
    /// Preserved verbatim for keywords that compare by value
    Literal(Value),
}

/// Write-once caches filled on first validation.
///
/// Concurrent first use may race; every initializer is a pure function of
/// the node's immutable fields, so racing writers compute equal values and
/// the cell keeps whichever lands first.
#[derive(Default)]
pub(crate) struct NodeCaches {
    property_keys: OnceCell<Vec<String>>,
    required_keys: OnceCell<Vec<String>>,
    pattern_regexes: OnceCell<Vec<(String, Regex)>>,
    pattern: OnceCell<Option<Regex>>,
    pub(crate) ref_target: OnceCell<Arc<CompiledSchema>>,
}

impl SchemaNode {
    /// Absolute pointer of this node (`#`, `#/properties/age`, ...)
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// The normalized raw schema mapping this node was compiled from
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Raw value of one schema key, if present
    pub fn constraint(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Compiled children of one schema key, if any
    pub fn child(&self, key: &str) -> Option<&ChildSlot> {
        self.children.get(key)
    }

    /// Declared property names, in schema order
    pub(crate) fn property_keys(&self) -> &[String] {
        self.caches.property_keys.get_or_init(|| {
            self.raw
                .get("properties")
                .and_then(Value::as_object)
                .map(|map| map.keys().cloned().collect())
                .unwrap_or_default()
        })
    }

    /// Required property names
    pub(crate) fn required_keys(&self) -> &[String] {
        self.caches.required_keys.get_or_init(|| {
            self.raw
                .get("required")
                .and_then(Value::as_array)
                .map(|list| {
                    list.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    /// Compiled `patternProperties` regexes, in schema order.
    /// Pattern syntax was checked at compile time, so entries that fail to
    /// build here cannot occur; they are skipped rather than unwrapped.
    pub(crate) fn pattern_regexes(&self) -> &[(String, Regex)] {
        self.caches.pattern_regexes.get_or_init(|| {
            self.raw
                .get("patternProperties")
                .and_then(Value::as_object)
                .map(|map| {
                    map.keys()
                        .filter_map(|p| Regex::new(p).ok().map(|re| (p.clone(), re)))
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    /// Compiled `pattern` regex, if the schema declares one
    pub(crate) fn pattern_regex(&self) -> Option<&Regex> {
        self.caches
            .pattern
            .get_or_init(|| {
                self.raw
                    .get("pattern")
                    .and_then(Value::as_str)
                    .and_then(|p| Regex::new(p).ok())
            })
            .as_ref()
    }
}

impl fmt::Debug for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaNode")
            .field("pointer", &self.pointer)
            .field(
                "types",
                &self.types.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            )
            .field(
                "keywords",
                &self
                    .keywords
                    .iter()
                    .map(|k| k.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
