//! The validator engine
//!
//! An [`Engine`] owns the three name-keyed registries (type predicates,
//! format predicates, keyword validators) and compiles raw schemas against
//! them. Registration must happen before `compile`: compiled schemas
//! capture their validators and a snapshot of the format registry at
//! compile time, so later registry mutation has no effect on them.

use crate::error::{SchemaResult, ValidationResult};
use crate::keywords::{self, Keyword, KeywordSpec};
use crate::registry::ResolveRef;
use crate::schema::{compiler::Compiler, CompileContext, CompiledSchema, SchemaNode};
use crate::types::{self, TypePredicate};
use crate::validator::Scope;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A format predicate: classifies a string as conforming to a named format.
pub type FormatPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Default bound on chained `$ref` resolution depth.
const DEFAULT_REF_DEPTH_LIMIT: usize = 64;

/// The schema compiler and its registries.
pub struct Engine {
    /// Type predicates in registration order, so type-name listings
    /// (e.g. the expansion of a `true` schema) are deterministic
    types: Vec<(String, TypePredicate)>,
    formats: HashMap<String, FormatPredicate>,
    keywords: HashMap<String, KeywordSpec>,
    resolver: Option<Arc<dyn ResolveRef>>,
    ref_depth_limit: usize,
}

impl Engine {
    /// An engine with the built-in types, keywords, and formats registered.
    pub fn new() -> Self {
        Self {
            types: types::built_in()
                .into_iter()
                .map(|(name, check)| (name.to_string(), check))
                .collect(),
            formats: built_in_formats(),
            keywords: keywords::built_in(),
            resolver: None,
            ref_depth_limit: DEFAULT_REF_DEPTH_LIMIT,
        }
    }

    /// Register (or replace) a type predicate.
    pub fn add_type<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let predicate: TypePredicate = Arc::new(predicate);
        match self.types.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = predicate,
            None => self.types.push((name, predicate)),
        }
    }

    /// Register (or replace) a format predicate.
    pub fn add_format<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.formats.insert(name.into(), Arc::new(predicate));
    }

    /// Register (or replace) a keyword validator. `applicable_type` scopes
    /// the keyword to data of one primitive kind; `None` (or `"any"`)
    /// applies it unconditionally.
    pub fn add_keyword<F>(
        &mut self,
        name: impl Into<String>,
        validator: F,
        applicable_type: Option<&str>,
    ) where
        F: Fn(&SchemaNode, &Keyword<'_>, &mut Value, &Scope<'_>) -> ValidationResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.keywords.insert(
            name.into(),
            KeywordSpec {
                validator: Arc::new(validator),
                applicable: applicable_type.map(str::to_string),
            },
        );
    }

    /// Install the reference-resolution collaborator consulted by `$ref`.
    pub fn with_resolver(mut self, resolver: Arc<dyn ResolveRef>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Replace the reference-resolution collaborator.
    pub fn set_resolver(&mut self, resolver: Arc<dyn ResolveRef>) {
        self.resolver = Some(resolver);
    }

    /// Bound the depth of chained `$ref` resolution; a chain exceeding the
    /// budget fails validation instead of recursing without limit.
    pub fn set_ref_depth_limit(&mut self, limit: usize) {
        self.ref_depth_limit = limit;
    }

    /// Compile a raw schema into a reusable validator. Structural defects
    /// (a declared type resolving to nothing, invalid pattern syntax) fail
    /// here; there is no partial compilation.
    pub fn compile(&self, schema: &Value) -> SchemaResult<CompiledSchema> {
        let root = Compiler::new(self).compile(schema)?;
        let context = Arc::new(CompileContext {
            formats: self.formats.clone(),
            resolver: self.resolver.clone(),
            ref_depth_limit: self.ref_depth_limit,
        });
        Ok(CompiledSchema { root, context })
    }

    pub(crate) fn lookup_type(&self, name: &str) -> Option<&TypePredicate> {
        self.types
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, check)| check)
    }

    pub(crate) fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn keyword(&self, name: &str) -> Option<&KeywordSpec> {
        self.keywords.get(name)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn built_in_formats() -> HashMap<String, FormatPredicate> {
    let table: [(&str, fn(&str) -> bool); 12] = [
        ("date-time", conforma_formats::date_time),
        ("date", conforma_formats::date),
        ("time", conforma_formats::time),
        ("email", conforma_formats::email),
        ("hostname", conforma_formats::hostname),
        ("ipv4", conforma_formats::ipv4),
        ("ipv6", conforma_formats::ipv6),
        ("uri", conforma_formats::uri),
        ("uri-reference", conforma_formats::uri_reference),
        ("json-pointer", conforma_formats::json_pointer),
        ("regex", conforma_formats::regex_syntax),
        ("uuid", conforma_formats::uuid),
    ];
    table
        .into_iter()
        .map(|(name, predicate)| (name.to_string(), Arc::new(predicate) as FormatPredicate))
        .collect()
}
