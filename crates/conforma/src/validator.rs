//! Validation driver
//!
//! Executes a compiled node against a data value: the resolved type union
//! first, then the bound keyword validators in encounter order. Validation
//! is fail-fast — the first keyword that reports a failure terminates the
//! node's check and its error becomes the node's error, so a failing run
//! produces one causal chain whose depth mirrors the nesting of failing
//! sub-schemas.

use crate::engine::FormatPredicate;
use crate::error::{ErrorFactory, ValidationError, ValidationErrorKind, ValidationResult};
use crate::keywords::Keyword;
use crate::schema::{CompileContext, SchemaNode};
use crate::types::type_name;
use serde_json::Value;

/// Result of one validation call.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Whether the data satisfied the schema
    pub valid: bool,
    /// The validated value, with any injected defaults applied
    pub data: Value,
    /// The failure chain, when `valid` is false
    pub error: Option<ValidationError>,
}

/// Per-call validation state threaded through keyword validators.
///
/// Holds the compile-time context snapshot and the current reference
/// depth; everything else lives on the nodes themselves.
pub struct Scope<'a> {
    pub(crate) context: &'a CompileContext,
    pub(crate) ref_depth: usize,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(context: &'a CompileContext) -> Self {
        Self {
            context,
            ref_depth: 0,
        }
    }

    /// Validate a value against a compiled child node. Custom keyword
    /// validators use this to recurse.
    pub fn validate_child(
        &self,
        node: &SchemaNode,
        data: &mut Value,
    ) -> ValidationResult<()> {
        node.validate_value(data, self)
    }

    /// Look up a format predicate captured at compile time.
    pub(crate) fn format(&self, name: &str) -> Option<&FormatPredicate> {
        self.context.formats.get(name)
    }
}

impl SchemaNode {
    /// Run this node's composed check: type union, then keywords in
    /// encounter order, fail-fast.
    pub(crate) fn validate_value(
        &self,
        data: &mut Value,
        scope: &Scope<'_>,
    ) -> ValidationResult<()> {
        if !self.types.is_empty() && !self.types.iter().any(|t| (t.check)(data)) {
            let expected = self
                .types
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ValidationError::new(
                ValidationErrorKind::TypeMismatch {
                    expected,
                    got: type_name(data).to_string(),
                },
                self.pointer.clone(),
            )
            .with_keyword("type")
            .with_schema(self.raw.get("type").cloned().unwrap_or(Value::Null))
            .with_data(data.clone()));
        }

        for bound in &self.keywords {
            if let Some(gate) = &bound.applicable {
                if !(gate)(data) {
                    continue;
                }
            }
            let keyword = Keyword {
                name: &bound.name,
                value: &bound.value,
                errors: ErrorFactory::new(&self.pointer),
            };
            (bound.validator)(self, &keyword, data, scope)?;
        }
        Ok(())
    }
}
