//! Compiled schema validation for structured data
//!
//! A schema document compiles once into a reusable validator; the validator
//! reports whether a data value satisfies the schema and, on failure, a
//! structured diagnostic chain locating the violation.
//!
//! ```
//! use serde_json::json;
//!
//! let engine = conforma::Engine::new();
//! let schema = engine
//!     .compile(&json!({
//!         "type": "object",
//!         "properties": { "age": { "type": "number", "minimum": 18 } }
//!     }))
//!     .expect("valid schema");
//!
//! let outcome = schema.validate(&json!({ "name": "John Doe", "age": 15 }));
//! assert!(!outcome.valid);
//! let error = outcome.error.expect("failure chain");
//! assert_eq!(error.leaf().pointer, "#/properties/age/minimum");
//! ```
//!
//! Compilation is fail-fast and fatal on structural defects; validation
//! never panics and returns at most one causal error chain per call. See
//! [`Engine`] for the registration surface (custom types, formats, and
//! keywords) and [`SchemaRegistry`] for `$ref` resolution.

mod engine;
mod error;
mod keywords;
pub mod pointer;
mod registry;
mod schema;
mod types;
mod validator;
mod value;

pub use engine::{Engine, FormatPredicate};
pub use error::{
    SchemaError, SchemaResult, ValidationError, ValidationErrorKind, ValidationResult,
};
pub use keywords::Keyword;
pub use registry::{ResolveRef, SchemaRegistry};
pub use schema::{ChildEntry, ChildSlot, CompiledSchema, SchemaNode};
pub use types::{type_name, TypePredicate};
pub use validator::{Outcome, Scope};

use serde_json::Value;

/// Compile a schema with a default-configured [`Engine`].
pub fn compile(schema: &Value) -> SchemaResult<CompiledSchema> {
    Engine::new().compile(schema)
}
