// Error types for schema compilation and validation

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors raised while compiling a raw schema document.
///
/// These are fatal: `compile` either returns a fully usable validator or
/// one of these, never a partially compiled schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The declared `type` union resolved to no known type
    #[error("declared type '{declared}' resolves to no known type (at {pointer})")]
    EmptyTypeUnion { pointer: String, declared: String },

    /// A `pattern` or `patternProperties` key is not a valid regular expression
    #[error("invalid pattern '{pattern}' (at {pointer}): {source}")]
    InvalidPattern {
        pointer: String,
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
}

/// Result type for schema compilation
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Structured validation failure kinds
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ValidationErrorKind {
    /// Data kind not in the schema's declared type union
    TypeMismatch { expected: String, got: String },

    /// Value not in the allowed enum candidates
    InvalidEnumValue { allowed: Vec<String> },

    /// Missing required property
    MissingRequiredProperty { property: String },

    /// A declared property failed its sub-schema
    PropertyInvalid { property: String },

    /// Property not declared and not allowed
    UnknownProperty { property: String },

    /// A property name failed the name schema
    PropertyNameInvalid { property: String },

    /// Object property count out of bounds
    ObjectPropertyCountInvalid {
        count: usize,
        min_properties: Option<usize>,
        max_properties: Option<usize>,
    },

    /// A dependency of a present property is missing
    MissingDependency { property: String, dependency: String },

    /// A dependency declaration rejected the object
    DependencyNotSatisfied { property: String },

    /// An array element failed its sub-schema
    ItemInvalid { index: usize },

    /// An array element is forbidden at its position
    ItemForbidden { index: usize },

    /// Array length out of bounds
    ArrayLengthInvalid {
        length: usize,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },

    /// Array elements not unique
    ArrayItemsNotUnique { index: usize },

    /// No array element matched the contains schema
    ContainsMismatch,

    /// Number out of range
    NumberOutOfRange {
        value: f64,
        minimum: Option<f64>,
        maximum: Option<f64>,
        exclusive_minimum: Option<f64>,
        exclusive_maximum: Option<f64>,
    },

    /// Number not a multiple of
    NumberNotMultipleOf { value: f64, multiple_of: f64 },

    /// String length out of bounds
    StringLengthInvalid {
        length: usize,
        min_length: Option<usize>,
        max_length: Option<usize>,
    },

    /// String does not match pattern
    StringPatternMismatch { pattern: String },

    /// No predicate registered under the requested format name
    UnknownFormat { format: String },

    /// String rejected by the named format predicate
    FormatMismatch { format: String },

    /// No alternative matched
    NoAlternativeMatched,

    /// A conjunction member failed
    SubschemaFailed { index: usize },

    /// Not exactly one alternative matched
    OneOfMismatch { matched: usize },

    /// The negated schema matched
    NotSchemaMatched,

    /// A conditional branch failed
    ConditionalBranchFailed { branch: String },

    /// Reference lookup returned nothing
    UnresolvedReference { reference: String },

    /// The referenced schema rejected the value
    ReferencedSchemaFailed { reference: String },

    /// Reference chain exceeded the depth budget
    ReferenceDepthExceeded { reference: String, limit: usize },
}

impl ValidationErrorKind {
    /// Format a human-readable message from this failure kind
    pub fn message(&self) -> String {
        match self {
            ValidationErrorKind::TypeMismatch { expected, got } => {
                format!("expected {}, got {}", expected, got)
            }
            ValidationErrorKind::InvalidEnumValue { allowed } => {
                format!("value must be one of: {}", allowed.join(", "))
            }
            ValidationErrorKind::MissingRequiredProperty { property } => {
                format!("missing required property '{}'", property)
            }
            ValidationErrorKind::PropertyInvalid { property } => {
                format!("property '{}' is invalid", property)
            }
            ValidationErrorKind::UnknownProperty { property } => {
                format!("property '{}' is not allowed", property)
            }
            ValidationErrorKind::PropertyNameInvalid { property } => {
                format!("property name '{}' is invalid", property)
            }
            ValidationErrorKind::ObjectPropertyCountInvalid {
                count,
                min_properties,
                max_properties,
            } => {
                if let Some(min) = min_properties {
                    format!("object has {} properties, less than minimum {}", count, min)
                } else if let Some(max) = max_properties {
                    format!(
                        "object has {} properties, greater than maximum {}",
                        count, max
                    )
                } else {
                    format!("object has {} properties (invalid)", count)
                }
            }
            ValidationErrorKind::MissingDependency {
                property,
                dependency,
            } => {
                format!(
                    "property '{}' requires property '{}'",
                    property, dependency
                )
            }
            ValidationErrorKind::DependencyNotSatisfied { property } => {
                format!("dependency of property '{}' is not satisfied", property)
            }
            ValidationErrorKind::ItemInvalid { index } => {
                format!("array item {} is invalid", index)
            }
            ValidationErrorKind::ItemForbidden { index } => {
                format!("array item {} is not allowed", index)
            }
            ValidationErrorKind::ArrayLengthInvalid {
                length,
                min_items,
                max_items,
            } => {
                if let Some(min) = min_items {
                    format!("array length {} is less than minimum {}", length, min)
                } else if let Some(max) = max_items {
                    format!("array length {} is greater than maximum {}", length, max)
                } else {
                    format!("array length {} is invalid", length)
                }
            }
            ValidationErrorKind::ArrayItemsNotUnique { index } => {
                format!("array items must be unique (duplicate at index {})", index)
            }
            ValidationErrorKind::ContainsMismatch => {
                "no array item matches the contains schema".to_string()
            }
            ValidationErrorKind::NumberOutOfRange {
                value,
                minimum,
                maximum,
                exclusive_minimum,
                exclusive_maximum,
            } => {
                if let Some(min) = minimum {
                    format!("number {} is less than minimum {}", value, min)
                } else if let Some(max) = maximum {
                    format!("number {} is greater than maximum {}", value, max)
                } else if let Some(min) = exclusive_minimum {
                    format!("number {} is not greater than {}", value, min)
                } else if let Some(max) = exclusive_maximum {
                    format!("number {} is not less than {}", value, max)
                } else {
                    format!("number {} is out of range", value)
                }
            }
            ValidationErrorKind::NumberNotMultipleOf { value, multiple_of } => {
                format!("number {} is not a multiple of {}", value, multiple_of)
            }
            ValidationErrorKind::StringLengthInvalid {
                length,
                min_length,
                max_length,
            } => {
                if let Some(min) = min_length {
                    format!("string length {} is less than minimum {}", length, min)
                } else if let Some(max) = max_length {
                    format!("string length {} is greater than maximum {}", length, max)
                } else {
                    format!("string length {} is invalid", length)
                }
            }
            ValidationErrorKind::StringPatternMismatch { pattern } => {
                format!("string does not match pattern '{}'", pattern)
            }
            ValidationErrorKind::UnknownFormat { format } => {
                format!("unknown format '{}'", format)
            }
            ValidationErrorKind::FormatMismatch { format } => {
                format!("string does not conform to format '{}'", format)
            }
            ValidationErrorKind::NoAlternativeMatched => {
                "no alternative matched".to_string()
            }
            ValidationErrorKind::SubschemaFailed { index } => {
                format!("schema {} of the conjunction failed", index)
            }
            ValidationErrorKind::OneOfMismatch { matched } => {
                format!("exactly one alternative must match, {} matched", matched)
            }
            ValidationErrorKind::NotSchemaMatched => {
                "value matches the negated schema".to_string()
            }
            ValidationErrorKind::ConditionalBranchFailed { branch } => {
                format!("conditional '{}' branch failed", branch)
            }
            ValidationErrorKind::UnresolvedReference { reference } => {
                format!("unresolved schema reference '{}'", reference)
            }
            ValidationErrorKind::ReferencedSchemaFailed { reference } => {
                format!("value does not conform to referenced schema '{}'", reference)
            }
            ValidationErrorKind::ReferenceDepthExceeded { reference, limit } => {
                format!(
                    "reference '{}' exceeded the resolution depth budget of {}",
                    reference, limit
                )
            }
        }
    }
}

/// A validation failure with its location and constraint context.
///
/// Failures chain: a composite keyword wraps the failure of the sub-schema
/// that rejected the value in `cause`, producing a single chain from the
/// top-level failure down to the leaf constraint. Exactly one chain is
/// produced per validation call, never a flat list of unrelated failures.
#[derive(Debug, Clone, Error, serde::Serialize)]
pub struct ValidationError {
    /// The structured failure kind
    pub kind: ValidationErrorKind,
    /// Schema pointer of the violated constraint (e.g. `#/properties/age/minimum`)
    pub pointer: String,
    /// The keyword that reported the failure
    pub keyword: String,
    /// The constraint value that was violated
    pub schema: Value,
    /// The offending data value
    pub data: Value,
    /// Nested failure from a recursive sub-validation, if any
    pub cause: Option<Box<ValidationError>>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed at {}: {}", self.pointer, self.message())
    }
}

impl ValidationError {
    /// Create a new validation error at a schema pointer
    pub fn new(kind: ValidationErrorKind, pointer: impl Into<String>) -> Self {
        Self {
            kind,
            pointer: pointer.into(),
            keyword: String::new(),
            schema: Value::Null,
            data: Value::Null,
            cause: None,
        }
    }

    /// Get the human-readable message for this error
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Set the reporting keyword
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Set the violated constraint value
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }

    /// Set the offending data value
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Attach the nested failure this error wraps
    pub fn with_cause(mut self, cause: ValidationError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Walk the cause chain to the deepest failing constraint
    pub fn leaf(&self) -> &ValidationError {
        let mut error = self;
        while let Some(cause) = &error.cause {
            error = cause;
        }
        error
    }
}

/// Builds errors located relative to one compiled node's pointer.
///
/// Keyword validators receive one of these instead of formatting pointers
/// by hand, so every failure is tagged consistently.
pub(crate) struct ErrorFactory<'a> {
    pointer: &'a str,
}

impl<'a> ErrorFactory<'a> {
    pub(crate) fn new(pointer: &'a str) -> Self {
        Self { pointer }
    }

    /// Error at the node itself (`{node}`)
    pub(crate) fn here(&self, kind: ValidationErrorKind) -> ValidationError {
        ValidationError::new(kind, self.pointer)
    }

    /// Error at the violated keyword (`{node}/{keyword}`)
    pub(crate) fn fail(&self, keyword: &str, kind: ValidationErrorKind) -> ValidationError {
        ValidationError::new(kind, crate::pointer::join(self.pointer, keyword))
            .with_keyword(keyword)
    }

    /// Error at an arbitrary segment below the node (`{node}/{segment}`),
    /// used for failures located by a data key or index
    pub(crate) fn fail_at(
        &self,
        segment: impl fmt::Display,
        keyword: &str,
        kind: ValidationErrorKind,
    ) -> ValidationError {
        ValidationError::new(kind, crate::pointer::join(self.pointer, segment))
            .with_keyword(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_error_creation() {
        let error = ValidationError::new(
            ValidationErrorKind::TypeMismatch {
                expected: "number".to_string(),
                got: "string".to_string(),
            },
            "#/properties/age",
        )
        .with_keyword("type")
        .with_data(json!("x"));

        assert_eq!(error.message(), "expected number, got string");
        assert_eq!(error.pointer, "#/properties/age");
        assert_eq!(error.keyword, "type");
    }

    #[test]
    fn test_cause_chain_leaf() {
        let leaf = ValidationError::new(
            ValidationErrorKind::NumberOutOfRange {
                value: 15.0,
                minimum: Some(18.0),
                maximum: None,
                exclusive_minimum: None,
                exclusive_maximum: None,
            },
            "#/properties/age/minimum",
        )
        .with_keyword("minimum");

        let top = ValidationError::new(
            ValidationErrorKind::PropertyInvalid {
                property: "age".to_string(),
            },
            "#/properties/age",
        )
        .with_keyword("properties")
        .with_cause(leaf);

        assert_eq!(top.leaf().pointer, "#/properties/age/minimum");
        assert_eq!(top.leaf().keyword, "minimum");
        assert!(top.message().contains("is invalid"));
    }

    #[test]
    fn test_error_factory_pointers() {
        let errors = ErrorFactory::new("#");
        let at_keyword = errors.fail(
            "required",
            ValidationErrorKind::MissingRequiredProperty {
                property: "id".to_string(),
            },
        );
        assert_eq!(at_keyword.pointer, "#/required");

        let at_key = errors.fail_at(
            "b",
            "additionalProperties",
            ValidationErrorKind::UnknownProperty {
                property: "b".to_string(),
            },
        );
        assert_eq!(at_key.pointer, "#/b");
        assert_eq!(at_key.keyword, "additionalProperties");
    }

    #[test]
    fn test_display_includes_pointer() {
        let error = ValidationError::new(ValidationErrorKind::NoAlternativeMatched, "#/anyOf");
        assert_eq!(
            error.to_string(),
            "validation failed at #/anyOf: no alternative matched"
        );
    }
}
