//! Keyword validator dispatch
//!
//! One validation routine per constraint keyword. The engine's keyword
//! registry maps keyword names to these routines; the compiler captures the
//! routine (and its data-kind gate) into each node that declares the
//! keyword, so no registry lookup happens during validation.
//!
//! Contract: a validator returns `Ok(())` (pass) or exactly one error
//! locating the failure at the current node, optionally wrapping a nested
//! cause from a recursive sub-validation. Validators are invoked only when
//! their key is present and, for type-scoped keywords, only when the data's
//! kind matches.

pub(crate) mod array;
pub(crate) mod combinators;
pub(crate) mod number;
pub(crate) mod object;
pub(crate) mod reference;
pub(crate) mod string;

use crate::error::{ErrorFactory, ValidationError, ValidationErrorKind, ValidationResult};
use crate::schema::SchemaNode;
use crate::validator::Scope;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A keyword occurrence handed to its validator: the keyword name, the raw
/// constraint value, and an error factory bound to the node's pointer.
pub struct Keyword<'a> {
    pub name: &'a str,
    pub value: &'a Value,
    pub(crate) errors: ErrorFactory<'a>,
}

impl Keyword<'_> {
    /// Error at the violated keyword (`{node}/{keyword}`)
    pub fn fail(&self, kind: ValidationErrorKind) -> ValidationError {
        self.errors.fail(self.name, kind)
    }

    /// Error at a data key or index below the node (`{node}/{segment}`)
    pub fn fail_at(
        &self,
        segment: impl fmt::Display,
        kind: ValidationErrorKind,
    ) -> ValidationError {
        self.errors.fail_at(segment, self.name, kind)
    }
}

/// The validator signature shared by built-in and registered keywords.
pub type KeywordFn = Arc<
    dyn Fn(&SchemaNode, &Keyword<'_>, &mut Value, &Scope<'_>) -> ValidationResult<()>
        + Send
        + Sync,
>;

/// A registry entry: the validator plus its declared data-kind gate
/// (`None` means the keyword applies to any kind).
#[derive(Clone)]
pub(crate) struct KeywordSpec {
    pub(crate) validator: KeywordFn,
    pub(crate) applicable: Option<String>,
}

fn spec(
    validator: fn(&SchemaNode, &Keyword<'_>, &mut Value, &Scope<'_>) -> ValidationResult<()>,
    applicable: Option<&str>,
) -> KeywordSpec {
    KeywordSpec {
        validator: Arc::new(validator),
        applicable: applicable.map(str::to_string),
    }
}

/// The built-in keyword table registered on every new engine.
pub(crate) fn built_in() -> HashMap<String, KeywordSpec> {
    let mut table = HashMap::new();

    // object family
    table.insert("required".to_string(), spec(object::required, Some("object")));
    table.insert(
        "properties".to_string(),
        spec(object::properties, Some("object")),
    );
    table.insert(
        "minProperties".to_string(),
        spec(object::min_properties, Some("object")),
    );
    table.insert(
        "maxProperties".to_string(),
        spec(object::max_properties, Some("object")),
    );
    table.insert(
        "additionalProperties".to_string(),
        spec(object::additional_properties, Some("object")),
    );
    table.insert(
        "patternProperties".to_string(),
        spec(object::pattern_properties, Some("object")),
    );
    table.insert(
        "propertyNames".to_string(),
        spec(object::property_names, Some("object")),
    );
    table.insert(
        "dependencies".to_string(),
        spec(object::dependencies, Some("object")),
    );

    // array family
    table.insert("items".to_string(), spec(array::items, Some("array")));
    table.insert(
        "additionalItems".to_string(),
        spec(array::additional_items, Some("array")),
    );
    table.insert("minItems".to_string(), spec(array::min_items, Some("array")));
    table.insert("maxItems".to_string(), spec(array::max_items, Some("array")));
    table.insert(
        "uniqueItems".to_string(),
        spec(array::unique_items, Some("array")),
    );
    table.insert("contains".to_string(), spec(array::contains, Some("array")));

    // numeric family
    table.insert("minimum".to_string(), spec(number::minimum, Some("number")));
    table.insert("maximum".to_string(), spec(number::maximum, Some("number")));
    table.insert(
        "exclusiveMinimum".to_string(),
        spec(number::exclusive_minimum, Some("number")),
    );
    table.insert(
        "exclusiveMaximum".to_string(),
        spec(number::exclusive_maximum, Some("number")),
    );
    table.insert(
        "multipleOf".to_string(),
        spec(number::multiple_of, Some("number")),
    );

    // string family
    table.insert(
        "minLength".to_string(),
        spec(string::min_length, Some("string")),
    );
    table.insert(
        "maxLength".to_string(),
        spec(string::max_length, Some("string")),
    );
    table.insert("pattern".to_string(), spec(string::pattern, Some("string")));
    table.insert("format".to_string(), spec(string::format, Some("string")));

    // composite family
    table.insert("enum".to_string(), spec(combinators::enum_values, None));
    table.insert("const".to_string(), spec(combinators::const_value, None));
    table.insert("allOf".to_string(), spec(combinators::all_of, None));
    table.insert("anyOf".to_string(), spec(combinators::any_of, None));
    table.insert("oneOf".to_string(), spec(combinators::one_of, None));
    table.insert("not".to_string(), spec(combinators::not_schema, None));
    table.insert("if".to_string(), spec(combinators::if_then_else, None));
    table.insert("$ref".to_string(), spec(reference::reference, None));

    table
}
