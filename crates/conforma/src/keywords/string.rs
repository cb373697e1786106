//! String keyword validators

use crate::error::{ValidationErrorKind, ValidationResult};
use crate::keywords::Keyword;
use crate::schema::SchemaNode;
use crate::validator::Scope;
use serde_json::Value;

pub(crate) fn min_length(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::String(s) = data else {
        return Ok(());
    };
    let Some(min) = kw.value.as_u64() else {
        return Ok(());
    };
    let length = s.chars().count();
    if (length as u64) < min {
        return Err(kw
            .fail(ValidationErrorKind::StringLengthInvalid {
                length,
                min_length: Some(min as usize),
                max_length: None,
            })
            .with_schema(kw.value.clone())
            .with_data(data.clone()));
    }
    Ok(())
}

pub(crate) fn max_length(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::String(s) = data else {
        return Ok(());
    };
    let Some(max) = kw.value.as_u64() else {
        return Ok(());
    };
    let length = s.chars().count();
    if (length as u64) > max {
        return Err(kw
            .fail(ValidationErrorKind::StringLengthInvalid {
                length,
                min_length: None,
                max_length: Some(max as usize),
            })
            .with_schema(kw.value.clone())
            .with_data(data.clone()));
    }
    Ok(())
}

/// Unanchored, unicode-aware regex test. Pattern syntax was verified at
/// compile time; the compiled regex is cached on the node.
pub(crate) fn pattern(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::String(s) = data else {
        return Ok(());
    };
    let Some(re) = node.pattern_regex() else {
        return Ok(());
    };
    if !re.is_match(s) {
        return Err(kw
            .fail(ValidationErrorKind::StringPatternMismatch {
                pattern: re.as_str().to_string(),
            })
            .with_schema(kw.value.clone())
            .with_data(data.clone()));
    }
    Ok(())
}

/// Look up the named predicate in the format registry and test the string.
/// A name with no registered predicate is an "unknown format" failure.
pub(crate) fn format(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::String(s) = data else {
        return Ok(());
    };
    let Some(name) = kw.value.as_str() else {
        return Ok(());
    };
    match scope.format(name) {
        None => Err(kw
            .fail(ValidationErrorKind::UnknownFormat {
                format: name.to_string(),
            })
            .with_schema(kw.value.clone())
            .with_data(data.clone())),
        Some(predicate) => {
            if predicate(s) {
                Ok(())
            } else {
                Err(kw
                    .fail(ValidationErrorKind::FormatMismatch {
                        format: name.to_string(),
                    })
                    .with_schema(kw.value.clone())
                    .with_data(data.clone()))
            }
        }
    }
}
