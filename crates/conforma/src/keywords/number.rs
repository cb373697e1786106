//! Numeric keyword validators
//!
//! Bounds support two equivalent exclusivity syntaxes: a boolean
//! `exclusiveMinimum`/`exclusiveMaximum` modifying the paired bound by a
//! small epsilon, or a standalone numeric form used directly as the bound.
//! When both could apply, the standalone numeric form wins and the boolean
//! modifier is ignored.

use crate::error::{ValidationErrorKind, ValidationResult};
use crate::keywords::Keyword;
use crate::schema::SchemaNode;
use crate::validator::Scope;
use serde_json::Value;

/// Margin applied to a bound to express strict inequality.
const EPSILON: f64 = 1e-15;

/// Relative tolerance when testing whether a quotient rounds to an integer.
const MULTIPLE_OF_TOLERANCE: f64 = 1e-9;

pub(crate) fn minimum(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Some(n) = data.as_f64() else {
        return Ok(());
    };
    let Some(min) = kw.value.as_f64() else {
        return Ok(());
    };
    let exclusive = matches!(node.constraint("exclusiveMinimum"), Some(Value::Bool(true)));
    let bound = if exclusive { min + EPSILON } else { min };
    if n < bound {
        return Err(kw
            .fail(ValidationErrorKind::NumberOutOfRange {
                value: n,
                minimum: (!exclusive).then_some(min),
                maximum: None,
                exclusive_minimum: exclusive.then_some(min),
                exclusive_maximum: None,
            })
            .with_schema(kw.value.clone())
            .with_data(data.clone()));
    }
    Ok(())
}

pub(crate) fn maximum(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Some(n) = data.as_f64() else {
        return Ok(());
    };
    let Some(max) = kw.value.as_f64() else {
        return Ok(());
    };
    let exclusive = matches!(node.constraint("exclusiveMaximum"), Some(Value::Bool(true)));
    let bound = if exclusive { max - EPSILON } else { max };
    if n > bound {
        return Err(kw
            .fail(ValidationErrorKind::NumberOutOfRange {
                value: n,
                minimum: None,
                maximum: (!exclusive).then_some(max),
                exclusive_minimum: None,
                exclusive_maximum: exclusive.then_some(max),
            })
            .with_schema(kw.value.clone())
            .with_data(data.clone()));
    }
    Ok(())
}

/// Standalone numeric form; the boolean modifier form is consumed by
/// `minimum` and is a no-op here.
pub(crate) fn exclusive_minimum(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Number(bound) = kw.value else {
        return Ok(());
    };
    let Some(n) = data.as_f64() else {
        return Ok(());
    };
    let Some(min) = bound.as_f64() else {
        return Ok(());
    };
    if n < min + EPSILON {
        return Err(kw
            .fail(ValidationErrorKind::NumberOutOfRange {
                value: n,
                minimum: None,
                maximum: None,
                exclusive_minimum: Some(min),
                exclusive_maximum: None,
            })
            .with_schema(kw.value.clone())
            .with_data(data.clone()));
    }
    Ok(())
}

/// Standalone numeric form; the boolean modifier form is consumed by
/// `maximum` and is a no-op here.
pub(crate) fn exclusive_maximum(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Number(bound) = kw.value else {
        return Ok(());
    };
    let Some(n) = data.as_f64() else {
        return Ok(());
    };
    let Some(max) = bound.as_f64() else {
        return Ok(());
    };
    if n > max - EPSILON {
        return Err(kw
            .fail(ValidationErrorKind::NumberOutOfRange {
                value: n,
                minimum: None,
                maximum: None,
                exclusive_minimum: None,
                exclusive_maximum: Some(max),
            })
            .with_schema(kw.value.clone())
            .with_data(data.clone()));
    }
    Ok(())
}

/// Valid when the quotient rounds to an integer within a relative
/// tolerance, which keeps decimal multiples like `0.01` usable despite
/// binary representation error. A non-finite quotient is vacuously valid.
pub(crate) fn multiple_of(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Some(n) = data.as_f64() else {
        return Ok(());
    };
    let Some(multiple) = kw.value.as_f64() else {
        return Ok(());
    };
    let quotient = n / multiple;
    if !quotient.is_finite() {
        return Ok(());
    }
    let nearest = quotient.round();
    if (quotient - nearest).abs() > MULTIPLE_OF_TOLERANCE * nearest.abs().max(1.0) {
        return Err(kw
            .fail(ValidationErrorKind::NumberNotMultipleOf {
                value: n,
                multiple_of: multiple,
            })
            .with_schema(kw.value.clone())
            .with_data(data.clone()));
    }
    Ok(())
}
