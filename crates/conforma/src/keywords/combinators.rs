//! Composite keyword validators
//!
//! Boolean logic over sub-schemas: `enum`/`const` equality, `allOf`,
//! `anyOf`, `oneOf`, `not`, and `if`/`then`/`else`. Alternatives are tried
//! by exhaustive iteration; a rejected branch never leaves partial default
//! injection behind because branches run against a probe clone that is only
//! committed on success.

use crate::error::{ValidationErrorKind, ValidationResult};
use crate::keywords::Keyword;
use crate::schema::{ChildEntry, ChildSlot, SchemaNode};
use crate::validator::Scope;
use crate::value::json_eq;
use serde_json::Value;

/// Pass if the data deep-structurally equals any listed candidate.
pub(crate) fn enum_values(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Array(candidates) = kw.value else {
        return Ok(());
    };
    if candidates.iter().any(|candidate| json_eq(data, candidate)) {
        return Ok(());
    }
    Err(kw
        .fail(ValidationErrorKind::InvalidEnumValue {
            allowed: candidates.iter().map(Value::to_string).collect(),
        })
        .with_schema(kw.value.clone())
        .with_data(data.clone()))
}

/// Single-candidate `enum`.
pub(crate) fn const_value(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    if json_eq(data, kw.value) {
        return Ok(());
    }
    Err(kw
        .fail(ValidationErrorKind::InvalidEnumValue {
            allowed: vec![kw.value.to_string()],
        })
        .with_schema(kw.value.clone())
        .with_data(data.clone()))
}

/// Every member must pass; the first failure wins.
pub(crate) fn all_of(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Some(ChildSlot::List(entries)) = node.child("allOf") else {
        return Ok(());
    };
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            ChildEntry::Node(child) => {
                if let Err(cause) = scope.validate_child(child, data) {
                    return Err(kw
                        .fail(ValidationErrorKind::SubschemaFailed { index })
                        .with_schema(Value::Object(child.raw().clone()))
                        .with_data(data.clone())
                        .with_cause(cause));
                }
            }
            ChildEntry::Literal(Value::Bool(true)) => {}
            ChildEntry::Literal(Value::Bool(false)) => {
                return Err(kw
                    .fail(ValidationErrorKind::SubschemaFailed { index })
                    .with_schema(Value::Bool(false))
                    .with_data(data.clone()));
            }
            ChildEntry::Literal(literal) => {
                if !json_eq(data, literal) {
                    return Err(kw
                        .fail(ValidationErrorKind::SubschemaFailed { index })
                        .with_schema(literal.clone())
                        .with_data(data.clone()));
                }
            }
        }
    }
    Ok(())
}

/// First member that passes short-circuits success; literal members are
/// compared by equality. Exhausting the list fails.
pub(crate) fn any_of(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Some(ChildSlot::List(entries)) = node.child("anyOf") else {
        return Ok(());
    };
    for entry in entries {
        match entry {
            ChildEntry::Node(child) => {
                let mut probe = data.clone();
                if scope.validate_child(child, &mut probe).is_ok() {
                    // keep defaults injected by the matching alternative
                    *data = probe;
                    return Ok(());
                }
            }
            ChildEntry::Literal(literal) => {
                if json_eq(data, literal) {
                    return Ok(());
                }
            }
        }
    }
    Err(kw
        .fail(ValidationErrorKind::NoAlternativeMatched)
        .with_schema(kw.value.clone())
        .with_data(data.clone()))
}

/// Exactly one member may pass; a second passing member fails immediately.
pub(crate) fn one_of(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Some(ChildSlot::List(entries)) = node.child("oneOf") else {
        return Ok(());
    };
    let mut matched = 0usize;
    let mut winner: Option<Value> = None;
    for entry in entries {
        let hit = match entry {
            ChildEntry::Node(child) => {
                let mut probe = data.clone();
                scope
                    .validate_child(child, &mut probe)
                    .is_ok()
                    .then_some(probe)
            }
            ChildEntry::Literal(literal) => json_eq(data, literal).then(|| data.clone()),
        };
        if let Some(result) = hit {
            matched += 1;
            if matched > 1 {
                return Err(kw
                    .fail(ValidationErrorKind::OneOfMismatch { matched })
                    .with_schema(kw.value.clone())
                    .with_data(data.clone()));
            }
            winner = Some(result);
        }
    }
    match winner {
        Some(result) => {
            *data = result;
            Ok(())
        }
        None => Err(kw
            .fail(ValidationErrorKind::OneOfMismatch { matched: 0 })
            .with_schema(kw.value.clone())
            .with_data(data.clone())),
    }
}

/// Success iff the inner schema fails. Boolean `true` is the
/// accept-anything schema, so `not: true` always fails.
pub(crate) fn not_schema(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let inner_matches = match (kw.value, node.child("not")) {
        (Value::Object(_), Some(ChildSlot::Node(child))) => {
            let mut probe = data.clone();
            scope.validate_child(child, &mut probe).is_ok()
        }
        (Value::Bool(allow), _) => *allow,
        (literal, _) => json_eq(data, literal),
    };
    if inner_matches {
        return Err(kw
            .fail(ValidationErrorKind::NotSchemaMatched)
            .with_schema(kw.value.clone())
            .with_data(data.clone()));
    }
    Ok(())
}

/// Apply `if`; on success apply `then` if present, on failure apply `else`
/// if present. A boolean `if` selects the branch unconditionally.
pub(crate) fn if_then_else(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let satisfied = match (kw.value, node.child("if")) {
        (Value::Bool(choice), _) => *choice,
        (Value::Object(_), Some(ChildSlot::Node(child))) => {
            let mut probe = data.clone();
            scope.validate_child(child, &mut probe).is_ok()
        }
        (literal, _) => json_eq(data, literal),
    };
    let branch = if satisfied { "then" } else { "else" };
    match node.constraint(branch) {
        None | Some(Value::Bool(true)) => Ok(()),
        Some(Value::Bool(false)) => Err(kw
            .errors
            .fail(
                branch,
                ValidationErrorKind::ConditionalBranchFailed {
                    branch: branch.to_string(),
                },
            )
            .with_schema(Value::Bool(false))
            .with_data(data.clone())),
        Some(Value::Object(_)) => {
            let Some(ChildSlot::Node(child)) = node.child(branch) else {
                return Ok(());
            };
            if let Err(cause) = scope.validate_child(child, data) {
                return Err(kw
                    .errors
                    .fail(
                        branch,
                        ValidationErrorKind::ConditionalBranchFailed {
                            branch: branch.to_string(),
                        },
                    )
                    .with_schema(Value::Object(child.raw().clone()))
                    .with_data(data.clone())
                    .with_cause(cause));
            }
            Ok(())
        }
        Some(_) => Ok(()),
    }
}
