//! Array keyword validators
//!
//! `items` (tuple, uniform, and boolean forms), `additionalItems`, length
//! bounds, `uniqueItems`, and `contains`.

use crate::error::{ValidationErrorKind, ValidationResult};
use crate::keywords::Keyword;
use crate::schema::{ChildEntry, ChildSlot, SchemaNode};
use crate::validator::Scope;
use crate::value::{comparison_key, json_eq};
use serde_json::Value;
use std::collections::HashSet;

/// Tuple form validates position-by-position up to the shorter of schema
/// and data length; uniform form validates every element; boolean form
/// allows or forbids all elements.
pub(crate) fn items(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Array(arr) = data else {
        return Ok(());
    };
    match kw.value {
        Value::Bool(true) => Ok(()),
        Value::Bool(false) => {
            if arr.is_empty() {
                Ok(())
            } else {
                Err(kw
                    .fail_at(0, ValidationErrorKind::ItemForbidden { index: 0 })
                    .with_schema(Value::Bool(false))
                    .with_data(arr[0].clone()))
            }
        }
        Value::Array(_) => {
            let Some(ChildSlot::List(entries)) = node.child("items") else {
                return Ok(());
            };
            let count = entries.len().min(arr.len());
            for (index, entry) in entries.iter().take(count).enumerate() {
                match entry {
                    ChildEntry::Node(child) => {
                        if let Err(cause) = scope.validate_child(child, &mut arr[index]) {
                            return Err(kw
                                .fail_at(index, ValidationErrorKind::ItemInvalid { index })
                                .with_schema(Value::Object(child.raw().clone()))
                                .with_data(arr[index].clone())
                                .with_cause(cause));
                        }
                    }
                    ChildEntry::Literal(Value::Bool(true)) => {}
                    ChildEntry::Literal(Value::Bool(false)) => {
                        return Err(kw
                            .fail_at(index, ValidationErrorKind::ItemForbidden { index })
                            .with_schema(Value::Bool(false))
                            .with_data(arr[index].clone()));
                    }
                    ChildEntry::Literal(literal) => {
                        if !json_eq(&arr[index], literal) {
                            return Err(kw
                                .fail_at(index, ValidationErrorKind::ItemInvalid { index })
                                .with_schema(literal.clone())
                                .with_data(arr[index].clone()));
                        }
                    }
                }
            }
            Ok(())
        }
        Value::Object(_) => {
            let Some(ChildSlot::Node(child)) = node.child("items") else {
                return Ok(());
            };
            for (index, item) in arr.iter_mut().enumerate() {
                if let Err(cause) = scope.validate_child(child, item) {
                    return Err(kw
                        .fail_at(index, ValidationErrorKind::ItemInvalid { index })
                        .with_schema(Value::Object(child.raw().clone()))
                        .with_data(item.clone())
                        .with_cause(cause));
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Only applies when `items` is a tuple: `false` caps the data length at
/// the tuple length, a schema validates every element beyond it.
pub(crate) fn additional_items(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Some(Value::Array(tuple)) = node.constraint("items") else {
        return Ok(());
    };
    let tuple_len = tuple.len();
    let Value::Array(arr) = data else {
        return Ok(());
    };
    match kw.value {
        Value::Bool(false) => {
            if arr.len() > tuple_len {
                return Err(kw
                    .fail(ValidationErrorKind::ArrayLengthInvalid {
                        length: arr.len(),
                        min_items: None,
                        max_items: Some(tuple_len),
                    })
                    .with_schema(Value::Bool(false))
                    .with_data(Value::Array(arr.clone())));
            }
            Ok(())
        }
        Value::Object(_) => {
            let Some(ChildSlot::Node(child)) = node.child("additionalItems") else {
                return Ok(());
            };
            for index in tuple_len..arr.len() {
                if let Err(cause) = scope.validate_child(child, &mut arr[index]) {
                    return Err(kw
                        .fail_at(index, ValidationErrorKind::ItemInvalid { index })
                        .with_schema(Value::Object(child.raw().clone()))
                        .with_data(arr[index].clone())
                        .with_cause(cause));
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

pub(crate) fn min_items(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Array(arr) = data else {
        return Ok(());
    };
    let Some(min) = kw.value.as_u64() else {
        return Ok(());
    };
    if (arr.len() as u64) < min {
        return Err(kw
            .fail(ValidationErrorKind::ArrayLengthInvalid {
                length: arr.len(),
                min_items: Some(min as usize),
                max_items: None,
            })
            .with_schema(kw.value.clone())
            .with_data(Value::Array(arr.clone())));
    }
    Ok(())
}

pub(crate) fn max_items(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Array(arr) = data else {
        return Ok(());
    };
    let Some(max) = kw.value.as_u64() else {
        return Ok(());
    };
    if (arr.len() as u64) > max {
        return Err(kw
            .fail(ValidationErrorKind::ArrayLengthInvalid {
                length: arr.len(),
                min_items: None,
                max_items: Some(max as usize),
            })
            .with_schema(kw.value.clone())
            .with_data(Value::Array(arr.clone())));
    }
    Ok(())
}

/// Canonicalize each element to a comparison key and reject any repeat.
/// Structurally equal objects collide regardless of key order.
pub(crate) fn unique_items(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    if kw.value != &Value::Bool(true) {
        return Ok(());
    }
    let Value::Array(arr) = data else {
        return Ok(());
    };
    let mut seen = HashSet::new();
    for (index, item) in arr.iter().enumerate() {
        if !seen.insert(comparison_key(item)) {
            return Err(kw
                .fail(ValidationErrorKind::ArrayItemsNotUnique { index })
                .with_schema(Value::Bool(true))
                .with_data(item.clone()));
        }
    }
    Ok(())
}

/// At least one element must validate against the sub-schema. Boolean
/// `true` requires a non-empty array; `false` always fails.
pub(crate) fn contains(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Array(arr) = data else {
        return Ok(());
    };
    match kw.value {
        Value::Bool(true) => {
            if arr.is_empty() {
                return Err(kw
                    .fail(ValidationErrorKind::ContainsMismatch)
                    .with_schema(Value::Bool(true))
                    .with_data(Value::Array(arr.clone())));
            }
            Ok(())
        }
        Value::Bool(false) => Err(kw
            .fail(ValidationErrorKind::ContainsMismatch)
            .with_schema(Value::Bool(false))
            .with_data(Value::Array(arr.clone()))),
        Value::Object(_) => {
            let Some(ChildSlot::Node(child)) = node.child("contains") else {
                return Ok(());
            };
            for item in arr.iter() {
                let mut probe = item.clone();
                if scope.validate_child(child, &mut probe).is_ok() {
                    return Ok(());
                }
            }
            Err(kw
                .fail(ValidationErrorKind::ContainsMismatch)
                .with_schema(Value::Object(child.raw().clone()))
                .with_data(Value::Array(arr.clone())))
        }
        _ => Ok(()),
    }
}
