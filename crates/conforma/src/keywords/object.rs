//! Object keyword validators
//!
//! `required`, `properties` (with default injection), property count
//! bounds, `additionalProperties`, `patternProperties`, `propertyNames`,
//! and `dependencies`.

use crate::error::{ValidationError, ValidationErrorKind, ValidationResult};
use crate::keywords::Keyword;
use crate::pointer;
use crate::schema::{ChildSlot, SchemaNode};
use crate::validator::Scope;
use serde_json::Value;

/// Every listed key must exist on the object.
pub(crate) fn required(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Object(obj) = data else {
        return Ok(());
    };
    for key in node.required_keys() {
        if !obj.contains_key(key) {
            return Err(kw
                .fail(ValidationErrorKind::MissingRequiredProperty {
                    property: key.clone(),
                })
                .with_schema(kw.value.clone())
                .with_data(Value::Object(obj.clone())));
        }
    }
    Ok(())
}

/// Validate declared properties present in the data; inject a deep copy of
/// a declared `default` for properties that are required but absent.
/// Defaults are never injected for non-required absent properties.
pub(crate) fn properties(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Object(obj) = data else {
        return Ok(());
    };
    let children = match node.child("properties") {
        Some(ChildSlot::Map(map)) => Some(map),
        _ => None,
    };

    for name in node.property_keys() {
        if !obj.contains_key(name) {
            if node.required_keys().iter().any(|k| k == name) {
                let default = children
                    .and_then(|map| map.get(name))
                    .and_then(|child| child.constraint("default"));
                if let Some(default) = default {
                    obj.insert(name.clone(), default.clone());
                }
            }
            continue;
        }

        if let Some(child) = children.and_then(|map| map.get(name)) {
            let Some(value) = obj.get_mut(name) else {
                continue;
            };
            if let Err(cause) = scope.validate_child(child, value) {
                return Err(ValidationError::new(
                    ValidationErrorKind::PropertyInvalid {
                        property: name.clone(),
                    },
                    child.pointer().to_string(),
                )
                .with_keyword(kw.name)
                .with_schema(Value::Object(child.raw().clone()))
                .with_data(value.clone())
                .with_cause(cause));
            }
        } else if let Value::Object(declared) = kw.value {
            // boolean property schemas: `false` forbids the property
            if let Some(Value::Bool(false)) = declared.get(name) {
                return Err(kw
                    .fail_at(
                        name,
                        ValidationErrorKind::PropertyInvalid {
                            property: name.clone(),
                        },
                    )
                    .with_schema(Value::Bool(false))
                    .with_data(obj.get(name).cloned().unwrap_or(Value::Null)));
            }
        }
    }
    Ok(())
}

/// Lower bound on the enumerable key count.
pub(crate) fn min_properties(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Object(obj) = data else {
        return Ok(());
    };
    let Some(min) = kw.value.as_u64() else {
        return Ok(());
    };
    if (obj.len() as u64) < min {
        return Err(kw
            .fail(ValidationErrorKind::ObjectPropertyCountInvalid {
                count: obj.len(),
                min_properties: Some(min as usize),
                max_properties: None,
            })
            .with_schema(kw.value.clone())
            .with_data(Value::Object(obj.clone())));
    }
    Ok(())
}

/// Upper bound on the enumerable key count.
pub(crate) fn max_properties(
    _node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    _scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Object(obj) = data else {
        return Ok(());
    };
    let Some(max) = kw.value.as_u64() else {
        return Ok(());
    };
    if (obj.len() as u64) > max {
        return Err(kw
            .fail(ValidationErrorKind::ObjectPropertyCountInvalid {
                count: obj.len(),
                min_properties: None,
                max_properties: Some(max as usize),
            })
            .with_schema(kw.value.clone())
            .with_data(Value::Object(obj.clone())));
    }
    Ok(())
}

/// Handle data keys not declared in `properties` and not matched by any
/// `patternProperties` pattern: `false` forbids them, a schema validates
/// them, anything else allows them silently.
pub(crate) fn additional_properties(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Object(obj) = data else {
        return Ok(());
    };
    let extra: Vec<String> = obj
        .keys()
        .filter(|key| !node.property_keys().iter().any(|p| p == *key))
        .filter(|key| !node.pattern_regexes().iter().any(|(_, re)| re.is_match(key)))
        .cloned()
        .collect();
    if extra.is_empty() {
        return Ok(());
    }

    match kw.value {
        Value::Bool(false) => {
            let key = &extra[0];
            Err(kw
                .fail_at(
                    key,
                    ValidationErrorKind::UnknownProperty {
                        property: key.clone(),
                    },
                )
                .with_schema(Value::Bool(false))
                .with_data(obj.get(key).cloned().unwrap_or(Value::Null)))
        }
        Value::Object(_) => {
            let Some(ChildSlot::Node(child)) = node.child("additionalProperties") else {
                return Ok(());
            };
            for key in extra {
                let Some(value) = obj.get_mut(&key) else {
                    continue;
                };
                if let Err(cause) = scope.validate_child(child, value) {
                    return Err(ValidationError::new(
                        ValidationErrorKind::PropertyInvalid {
                            property: key.clone(),
                        },
                        pointer::join(node.pointer(), &key),
                    )
                    .with_keyword(kw.name)
                    .with_schema(Value::Object(child.raw().clone()))
                    .with_data(value.clone())
                    .with_cause(cause));
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// For every declared pattern, test each data key: `false` forbids any
/// match, a schema validates the matching values.
pub(crate) fn pattern_properties(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Object(obj) = data else {
        return Ok(());
    };
    let Value::Object(declared) = kw.value else {
        return Ok(());
    };
    let children = match node.child("patternProperties") {
        Some(ChildSlot::Map(map)) => Some(map),
        _ => None,
    };

    for (pattern, re) in node.pattern_regexes() {
        let matching: Vec<String> = obj
            .keys()
            .filter(|key| re.is_match(key))
            .cloned()
            .collect();
        for key in matching {
            match declared.get(pattern) {
                Some(Value::Bool(false)) => {
                    return Err(kw
                        .fail_at(
                            &key,
                            ValidationErrorKind::UnknownProperty {
                                property: key.clone(),
                            },
                        )
                        .with_schema(Value::String(pattern.clone()))
                        .with_data(obj.get(&key).cloned().unwrap_or(Value::Null)));
                }
                Some(Value::Object(_)) => {
                    let Some(child) = children.and_then(|map| map.get(pattern)) else {
                        continue;
                    };
                    let Some(value) = obj.get_mut(&key) else {
                        continue;
                    };
                    if let Err(cause) = scope.validate_child(child, value) {
                        return Err(ValidationError::new(
                            ValidationErrorKind::PropertyInvalid {
                                property: key.clone(),
                            },
                            pointer::join(node.pointer(), &key),
                        )
                        .with_keyword(kw.name)
                        .with_schema(Value::Object(child.raw().clone()))
                        .with_data(value.clone())
                        .with_cause(cause));
                    }
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Validate every key string against the name schema; boolean `false`
/// forbids all keys.
pub(crate) fn property_names(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Object(obj) = data else {
        return Ok(());
    };
    match kw.value {
        Value::Bool(false) => {
            if let Some(key) = obj.keys().next() {
                return Err(kw
                    .fail(ValidationErrorKind::PropertyNameInvalid {
                        property: key.clone(),
                    })
                    .with_schema(Value::Bool(false))
                    .with_data(Value::String(key.clone())));
            }
            Ok(())
        }
        Value::Object(_) => {
            let Some(ChildSlot::Node(child)) = node.child("propertyNames") else {
                return Ok(());
            };
            for key in obj.keys() {
                let mut name = Value::String(key.clone());
                if let Err(cause) = scope.validate_child(child, &mut name) {
                    return Err(kw
                        .fail(ValidationErrorKind::PropertyNameInvalid {
                            property: key.clone(),
                        })
                        .with_schema(Value::Object(child.raw().clone()))
                        .with_data(Value::String(key.clone()))
                        .with_cause(cause));
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// If a trigger key is present: require the listed sibling keys, require a
/// boolean flag to be true, require a single named sibling, or validate the
/// whole object against a dependent sub-schema.
pub(crate) fn dependencies(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::Object(deps) = kw.value else {
        return Ok(());
    };
    let children = match node.child("dependencies") {
        Some(ChildSlot::Map(map)) => Some(map),
        _ => None,
    };

    for (trigger, requirement) in deps {
        let present = data
            .as_object()
            .is_some_and(|obj| obj.contains_key(trigger));
        if !present {
            continue;
        }
        match requirement {
            Value::Array(list) => {
                for dep in list.iter().filter_map(Value::as_str) {
                    let has = data.as_object().is_some_and(|obj| obj.contains_key(dep));
                    if !has {
                        return Err(kw
                            .fail(ValidationErrorKind::MissingDependency {
                                property: trigger.clone(),
                                dependency: dep.to_string(),
                            })
                            .with_schema(requirement.clone())
                            .with_data(data.clone()));
                    }
                }
            }
            Value::String(dep) => {
                let has = data.as_object().is_some_and(|obj| obj.contains_key(dep));
                if !has {
                    return Err(kw
                        .fail(ValidationErrorKind::MissingDependency {
                            property: trigger.clone(),
                            dependency: dep.clone(),
                        })
                        .with_schema(requirement.clone())
                        .with_data(data.clone()));
                }
            }
            Value::Bool(true) => {}
            Value::Bool(false) => {
                return Err(kw
                    .fail(ValidationErrorKind::DependencyNotSatisfied {
                        property: trigger.clone(),
                    })
                    .with_schema(Value::Bool(false))
                    .with_data(data.clone()));
            }
            Value::Object(_) => {
                if let Some(child) = children.and_then(|map| map.get(trigger)) {
                    if let Err(cause) = scope.validate_child(child, data) {
                        return Err(kw
                            .fail(ValidationErrorKind::DependencyNotSatisfied {
                                property: trigger.clone(),
                            })
                            .with_schema(requirement.clone())
                            .with_data(data.clone())
                            .with_cause(cause));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}
