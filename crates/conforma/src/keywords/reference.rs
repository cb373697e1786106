//! Schema reference validator
//!
//! `$ref` resolves its reference string through the engine's resolver
//! collaborator and validates the data against the resolved schema. The
//! resolved target is memoized on the node after the first successful
//! resolution; a failed lookup is a validation failure, not a compile
//! error, and is never cached.
//!
//! Reference chains are bounded by a depth budget so a cyclic chain
//! surfaces as a structured failure instead of unbounded recursion.

use crate::error::{ValidationErrorKind, ValidationResult};
use crate::keywords::Keyword;
use crate::schema::SchemaNode;
use crate::validator::Scope;
use serde_json::Value;
use tracing::debug;

pub(crate) fn reference(
    node: &SchemaNode,
    kw: &Keyword<'_>,
    data: &mut Value,
    scope: &Scope<'_>,
) -> ValidationResult<()> {
    let Value::String(reference) = kw.value else {
        return Ok(());
    };

    if scope.ref_depth >= scope.context.ref_depth_limit {
        return Err(kw
            .fail(ValidationErrorKind::ReferenceDepthExceeded {
                reference: reference.clone(),
                limit: scope.context.ref_depth_limit,
            })
            .with_schema(kw.value.clone())
            .with_data(data.clone()));
    }

    let target = match node.caches.ref_target.get() {
        Some(target) => target,
        None => {
            let resolved = scope
                .context
                .resolver
                .as_ref()
                .and_then(|resolver| resolver.resolve(reference));
            match resolved {
                Some(found) => {
                    debug!(reference = %reference, "resolved schema reference");
                    node.caches.ref_target.get_or_init(|| found)
                }
                None => {
                    return Err(kw
                        .fail(ValidationErrorKind::UnresolvedReference {
                            reference: reference.clone(),
                        })
                        .with_schema(kw.value.clone())
                        .with_data(data.clone()));
                }
            }
        }
    };

    let inner = Scope {
        context: &target.context,
        ref_depth: scope.ref_depth + 1,
    };
    if let Err(cause) = target.root.validate_value(data, &inner) {
        return Err(kw
            .fail(ValidationErrorKind::ReferencedSchemaFailed {
                reference: reference.clone(),
            })
            .with_schema(kw.value.clone())
            .with_data(data.clone())
            .with_cause(cause));
    }
    Ok(())
}
