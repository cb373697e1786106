//! Reference resolution
//!
//! The `$ref` keyword resolves reference strings through a collaborator
//! installed on the engine. The engine never fetches documents or tracks
//! base URIs; it only calls [`ResolveRef::resolve`]. [`SchemaRegistry`] is
//! the in-memory implementation used by embedding code that compiles and
//! names its schemas up front.

use crate::schema::CompiledSchema;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lookup collaborator consulted by the `$ref` keyword.
pub trait ResolveRef: Send + Sync {
    /// Return the compiled schema registered under `reference`, if any.
    fn resolve(&self, reference: &str) -> Option<Arc<CompiledSchema>>;
}

/// An in-memory, shareable store of named compiled schemas.
///
/// Registration must happen before the schemas that reference an entry are
/// validated; interleaving registration with validation is not supported.
#[derive(Clone, Default)]
pub struct SchemaRegistry {
    schemas: Arc<RwLock<HashMap<String, Arc<CompiledSchema>>>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compiled schema under a reference id, returning the
    /// shared handle.
    pub fn register(
        &self,
        id: impl Into<String>,
        schema: CompiledSchema,
    ) -> Arc<CompiledSchema> {
        let schema = Arc::new(schema);
        self.write().insert(id.into(), schema.clone());
        schema
    }

    /// Whether a schema is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<CompiledSchema>>> {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<CompiledSchema>>> {
        self.schemas.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResolveRef for SchemaRegistry {
    fn resolve(&self, reference: &str) -> Option<Arc<CompiledSchema>> {
        self.read().get(reference).cloned()
    }
}
