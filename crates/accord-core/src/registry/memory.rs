//! In-memory registry backed by a `BTreeMap`.

use std::collections::BTreeMap;

use super::{Entity, Registry, RegistryError};

/// BTreeMap-backed registry for tests and store-less embedders.
///
/// Provides the full [`Registry`] contract, including the duplicate-id
/// conflict on `add`. Iteration order (and therefore debug output) is stable
/// by id.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry<T> {
    entries: BTreeMap<String, T>,
}

impl<T> MemoryRegistry<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Entity + Clone> Registry<T> for MemoryRegistry<T> {
    fn exists(&self, id: &str) -> Result<bool, RegistryError> {
        Ok(self.entries.contains_key(id))
    }

    fn get(&self, id: &str) -> Result<T, RegistryError> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
    }

    fn add(&mut self, entity: T) -> Result<(), RegistryError> {
        let id = entity.id().to_string();
        if self.entries.contains_key(&id) {
            return Err(RegistryError::Conflict { id });
        }
        self.entries.insert(id, entity);
        Ok(())
    }

    fn update(&mut self, entity: T) -> Result<(), RegistryError> {
        let id = entity.id().to_string();
        if !self.entries.contains_key(&id) {
            return Err(RegistryError::NotFound { id });
        }
        self.entries.insert(id, entity);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<(), RegistryError> {
        self.entries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
    }
}
