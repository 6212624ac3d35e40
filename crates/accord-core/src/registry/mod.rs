//! Registry bridge: the keyed external store boundary for entities.
//!
//! Durable storage lives outside this crate. The engine only needs the small
//! collaborator surface below — existence check, point lookup, insert,
//! replace, remove — and a typed error vocabulary it can map onto the
//! lifecycle policies (missing targets are no-ops, duplicate creates are
//! conflicts, transient store failures degrade per operation).
//!
//! [`memory::MemoryRegistry`] is the in-process reference implementation used
//! by tests and by embedders that bring no external store.

pub mod memory;

pub use memory::MemoryRegistry;

use crate::model::{Association, Item};

/// Anything storable under an opaque unique string id.
pub trait Entity {
    /// The entity's registry key.
    fn id(&self) -> &str;
}

impl Entity for Association {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Item {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Errors surfaced at the registry boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No entity stored under the given id.
    #[error("no entity stored under id '{id}'")]
    NotFound {
        /// The missing id.
        id: String,
    },

    /// An entity already exists under the given id.
    #[error("an entity already exists under id '{id}'")]
    Conflict {
        /// The colliding id.
        id: String,
    },

    /// The backing store is transiently unreachable or failing.
    #[error("registry unavailable: {reason}")]
    Unavailable {
        /// Human-readable cause from the backing store.
        reason: String,
    },
}

/// Keyed store for one entity type.
///
/// Implementations provide at-most-one-writer-at-a-time semantics per id;
/// the engine performs no locking of its own and treats a lost race the same
/// as a missing entity.
pub trait Registry<T: Entity> {
    /// Whether an entity is stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unavailable`] if the store cannot be reached.
    fn exists(&self, id: &str) -> Result<bool, RegistryError>;

    /// Fetch the entity stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when absent, or
    /// [`RegistryError::Unavailable`] on store failure.
    fn get(&self, id: &str) -> Result<T, RegistryError>;

    /// Insert a new entity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Conflict`] when the id is already taken —
    /// this is the create-time duplicate check the engine relies on — or
    /// [`RegistryError::Unavailable`] on store failure.
    fn add(&mut self, entity: T) -> Result<(), RegistryError>;

    /// Replace the entity stored under the entity's id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when absent, or
    /// [`RegistryError::Unavailable`] on store failure.
    fn update(&mut self, entity: T) -> Result<(), RegistryError>;

    /// Remove the entity stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when absent, or
    /// [`RegistryError::Unavailable`] on store failure.
    fn remove(&mut self, id: &str) -> Result<(), RegistryError>;
}
