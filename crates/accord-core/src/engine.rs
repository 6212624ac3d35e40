//! Operation handlers: the five association transitions and the three item
//! operations, orchestrated against the registry bridge.
//!
//! Each handler is one logical transaction: resolve the target, validate
//! existence, mutate in memory, persist, emit exactly one outcome event.
//! Nothing is partially applied — if a precondition fails there is no
//! mutation, no persist call, and (per operation) possibly no event.
//!
//! Expected conditions never escape a handler as errors:
//!
//! - update/grant/revoke against a missing target return
//!   [`Outcome::Skipped`] with no event;
//! - delete is idempotent and always completes loudly, carrying no id on a
//!   miss — including when the existence check itself fails (fail-open);
//! - an entity that vanishes between fetch and commit is a lost race and is
//!   treated like a miss, not an engine bug.
//!
//! Duplicate-id creates and registry outages outside the fail-open paths do
//! surface, as [`EngineError`].

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::event::{EventEnvelope, EventKind, EventSink, TracingSink};
use crate::model::{Association, Item, Message};
use crate::registry::{Entity, MemoryRegistry, Registry, RegistryError};
use crate::request::{
    CreateAssociation, CreateItem, DeleteAssociation, DeleteItem, GrantAssociation, Request,
    RevokeAssociation, UpdateAssociation, UpdateItem,
};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What a handler did, from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation was persisted and its event emitted.
    Applied {
        /// Id of the affected entity.
        id: String,
    },
    /// The target was absent; nothing was persisted and no event emitted.
    Skipped,
    /// A delete completed. `id` is present only when an entity was removed.
    Deleted {
        /// Id of the removed entity, absent on a miss.
        id: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The lifecycle engine: configuration, registry handles, event sink and
/// clock, all fixed at construction.
pub struct Engine {
    config: EngineConfig,
    associations: Box<dyn Registry<Association>>,
    items: Box<dyn Registry<Item>>,
    sink: Box<dyn EventSink>,
    clock: Box<dyn Clock>,
}

impl Engine {
    /// Wire an engine from its collaborators.
    #[must_use]
    pub fn new(
        config: EngineConfig,
        associations: Box<dyn Registry<Association>>,
        items: Box<dyn Registry<Item>>,
        sink: Box<dyn EventSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            config,
            associations,
            items,
            sink,
            clock,
        }
    }

    /// Engine over in-memory registries, the tracing sink, and the system
    /// clock. Suitable for embedders that bring no external store.
    #[must_use]
    pub fn in_memory(config: EngineConfig) -> Self {
        Self::new(
            config,
            Box::new(MemoryRegistry::new()),
            Box::new(MemoryRegistry::new()),
            Box::new(TracingSink),
            Box::new(SystemClock),
        )
    }

    /// The configuration the engine was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read access to the association registry.
    #[must_use]
    pub fn associations(&self) -> &dyn Registry<Association> {
        self.associations.as_ref()
    }

    /// Read access to the item registry.
    #[must_use]
    pub fn items(&self) -> &dyn Registry<Item> {
        self.items.as_ref()
    }

    /// Route a request to its handler. Exhaustive over the operation set.
    ///
    /// # Errors
    ///
    /// Propagates the target handler's [`EngineError`].
    pub fn dispatch(&mut self, request: Request) -> Result<Outcome, EngineError> {
        match request {
            Request::CreateAssociation(req) => self.create_association(req),
            Request::UpdateAssociation(req) => self.update_association(req),
            Request::GrantAssociation(req) => self.grant_association(req),
            Request::RevokeAssociation(req) => self.revoke_association(req),
            Request::DeleteAssociation(req) => self.delete_association(&req),
            Request::CreateItem(req) => self.create_item(req),
            Request::UpdateItem(req) => self.update_item(req),
            Request::DeleteItem(req) => self.delete_item(&req),
        }
    }

    // -----------------------------------------------------------------------
    // Association handlers
    // -----------------------------------------------------------------------

    /// Create a pending association with a single seed message.
    ///
    /// # Errors
    ///
    /// [`EngineError::Conflict`] when the id is already taken;
    /// [`EngineError::Registry`] on store failure.
    pub fn create_association(
        &mut self,
        req: CreateAssociation,
    ) -> Result<Outcome, EngineError> {
        let now = self.clock.now_ms();
        let mut association =
            Association::new(req.association_id, req.from.clone(), req.to, req.item);
        association.append_message(Message::new(Some(req.from), req.message, now));

        let id = association.id.clone();
        match self.associations.add(association) {
            Ok(()) => {}
            Err(RegistryError::Conflict { id }) => {
                tracing::warn!(association_id = %id, "create against existing id");
                return Err(EngineError::Conflict { id });
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(association_id = %id, "association created");
        self.emit(EventKind::AssociationCreated, Some(id.clone()));
        Ok(Outcome::Applied { id })
    }

    /// Update fields and/or prepend a thread entry. Approval is untouched.
    ///
    /// Missing target: silent no-op (no mutation, no event).
    ///
    /// # Errors
    ///
    /// [`EngineError::Registry`] on store failure.
    pub fn update_association(
        &mut self,
        req: UpdateAssociation,
    ) -> Result<Outcome, EngineError> {
        let Some(mut association) = fetch(self.associations.as_ref(), &req.association_id)?
        else {
            tracing::debug!(association_id = %req.association_id, "update target absent; skipping");
            return Ok(Outcome::Skipped);
        };

        if let Some(message) = req.message {
            let now = self.clock.now_ms();
            association.prepend_message(Message::new(Some(req.from), message, now));
        }
        association.apply_update(req.item, req.link);

        if !commit(self.associations.as_mut(), association)? {
            return Ok(Outcome::Skipped);
        }

        tracing::info!(association_id = %req.association_id, "association updated");
        self.emit(EventKind::AssociationUpdated, Some(req.association_id.clone()));
        Ok(Outcome::Applied {
            id: req.association_id,
        })
    }

    /// Approve the association: set the link, optionally replace the item,
    /// prepend the grantor's message.
    ///
    /// Missing target: silent no-op.
    ///
    /// # Errors
    ///
    /// [`EngineError::Registry`] on store failure.
    pub fn grant_association(
        &mut self,
        req: GrantAssociation,
    ) -> Result<Outcome, EngineError> {
        let Some(mut association) = fetch(self.associations.as_ref(), &req.association_id)?
        else {
            tracing::debug!(association_id = %req.association_id, "grant target absent; skipping");
            return Ok(Outcome::Skipped);
        };

        association.grant(req.link, req.item);
        if let Some(message) = req.message {
            let now = self.clock.now_ms();
            association.prepend_message(Message::new(req.from, message, now));
        }

        if !commit(self.associations.as_mut(), association)? {
            return Ok(Outcome::Skipped);
        }

        tracing::info!(association_id = %req.association_id, "association granted");
        self.emit(EventKind::AssociationGranted, Some(req.association_id.clone()));
        Ok(Outcome::Applied {
            id: req.association_id,
        })
    }

    /// Withdraw approval: clear the link, clear the item reference unless the
    /// request carried one, append the message.
    ///
    /// Missing target: silent no-op.
    ///
    /// # Errors
    ///
    /// [`EngineError::Registry`] on store failure.
    pub fn revoke_association(
        &mut self,
        req: RevokeAssociation,
    ) -> Result<Outcome, EngineError> {
        let Some(mut association) = fetch(self.associations.as_ref(), &req.association_id)?
        else {
            tracing::debug!(association_id = %req.association_id, "revoke target absent; skipping");
            return Ok(Outcome::Skipped);
        };

        association.revoke(req.item.is_some());
        if let Some(message) = req.message {
            let now = self.clock.now_ms();
            // Revoke keeps the historical back-of-thread position.
            association.append_message(Message::new(req.from, message, now));
        }

        if !commit(self.associations.as_mut(), association)? {
            return Ok(Outcome::Skipped);
        }

        tracing::info!(association_id = %req.association_id, "association revoked");
        self.emit(EventKind::AssociationRevoked, Some(req.association_id.clone()));
        Ok(Outcome::Applied {
            id: req.association_id,
        })
    }

    /// Remove an association. Idempotent and loud: a miss (including an
    /// unavailable existence check, fail-open) still emits a deleted event
    /// with no id. Items the association referenced are untouched.
    ///
    /// # Errors
    ///
    /// [`EngineError::Registry`] if the removal itself fails.
    pub fn delete_association(
        &mut self,
        req: &DeleteAssociation,
    ) -> Result<Outcome, EngineError> {
        let removed = delete(self.associations.as_mut(), &req.association_id)?;
        let id = removed.then(|| req.association_id.clone());

        tracing::info!(
            association_id = %req.association_id,
            removed,
            "association delete completed"
        );
        self.emit(EventKind::AssociationDeleted, id.clone());
        Ok(Outcome::Deleted { id })
    }

    // -----------------------------------------------------------------------
    // Item handlers
    // -----------------------------------------------------------------------

    /// Create an item.
    ///
    /// # Errors
    ///
    /// [`EngineError::Conflict`] when the id is already taken;
    /// [`EngineError::Registry`] on store failure.
    pub fn create_item(&mut self, req: CreateItem) -> Result<Outcome, EngineError> {
        let item = Item::new(req.item_id, req.description, req.role, req.link, req.owner);
        let id = item.id.clone();

        match self.items.add(item) {
            Ok(()) => {}
            Err(RegistryError::Conflict { id }) => {
                tracing::warn!(item_id = %id, "create against existing id");
                return Err(EngineError::Conflict { id });
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(item_id = %id, "item created");
        self.emit(EventKind::ItemCreated, Some(id.clone()));
        Ok(Outcome::Applied { id })
    }

    /// Merge a patch into an item. Empty/absent patch fields change nothing.
    ///
    /// Missing target: silent no-op (no mutation, no event).
    ///
    /// # Errors
    ///
    /// [`EngineError::Registry`] on store failure.
    pub fn update_item(&mut self, req: UpdateItem) -> Result<Outcome, EngineError> {
        let Some(mut item) = fetch(self.items.as_ref(), &req.item_id)? else {
            tracing::debug!(item_id = %req.item_id, "update target absent; skipping");
            return Ok(Outcome::Skipped);
        };

        item.apply_patch(req.patch);
        if !commit(self.items.as_mut(), item)? {
            return Ok(Outcome::Skipped);
        }

        tracing::info!(item_id = %req.item_id, "item updated");
        self.emit(EventKind::ItemUpdated, Some(req.item_id.clone()));
        Ok(Outcome::Applied { id: req.item_id })
    }

    /// Remove an item. Same idempotent, loud, fail-open shape as
    /// [`delete_association`](Self::delete_association). Associations that
    /// reference the item keep their (now dangling, weak) reference.
    ///
    /// # Errors
    ///
    /// [`EngineError::Registry`] if the removal itself fails.
    pub fn delete_item(&mut self, req: &DeleteItem) -> Result<Outcome, EngineError> {
        let removed = delete(self.items.as_mut(), &req.item_id)?;
        let id = removed.then(|| req.item_id.clone());

        tracing::info!(item_id = %req.item_id, removed, "item delete completed");
        self.emit(EventKind::ItemDeleted, id.clone());
        Ok(Outcome::Deleted { id })
    }

    fn emit(&self, kind: EventKind, entity_id: Option<String>) {
        self.sink.emit(EventEnvelope {
            namespace: self.config.namespace.clone(),
            kind,
            entity_id,
            ts_ms: self.clock.now_ms(),
        });
    }
}

// ---------------------------------------------------------------------------
// Registry access helpers
// ---------------------------------------------------------------------------

/// Fetch a target entity, mapping "absent" to `None`.
fn fetch<T: Entity>(
    registry: &dyn Registry<T>,
    id: &str,
) -> Result<Option<T>, EngineError> {
    match registry.get(id) {
        Ok(entity) => Ok(Some(entity)),
        Err(RegistryError::NotFound { .. }) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Persist a mutated entity. Returns `false` when the entity vanished
/// between fetch and commit — a lost race, handled like a miss.
fn commit<T: Entity>(registry: &mut dyn Registry<T>, entity: T) -> Result<bool, EngineError> {
    let id = entity.id().to_string();
    match registry.update(entity) {
        Ok(()) => Ok(true),
        Err(RegistryError::NotFound { .. }) => {
            tracing::warn!(id = %id, "target vanished before commit; treating as miss");
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

/// Existence-checked removal for the delete handlers. Returns whether an
/// entity was actually removed.
///
/// The existence check fails open: an unavailable registry reads as "does
/// not exist" and the removal is skipped. A `NotFound` from the removal
/// itself (double delete, lost race) also reads as a miss.
fn delete<T: Entity>(registry: &mut dyn Registry<T>, id: &str) -> Result<bool, EngineError> {
    let present = match registry.exists(id) {
        Ok(present) => present,
        Err(RegistryError::Unavailable { reason }) => {
            tracing::warn!(id = %id, reason = %reason, "existence check unavailable; treating as absent");
            false
        }
        Err(err) => return Err(err.into()),
    };

    if !present {
        return Ok(false);
    }

    match registry.remove(id) {
        Ok(()) => Ok(true),
        Err(RegistryError::NotFound { .. }) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
