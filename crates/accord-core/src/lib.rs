//! Association and item lifecycle engine.
//!
//! Models a two-party association workflow between a requester and an
//! owner, mediated by an optional shared item, with an append-only message
//! thread and an approval/link lifecycle. Durable storage, id generation and
//! event transport are external collaborators behind the [`registry`] and
//! [`event`] seams; this crate owns the entities, their invariants, and the
//! create/update/grant/revoke/delete transitions.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at module boundaries; expected
//!   conditions (missing targets) are outcomes, not errors.
//! - **Logging**: `tracing` macros with structured fields.
//!
//! # Example
//!
//! ```
//! use accord_core::config::EngineConfig;
//! use accord_core::engine::{Engine, Outcome};
//! use accord_core::request::CreateAssociation;
//!
//! let mut engine = Engine::in_memory(EngineConfig::default());
//! let outcome = engine
//!     .create_association(CreateAssociation {
//!         association_id: "A1".to_string(),
//!         from: "U1".to_string(),
//!         to: "U2".to_string(),
//!         message: "requesting access".to_string(),
//!         item: None,
//!     })
//!     .expect("create");
//! assert_eq!(outcome, Outcome::Applied { id: "A1".to_string() });
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod model;
pub mod registry;
pub mod request;

pub use config::EngineConfig;
pub use engine::{Engine, Outcome};
pub use error::{EngineError, ErrorCode};
pub use event::{EventEnvelope, EventKind, EventSink};
pub use model::{Association, Item, ItemPatch, Message, MessageThread};
pub use registry::{Entity, MemoryRegistry, Registry, RegistryError};
pub use request::Request;
