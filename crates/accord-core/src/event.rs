//! Outcome events emitted by the operation handlers.
//!
//! Every handler emits exactly one [`EventEnvelope`] per completed operation
//! (the documented silent no-op paths emit none). Emission is fire-and-forget
//! through an [`EventSink`]; ordering across handlers is not guaranteed, and
//! a sink must never fail back into the engine.
//!
//! Event kinds use the dotted `<entity>.<verb>` string convention.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

/// The eight outcome event kinds in the lifecycle catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventKind {
    /// A new association was stored.
    AssociationCreated,
    /// An existing association's fields/thread changed without an approval
    /// transition.
    AssociationUpdated,
    /// An association was approved and a link attached.
    AssociationGranted,
    /// An association's approval was withdrawn and its link cleared.
    AssociationRevoked,
    /// An association delete completed (loud even on a miss).
    AssociationDeleted,
    /// A new item was stored.
    ItemCreated,
    /// An existing item's fields changed.
    ItemUpdated,
    /// An item delete completed (loud even on a miss).
    ItemDeleted,
}

/// Error returned when parsing an unknown event kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventKind {
    /// The unrecognised input string.
    pub raw: String,
}

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown event kind '{}': expected one of association.created, \
             association.updated, association.granted, association.revoked, \
             association.deleted, item.created, item.updated, item.deleted",
            self.raw
        )
    }
}

impl std::error::Error for UnknownEventKind {}

impl EventKind {
    /// All event kinds in catalog order.
    pub const ALL: [Self; 8] = [
        Self::AssociationCreated,
        Self::AssociationUpdated,
        Self::AssociationGranted,
        Self::AssociationRevoked,
        Self::AssociationDeleted,
        Self::ItemCreated,
        Self::ItemUpdated,
        Self::ItemDeleted,
    ];

    /// Canonical `<entity>.<verb>` string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AssociationCreated => "association.created",
            Self::AssociationUpdated => "association.updated",
            Self::AssociationGranted => "association.granted",
            Self::AssociationRevoked => "association.revoked",
            Self::AssociationDeleted => "association.deleted",
            Self::ItemCreated => "item.created",
            Self::ItemUpdated => "item.updated",
            Self::ItemDeleted => "item.deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "association.created" => Ok(Self::AssociationCreated),
            "association.updated" => Ok(Self::AssociationUpdated),
            "association.granted" => Ok(Self::AssociationGranted),
            "association.revoked" => Ok(Self::AssociationRevoked),
            "association.deleted" => Ok(Self::AssociationDeleted),
            "item.created" => Ok(Self::ItemCreated),
            "item.updated" => Ok(Self::ItemUpdated),
            "item.deleted" => Ok(Self::ItemDeleted),
            _ => Err(UnknownEventKind { raw: s.to_string() }),
        }
    }
}

impl TryFrom<String> for EventKind {
    type Error = UnknownEventKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

/// The payload handed to the event sink: which operation completed, against
/// which entity, under which namespace, and when.
///
/// `entity_id` is `None` exactly on the delete-miss path — a delete against
/// an absent id still completes loudly, carrying no identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Deployment namespace the engine was configured with.
    pub namespace: String,
    /// Which outcome this is.
    pub kind: EventKind,
    /// Identifier of the affected entity, absent on delete-miss.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Engine-clock milliseconds at emission time.
    pub ts_ms: u64,
}

impl EventEnvelope {
    /// Fully-qualified event name, `<namespace>.<entity>.<verb>`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.kind)
    }
}

/// Fire-and-forget transport for outcome events.
///
/// Implementations must not fail back into the engine; a lossy sink is an
/// acceptable sink.
pub trait EventSink {
    /// Deliver one envelope.
    fn emit(&self, event: EventEnvelope);
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn emit(&self, event: EventEnvelope) {
        (**self).emit(event);
    }
}

/// Sink that logs every envelope through `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: EventEnvelope) {
        tracing::info!(
            kind = %event.kind,
            namespace = %event.namespace,
            entity_id = event.entity_id.as_deref().unwrap_or(""),
            ts_ms = event.ts_ms,
            "lifecycle event"
        );
    }
}

/// Sink that records every envelope in memory, in emission order.
///
/// Used by the engine tests and useful to embedders that want to drain
/// events after a batch of operations.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EventEnvelope>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    ///
    /// # Panics
    ///
    /// Panics if a previous holder of the internal lock panicked.
    #[must_use]
    pub fn recorded(&self) -> Vec<EventEnvelope> {
        self.events.lock().expect("recording sink lock").clone()
    }

    /// Drain and return everything emitted so far.
    ///
    /// # Panics
    ///
    /// Panics if a previous holder of the internal lock panicked.
    pub fn drain(&self) -> Vec<EventEnvelope> {
        std::mem::take(&mut *self.events.lock().expect("recording sink lock"))
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EventEnvelope) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventEnvelope, EventKind, EventSink, RecordingSink};
    use std::str::FromStr;

    #[test]
    fn kind_strings_roundtrip() {
        for kind in EventKind::ALL {
            let rendered = kind.to_string();
            let reparsed = EventKind::from_str(&rendered).expect("reparse");
            assert_eq!(kind, reparsed);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = EventKind::from_str("association.merged").expect_err("must fail");
        assert!(err.to_string().contains("association.merged"));
    }

    #[test]
    fn envelope_json_shape() {
        let envelope = EventEnvelope {
            namespace: "accord".to_string(),
            kind: EventKind::AssociationGranted,
            entity_id: Some("A1".to_string()),
            ts_ms: 99,
        };

        let json = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "namespace": "accord",
                "kind": "association.granted",
                "entity_id": "A1",
                "ts_ms": 99,
            })
        );
        assert_eq!(envelope.qualified_name(), "accord.association.granted");
    }

    #[test]
    fn delete_miss_envelope_omits_entity_id() {
        let envelope = EventEnvelope {
            namespace: "accord".to_string(),
            kind: EventKind::ItemDeleted,
            entity_id: None,
            ts_ms: 7,
        };
        let json = serde_json::to_string(&envelope).expect("serialize");
        assert!(!json.contains("entity_id"));
    }

    #[test]
    fn recording_sink_preserves_emission_order() {
        let sink = RecordingSink::new();
        for (i, kind) in [EventKind::ItemCreated, EventKind::ItemUpdated]
            .into_iter()
            .enumerate()
        {
            sink.emit(EventEnvelope {
                namespace: "accord".to_string(),
                kind,
                entity_id: Some(format!("I{i}")),
                ts_ms: i as u64,
            });
        }

        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].kind, EventKind::ItemCreated);
        assert_eq!(recorded[1].kind, EventKind::ItemUpdated);

        assert_eq!(sink.drain().len(), 2);
        assert!(sink.recorded().is_empty());
    }
}
