//! Message value type and the append-only thread it lives in.
//!
//! Messages are created only as a side effect of association transitions and
//! are never edited or removed. The thread preserves insertion order, and the
//! insertion *position* differs per operation: update and grant insert at the
//! front (most-recent-first browsing), revoke and the creation seed insert at
//! the back. That per-operation position is an externally observable contract,
//! so the thread exposes `prepend` and `append` as distinct named operations
//! rather than a single push.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single immutable entry in an association's message thread.
///
/// `date` is engine-clock milliseconds since the Unix epoch, stamped when the
/// transition ran — never client-supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author identity. Optional: grant/revoke requests may omit the actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Text body.
    pub message: String,
    /// Creation timestamp, milliseconds since the Unix epoch.
    pub date: u64,
}

impl Message {
    /// Build a message stamped with the given clock reading.
    #[must_use]
    pub fn new(from: Option<String>, message: impl Into<String>, date: u64) -> Self {
        Self {
            from,
            message: message.into(),
            date,
        }
    }
}

/// Insertion-ordered, append-only message log.
///
/// Serializes transparently as a JSON array, front first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageThread {
    entries: VecDeque<Message>,
}

impl MessageThread {
    /// Create an empty thread.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front of the thread (update/grant ordering).
    pub fn prepend(&mut self, message: Message) {
        self.entries.push_front(message);
    }

    /// Insert at the back of the thread (creation seed and revoke ordering).
    pub fn append(&mut self, message: Message) {
        self.entries.push_back(message);
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the thread has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at the front (most recent under prepend ordering).
    #[must_use]
    pub fn front(&self) -> Option<&Message> {
        self.entries.front()
    }

    /// The entry at the back.
    #[must_use]
    pub fn back(&self) -> Option<&Message> {
        self.entries.back()
    }

    /// Iterate front to back.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a MessageThread {
    type Item = &'a Message;
    type IntoIter = std::collections::vec_deque::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Message, MessageThread};

    fn msg(body: &str) -> Message {
        Message::new(Some("U1".to_string()), body, 1_000)
    }

    #[test]
    fn prepend_inserts_at_front() {
        let mut thread = MessageThread::new();
        thread.append(msg("first"));
        thread.prepend(msg("second"));

        assert_eq!(thread.len(), 2);
        assert_eq!(thread.front().map(|m| m.message.as_str()), Some("second"));
        assert_eq!(thread.back().map(|m| m.message.as_str()), Some("first"));
    }

    #[test]
    fn append_inserts_at_back() {
        let mut thread = MessageThread::new();
        thread.append(msg("a"));
        thread.append(msg("b"));

        let order: Vec<&str> = thread.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn mixed_ordering_matches_deque_semantics() {
        let mut thread = MessageThread::new();
        thread.append(msg("seed"));
        thread.prepend(msg("update-1"));
        thread.prepend(msg("grant"));
        thread.append(msg("revoke"));

        let order: Vec<&str> = thread.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(order, vec!["grant", "update-1", "seed", "revoke"]);
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut thread = MessageThread::new();
        thread.append(Message::new(None, "hi", 42));

        let json = serde_json::to_string(&thread).expect("serialize thread");
        assert_eq!(json, r#"[{"message":"hi","date":42}]"#);

        let back: MessageThread = serde_json::from_str(&json).expect("deserialize thread");
        assert_eq!(back, thread);
    }

    #[test]
    fn author_field_roundtrips_when_present() {
        let json = r#"[{"from":"U9","message":"hello","date":7}]"#;
        let thread: MessageThread = serde_json::from_str(json).expect("deserialize");
        assert_eq!(thread.front().and_then(|m| m.from.as_deref()), Some("U9"));
    }
}
