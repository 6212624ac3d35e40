//! Association entity and its approval state machine.
//!
//! An association is the request/grant relationship record between two
//! identities (`from` requests, `to` owns/grants), optionally scoped to an
//! item. Lifecycle:
//!
//! ```text
//! create -> pending (approved=false, link="")
//! grant  -> granted (approved=true,  link=<grantor's pointer>)
//! revoke -> revoked (approved=false, link="")
//! ```
//!
//! Pending and revoked are observationally identical — both are carried by
//! `approved=false` with an empty link — so no separate state field is
//! stored; the distinction lives in the operation history (message thread
//! and emitted events).
//!
//! The `item` reference is weak: deleting an item never cascades into the
//! associations that point at it.

use serde::{Deserialize, Serialize};

use super::message::{Message, MessageThread};

/// The association aggregate: parties, optional item scope, approval flag,
/// shared-resource link, and the append-only message thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Opaque unique identifier, immutable after creation.
    pub id: String,
    /// Requester identity. Immutable.
    pub from: String,
    /// Owner/grantor identity. Immutable.
    pub to: String,
    /// Weak reference to an item id. May be absent, set, or cleared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Approval flag. `false` at creation, `true` once granted, reset by
    /// revoke.
    pub approved: bool,
    /// The grantor's shared-resource pointer. Empty unless granted; revoke
    /// always clears it back to empty.
    #[serde(default)]
    pub link: String,
    /// Ordered message log. See [`MessageThread`] for the per-operation
    /// insertion positions.
    #[serde(default)]
    pub messages: MessageThread,
}

impl Association {
    /// Create a pending association with an empty thread.
    ///
    /// The caller (the create handler) appends the seed message so that the
    /// timestamp comes from the engine clock.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        item: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            item,
            approved: false,
            link: String::new(),
            messages: MessageThread::new(),
        }
    }

    /// Whether the association is currently granted.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.approved
    }

    /// Apply an update: replace `item` and/or `link` where supplied.
    ///
    /// Does not touch `approved`. A supplied value always replaces, even if
    /// empty; absence means "no change".
    pub fn apply_update(&mut self, item: Option<String>, link: Option<String>) {
        if let Some(item) = item {
            self.item = Some(item);
        }
        if let Some(link) = link {
            self.link = link;
        }
    }

    /// Grant: set `approved`, overwrite `link` unconditionally, and replace
    /// `item` when one is supplied.
    pub fn grant(&mut self, link: impl Into<String>, item: Option<String>) {
        self.approved = true;
        self.link = link.into();
        if let Some(item) = item {
            self.item = Some(item);
        }
    }

    /// Revoke: clear `approved` and `link`.
    ///
    /// Asymmetric with [`grant`](Self::grant) on purpose: when the request
    /// supplied no item the reference is cleared, but a supplied item is left
    /// untouched — revoke never *sets* the reference. Thread insertion for
    /// revoke is an append, not a prepend; both quirks are externally
    /// observable contract, so callers must not unify them.
    pub fn revoke(&mut self, item_supplied: bool) {
        self.approved = false;
        self.link.clear();
        if !item_supplied {
            self.item = None;
        }
    }

    /// Push a thread entry at the front (update/grant ordering).
    pub fn prepend_message(&mut self, message: Message) {
        self.messages.prepend(message);
    }

    /// Push a thread entry at the back (creation seed and revoke ordering).
    pub fn append_message(&mut self, message: Message) {
        self.messages.append(message);
    }
}

#[cfg(test)]
mod tests {
    use super::Association;
    use crate::model::message::Message;

    fn pending() -> Association {
        Association::new("A1", "U1", "U2", None)
    }

    #[test]
    fn new_association_is_pending() {
        let assoc = pending();
        assert!(!assoc.approved);
        assert_eq!(assoc.link, "");
        assert!(assoc.item.is_none());
        assert!(assoc.messages.is_empty());
    }

    #[test]
    fn grant_sets_approval_and_link() {
        let mut assoc = pending();
        assoc.grant("https://share.example/r1", Some("I1".to_string()));

        assert!(assoc.approved);
        assert_eq!(assoc.link, "https://share.example/r1");
        assert_eq!(assoc.item.as_deref(), Some("I1"));
    }

    #[test]
    fn grant_without_item_keeps_existing_reference() {
        let mut assoc = Association::new("A1", "U1", "U2", Some("I0".to_string()));
        assoc.grant("L1", None);
        assert_eq!(assoc.item.as_deref(), Some("I0"));
    }

    #[test]
    fn revoke_clears_link_and_approval() {
        let mut assoc = pending();
        assoc.grant("L1", Some("I1".to_string()));
        assoc.revoke(true);

        assert!(!assoc.approved);
        assert_eq!(assoc.link, "");
        // item was supplied on the revoke request: left untouched
        assert_eq!(assoc.item.as_deref(), Some("I1"));
    }

    #[test]
    fn revoke_without_item_clears_reference() {
        let mut assoc = pending();
        assoc.grant("L1", Some("I1".to_string()));
        assoc.revoke(false);

        assert!(assoc.item.is_none());
    }

    #[test]
    fn update_replaces_only_supplied_fields() {
        let mut assoc = pending();
        assoc.apply_update(Some("I2".to_string()), None);
        assert_eq!(assoc.item.as_deref(), Some("I2"));
        assert_eq!(assoc.link, "");

        assoc.apply_update(None, Some("L2".to_string()));
        assert_eq!(assoc.item.as_deref(), Some("I2"));
        assert_eq!(assoc.link, "L2");
        assert!(!assoc.approved);
    }

    #[test]
    fn regrant_after_revoke_overwrites_link() {
        let mut assoc = pending();
        assoc.grant("L1", None);
        assoc.revoke(false);
        assoc.grant("L2", None);

        assert!(assoc.approved);
        assert_eq!(assoc.link, "L2");
    }

    #[test]
    fn json_shape_is_stable() {
        let mut assoc = pending();
        assoc.append_message(Message::new(Some("U1".to_string()), "hi", 5));

        let json = serde_json::to_value(&assoc).expect("serialize association");
        assert_eq!(
            json,
            serde_json::json!({
                "id": "A1",
                "from": "U1",
                "to": "U2",
                "approved": false,
                "link": "",
                "messages": [{"from": "U1", "message": "hi", "date": 5}],
            })
        );
    }
}
