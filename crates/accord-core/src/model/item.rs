//! Item entity: an owned shareable resource with a descriptive record and an
//! external link, independent of any association that references it.

use serde::{Deserialize, Serialize};

/// All persisted fields for an item.
///
/// The canonical field name is `role` (singular); payloads written by older
/// revisions used `roles` and still deserialize via the serde alias. The
/// engine only ever writes `role`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque unique identifier, immutable after creation.
    pub id: String,
    /// Free-text description of the resource.
    pub description: String,
    /// The role the resource plays for its owner.
    #[serde(alias = "roles")]
    pub role: String,
    /// External pointer to the resource itself.
    pub link: String,
    /// Owner identity.
    pub owner: String,
}

impl Item {
    /// Create an item with every descriptive field supplied up front.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        role: impl Into<String>,
        link: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            role: role.into(),
            link: link.into(),
            owner: owner.into(),
        }
    }

    /// Merge a patch into this item.
    ///
    /// A field is overwritten only when the patch supplies a non-empty value;
    /// `None` and `Some("")` both mean "no change". There is no way to clear
    /// an item field through a patch.
    pub fn apply_patch(&mut self, patch: ItemPatch) {
        apply_field(&mut self.description, patch.description);
        apply_field(&mut self.role, patch.role);
        apply_field(&mut self.link, patch.link);
        apply_field(&mut self.owner, patch.owner);
    }
}

/// Partial update for an item; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "roles")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl ItemPatch {
    /// Whether the patch changes nothing regardless of the target item.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        fn blank(field: Option<&String>) -> bool {
            field.is_none_or(String::is_empty)
        }
        blank(self.description.as_ref())
            && blank(self.role.as_ref())
            && blank(self.link.as_ref())
            && blank(self.owner.as_ref())
    }
}

fn apply_field(target: &mut String, supplied: Option<String>) {
    if let Some(value) = supplied {
        if !value.is_empty() {
            *target = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Item, ItemPatch};

    fn sample() -> Item {
        Item::new("I1", "lab results", "record", "https://x/i1", "U2")
    }

    #[test]
    fn patch_overwrites_supplied_fields() {
        let mut item = sample();
        item.apply_patch(ItemPatch {
            description: Some("imaging".to_string()),
            owner: Some("U3".to_string()),
            ..ItemPatch::default()
        });

        assert_eq!(item.description, "imaging");
        assert_eq!(item.owner, "U3");
        assert_eq!(item.role, "record");
        assert_eq!(item.link, "https://x/i1");
    }

    #[test]
    fn empty_strings_do_not_clear_fields() {
        let mut item = sample();
        let before = item.clone();
        item.apply_patch(ItemPatch {
            description: Some(String::new()),
            role: Some(String::new()),
            link: None,
            owner: Some(String::new()),
        });
        assert_eq!(item, before);
    }

    #[test]
    fn empty_patch_is_noop() {
        let mut item = sample();
        let before = item.clone();
        item.apply_patch(ItemPatch::default());
        assert_eq!(item, before);
        assert!(ItemPatch::default().is_noop());
        assert!(!ItemPatch {
            link: Some("https://x/i2".to_string()),
            ..ItemPatch::default()
        }
        .is_noop());
    }

    #[test]
    fn roles_alias_still_deserializes() {
        let item: Item = serde_json::from_str(
            r#"{"id":"I1","description":"d","roles":"record","link":"l","owner":"o"}"#,
        )
        .expect("deserialize with legacy field name");
        assert_eq!(item.role, "record");

        // The engine always writes the canonical name.
        let json = serde_json::to_string(&item).expect("serialize");
        assert!(json.contains(r#""role":"record""#));
        assert!(!json.contains("roles"));
    }
}
