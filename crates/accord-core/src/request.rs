//! Operation request payloads and the closed dispatch union.
//!
//! One struct per operation; required fields are owned values, optional
//! fields are `Option`s — "no value supplied" is `None`, never an empty
//! string standing in for absence. [`Request`] is the tagged union over all
//! eight operations, serde-tagged by the operation name, so dispatch is an
//! exhaustive match instead of a free-form name lookup.
//!
//! Ids are caller-supplied opaque strings; the engine never generates one.

use serde::{Deserialize, Serialize};

use crate::model::ItemPatch;

/// Create a new association in the pending state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssociation {
    /// Fresh id for the new association.
    pub association_id: String,
    /// Requester identity; also the author of the seed message.
    pub from: String,
    /// Owner/grantor identity.
    pub to: String,
    /// Seed message text.
    pub message: String,
    /// Optional item the request is scoped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

/// Update an existing association without touching its approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssociation {
    /// Target association.
    pub association_id: String,
    /// Author of the (optional) new thread entry.
    pub from: String,
    /// New thread entry, prepended when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Replacement item reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Replacement link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Approve an association and attach the grantor's link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantAssociation {
    /// Target association.
    pub association_id: String,
    /// Shared-resource pointer; overwrites the stored link unconditionally.
    pub link: String,
    /// New thread entry, prepended when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Replacement item reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Author of the thread entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// Withdraw approval and clear the stored link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeAssociation {
    /// Target association.
    pub association_id: String,
    /// New thread entry, appended when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// When absent, the stored item reference is cleared; when present it is
    /// left untouched (revoke never sets the reference).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Author of the thread entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// Remove an association. Idempotent; a miss still completes loudly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAssociation {
    /// Target association.
    pub association_id: String,
}

/// Create a new item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    /// Fresh id for the new item.
    pub item_id: String,
    /// Free-text description.
    pub description: String,
    /// The role the resource plays for its owner.
    #[serde(alias = "roles")]
    pub role: String,
    /// External pointer to the resource.
    pub link: String,
    /// Owner identity.
    pub owner: String,
}

/// Update an existing item. Missing target is a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    /// Target item.
    pub item_id: String,
    /// Field changes; empty/absent fields leave the stored value alone.
    #[serde(flatten)]
    pub patch: ItemPatch,
}

/// Remove an item. Idempotent; a miss still completes loudly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItem {
    /// Target item.
    pub item_id: String,
}

/// The closed set of operations the engine dispatches on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Request {
    #[serde(rename = "createAssociation")]
    CreateAssociation(CreateAssociation),
    #[serde(rename = "updateAssociation")]
    UpdateAssociation(UpdateAssociation),
    #[serde(rename = "grantAssociation")]
    GrantAssociation(GrantAssociation),
    #[serde(rename = "revokeAssociation")]
    RevokeAssociation(RevokeAssociation),
    #[serde(rename = "deleteAssociation")]
    DeleteAssociation(DeleteAssociation),
    #[serde(rename = "createItem")]
    CreateItem(CreateItem),
    #[serde(rename = "updateItem")]
    UpdateItem(UpdateItem),
    #[serde(rename = "deleteItem")]
    DeleteItem(DeleteItem),
}

#[cfg(test)]
mod tests {
    use super::{CreateAssociation, GrantAssociation, Request, UpdateItem};

    #[test]
    fn tagged_request_roundtrips() {
        let request = Request::GrantAssociation(GrantAssociation {
            association_id: "A1".to_string(),
            link: "L1".to_string(),
            message: Some("ok".to_string()),
            item: None,
            from: Some("U2".to_string()),
        });

        let json = serde_json::to_string(&request).expect("serialize request");
        assert!(json.contains(r#""op":"grantAssociation""#));
        assert!(json.contains(r#""associationId":"A1""#));

        let back: Request = serde_json::from_str(&json).expect("deserialize request");
        assert_eq!(back, request);
    }

    #[test]
    fn optional_fields_default_to_absent() {
        let request: Request = serde_json::from_str(
            r#"{"op":"createAssociation","associationId":"A1","from":"U1","to":"U2","message":"hi"}"#,
        )
        .expect("deserialize");

        assert_eq!(
            request,
            Request::CreateAssociation(CreateAssociation {
                association_id: "A1".to_string(),
                from: "U1".to_string(),
                to: "U2".to_string(),
                message: "hi".to_string(),
                item: None,
            })
        );
    }

    #[test]
    fn update_item_patch_is_flattened() {
        let request: Request = serde_json::from_str(
            r#"{"op":"updateItem","itemId":"I1","description":"new desc"}"#,
        )
        .expect("deserialize");

        let Request::UpdateItem(UpdateItem { item_id, patch }) = request else {
            panic!("expected updateItem");
        };
        assert_eq!(item_id, "I1");
        assert_eq!(patch.description.as_deref(), Some("new desc"));
        assert!(patch.role.is_none());
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let result: Result<Request, _> =
            serde_json::from_str(r#"{"op":"mergeAssociation","associationId":"A1"}"#);
        assert!(result.is_err());
    }
}
