use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of permission levels a share can carry.
///
/// Only [`PermissionLevel::Read`] and [`PermissionLevel::Comment`] can be
/// granted when creating a share; `comment` is read access plus download.
/// The wider set exists because the backend may report shares created
/// through other channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// View the document in the protected viewer.
    Read,
    /// View plus download the original file.
    Comment,
    /// Modify document metadata.
    Write,
    /// Full control, including re-sharing.
    Admin,
}

impl PermissionLevel {
    /// Returns `true` for the levels a user may grant when creating a share.
    pub fn grantable(&self) -> bool {
        matches!(self, PermissionLevel::Read | PermissionLevel::Comment)
    }

    /// Returns the wire representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Read => "read",
            PermissionLevel::Comment => "comment",
            PermissionLevel::Write => "write",
            PermissionLevel::Admin => "admin",
        }
    }
}

/// A grant of access from one user to another for one document.
///
/// The `share_token` is a capability: possession implies access, subject to
/// the server-side active flag and expiry checks. Revocation is one-way;
/// there is no re-activation path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentShare {
    /// The unique identifier for the share.
    pub id: Uuid,
    /// The document this share grants access to.
    pub document_id: Uuid,
    /// The user the document is shared with.
    pub shared_with_user_id: Uuid,
    /// The user that created the share.
    pub created_by: Uuid,
    /// The opaque capability string identifying this share.
    pub share_token: String,
    /// An optional title shown to the recipient.
    #[serde(default)]
    pub title: Option<String>,
    /// An optional message shown to the recipient.
    #[serde(default)]
    pub message: Option<String>,
    /// The permission level granted by this share.
    pub permission_level: PermissionLevel,
    /// When the share stops being usable; absent means no expiry.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the share is still active. Revocation flips this to `false`.
    pub is_active: bool,
    /// The timestamp when the share was created.
    pub created_at: DateTime<Utc>,
}

impl DocumentShare {
    /// Returns `true` when the share is past its expiry at wall-clock now.
    ///
    /// Advisory only: the backend is the authority and may refuse a token
    /// this method still considers live.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns `true` when the share is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }

    /// Returns `true` while the share is active and unexpired.
    pub fn is_usable(&self) -> bool {
        self.is_active && !self.is_expired()
    }
}

/// A document shared with the current user, as listed by `shared-with-me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedWithMe {
    /// The unique identifier for the share.
    pub id: Uuid,
    /// The document this share grants access to.
    pub document_id: Uuid,
    /// The document title.
    pub title: String,
    /// The document description.
    #[serde(default)]
    pub description: Option<String>,
    /// The document type tag.
    #[serde(default)]
    pub doc_type: Option<String>,
    /// The permission level granted to the current user.
    pub permission_level: PermissionLevel,
    /// The display name of the user that shared the document.
    pub shared_by: String,
    /// When the share stops being usable; absent means no expiry.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// The timestamp when the share was created.
    pub created_at: DateTime<Utc>,
    /// The opaque capability string identifying this share.
    pub share_token: String,
}

impl SharedWithMe {
    /// Returns `true` when the share is past its expiry at wall-clock now.
    ///
    /// Recomputed on every call; never cached, so a share that expires
    /// between two reads flips from `false` to `true`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns `true` when the share is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }
}

/// The share half of a resolved share token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareSummary {
    /// The unique identifier for the share.
    pub id: Uuid,
    /// An optional title shown to the recipient.
    #[serde(default)]
    pub title: Option<String>,
    /// An optional message shown to the recipient.
    #[serde(default)]
    pub message: Option<String>,
    /// The permission level granted by this share.
    pub permission_level: PermissionLevel,
    /// The timestamp when the share was created.
    pub created_at: DateTime<Utc>,
    /// When the share stops being usable; absent means no expiry.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// The document half of a resolved share token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedFile {
    /// The unique identifier for the document.
    pub id: Uuid,
    /// The document title.
    pub title: String,
    /// The document description.
    #[serde(default)]
    pub description: Option<String>,
    /// The document type tag.
    #[serde(default)]
    pub doc_type: Option<String>,
    /// The file size in bytes.
    #[serde(default)]
    pub file_size: Option<i64>,
    /// The file's MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// The timestamp when the document was created.
    pub created_at: DateTime<Utc>,
    /// A short-lived URL for fetching the file content.
    pub signed_file_url: String,
    /// The user that owns the document.
    pub owner_id: Uuid,
}

/// A share token resolved into its share and document bundle.
///
/// Callers must check [`SharedDocument::is_expired`] before treating
/// `document.signed_file_url` as usable; expiry here is advisory and the
/// backend may already have refused the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedDocument {
    /// The share that granted access.
    pub share: ShareSummary,
    /// The document the share points at.
    pub document: SharedFile,
}

impl SharedDocument {
    /// Returns `true` when the underlying share is past its expiry.
    pub fn is_expired(&self) -> bool {
        match self.share.expires_at {
            Some(expires_at) => expires_at <= Utc::now(),
            None => false,
        }
    }
}

/// The request payload for creating a share.
///
/// Field names follow the backend's camelCase contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    /// The document to share.
    pub document_id: Uuid,
    /// The user to share with. Required; validated before dispatch.
    pub shared_with_user_id: Option<Uuid>,
    /// The permission level to grant; must be a grantable level.
    pub permission_level: PermissionLevel,
    /// How many hours from now the share stays usable.
    pub expires_in_hours: u32,
    /// An optional title shown to the recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_title: Option<String>,
    /// An optional message shown to the recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_message: Option<String>,
}

/// The outcome of a successful share creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareCreated {
    /// The newly created share record.
    pub share: DocumentShare,
    /// The capability token for the new share.
    pub share_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn share_with_expiry(expires_at: Option<DateTime<Utc>>) -> DocumentShare {
        DocumentShare {
            id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            shared_with_user_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            share_token: "tok_abc123".to_string(),
            title: None,
            message: None,
            permission_level: PermissionLevel::Read,
            expires_at,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn expiry_is_recomputed_per_read() {
        let now = Utc::now();
        let share = share_with_expiry(Some(now + Duration::hours(1)));

        assert!(!share.is_expired_at(now));
        assert!(share.is_expired_at(now + Duration::hours(1)));
        assert!(share.is_expired_at(now + Duration::hours(2)));
    }

    #[test]
    fn share_without_expiry_never_expires() {
        let share = share_with_expiry(None);
        assert!(!share.is_expired_at(Utc::now() + Duration::days(365 * 10)));
    }

    #[test]
    fn revoked_share_is_not_usable_even_before_expiry() {
        let mut share = share_with_expiry(Some(Utc::now() + Duration::hours(1)));
        share.is_active = false;
        assert!(!share.is_usable());
    }

    #[test]
    fn only_read_and_comment_are_grantable() {
        assert!(PermissionLevel::Read.grantable());
        assert!(PermissionLevel::Comment.grantable());
        assert!(!PermissionLevel::Write.grantable());
        assert!(!PermissionLevel::Admin.grantable());
    }

    #[test]
    fn create_request_serializes_camel_case() {
        let request = CreateShareRequest {
            document_id: Uuid::nil(),
            shared_with_user_id: Some(Uuid::nil()),
            permission_level: PermissionLevel::Comment,
            expires_in_hours: 24,
            share_title: Some("Q2 report".to_string()),
            share_message: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["permissionLevel"], json!("comment"));
        assert_eq!(value["expiresInHours"], json!(24));
        assert!(value.get("shareMessage").is_none());
    }

    #[test]
    fn document_share_round_trips_permission_level() {
        let parsed: DocumentShare = serde_json::from_value(json!({
            "id": "0e4cb7a8-6a06-4be2-8f2c-111111111111",
            "document_id": "0e4cb7a8-6a06-4be2-8f2c-222222222222",
            "shared_with_user_id": "0e4cb7a8-6a06-4be2-8f2c-333333333333",
            "created_by": "0e4cb7a8-6a06-4be2-8f2c-444444444444",
            "share_token": "tok_9f8e7d",
            "permission_level": "comment",
            "expires_at": "2026-09-01T00:00:00Z",
            "is_active": true,
            "created_at": "2026-08-27T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(parsed.permission_level, PermissionLevel::Comment);
        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["permission_level"], json!("comment"));
    }
}
