use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of role tags a user can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// The account that owns the workspace.
    Owner,
    /// Full administrative access, including the user-role console.
    Admin,
    /// Read-only access to audit trails and verification reports.
    Auditor,
    /// A regular user that receives shared documents.
    Recipient,
}

impl UserRole {
    /// Returns the wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Admin => "admin",
            UserRole::Auditor => "auditor",
            UserRole::Recipient => "recipient",
        }
    }
}

/// Represents the authenticated user as confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's email address.
    pub email: String,
    /// The user's username.
    #[serde(default)]
    pub username: Option<String>,
    /// The user's full name.
    #[serde(default)]
    pub name: Option<String>,
    /// The user's role.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Whether the user has confirmed their email address.
    /// Absent on the wire means not confirmed.
    #[serde(default)]
    pub email_confirmed: bool,
    /// The timestamp when the user was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// The timestamp when the user was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The non-secret subset of [`AuthUser`] kept in the local session store.
///
/// Never contains a bearer credential; the actual credential lives in the
/// transport's cookie jar and is not inspectable by application code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's email address.
    pub email: String,
    /// The user's full name.
    pub name: Option<String>,
    /// The user's username.
    pub username: Option<String>,
    /// The user's role.
    pub role: Option<UserRole>,
}

impl From<&AuthUser> for SessionUser {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// A user row as listed by the admin console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's email address.
    #[serde(default)]
    pub email: Option<String>,
    /// The user's full name.
    #[serde(default)]
    pub name: Option<String>,
    /// The user's username.
    #[serde(default)]
    pub username: Option<String>,
    /// The user's role.
    pub role: UserRole,
    /// Whether the user has confirmed their email address.
    #[serde(default)]
    pub email_confirmed: bool,
    /// The timestamp when the user was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// The timestamp when the user was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A user candidate returned by the share-dialog search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserForSharing {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    #[serde(default)]
    pub email: Option<String>,
    /// An avatar URL, when the backend has one.
    #[serde(default)]
    pub avatar: Option<String>,
    /// The user's company, when known.
    #[serde(default)]
    pub company: Option<String>,
}
