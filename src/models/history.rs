use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of actions the activity history records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    /// A document was uploaded.
    Upload,
    /// A document's file was downloaded.
    Download,
    /// A share was created.
    Share,
    /// A document's integrity was verified.
    Verify,
    /// A document was opened in the viewer.
    View,
    /// A document was deleted.
    Delete,
}

impl HistoryAction {
    /// Returns the wire representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Upload => "upload",
            HistoryAction::Download => "download",
            HistoryAction::Share => "share",
            HistoryAction::Verify => "verify",
            HistoryAction::View => "view",
            HistoryAction::Delete => "delete",
        }
    }
}

/// One recorded activity, as listed by the history endpoints.
///
/// History rows use a numeric id, unlike the UUID-keyed document and share
/// records. Both subject ids are nullable: system-level actions carry no
/// document, and anonymized rows carry no user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The sequential identifier for the entry.
    pub id: i64,
    /// What happened.
    pub action: HistoryAction,
    /// The document the action concerned, when any.
    #[serde(default)]
    pub document_id: Option<Uuid>,
    /// The user that performed the action, when known.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Free-form detail text.
    #[serde(default)]
    pub details: Option<String>,
    /// The caller's IP address as recorded by the backend.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// The caller's user agent as recorded by the backend.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// The timestamp when the entry was recorded.
    pub created_at: DateTime<Utc>,
}

/// One page of the activity history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    /// The entries on this page.
    pub entries: Vec<HistoryEntry>,
    /// The total number of entries across all pages.
    pub total: u64,
    /// The 1-based page number.
    pub page: u32,
    /// The page size.
    pub limit: u32,
}

/// The payload for recording a new activity entry.
#[derive(Debug, Clone, Serialize)]
pub struct CreateHistoryEntry {
    /// What happened.
    pub action: HistoryAction,
    /// The document the action concerned, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Uuid>,
    /// Free-form detail text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// The caller's IP address, when the caller knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// The caller's user agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}
