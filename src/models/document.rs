use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document owned by the current user.
///
/// The backend owns the durable record; this is a transient advisory copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The unique identifier for the document.
    pub id: Uuid,
    /// The user that owns the document.
    pub owner_id: Uuid,
    /// The document title.
    pub title: String,
    /// The document description.
    #[serde(default)]
    pub description: Option<String>,
    /// The document type tag.
    #[serde(default)]
    pub doc_type: Option<String>,
    /// Free-form tags attached to the document.
    #[serde(default)]
    pub tags: Vec<String>,
    /// The file's MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// The file size in bytes.
    #[serde(default)]
    pub file_size: Option<i64>,
    /// The SHA-256 checksum computed by the backend at upload time.
    #[serde(default)]
    pub checksum_sha256: Option<String>,
    /// A short-lived URL for fetching the file content, when provided.
    #[serde(default)]
    pub signed_file_url: Option<String>,
    /// The timestamp when the document was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the document was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Filters accepted by the document listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilters {
    /// Restrict to one document type tag.
    pub doc_type: Option<String>,
    /// Full-text search over title and description.
    pub search: Option<String>,
}

/// The payload for uploading a new document.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// The file name as it should appear server-side.
    pub file_name: String,
    /// The raw file content.
    pub bytes: Vec<u8>,
    /// The document title.
    pub title: String,
    /// Free-form tags to attach.
    pub tags: Vec<String>,
}

/// Metadata fields that can be changed after upload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentUpdate {
    /// A new title, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// A new description, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// A replacement tag set, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// The backend's verdict on a document's integrity.
///
/// The checksum comparison happens server-side; the client only renders
/// the verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    /// The document that was verified.
    #[serde(rename = "documentId")]
    pub document_id: Uuid,
    /// Whether the stored file still matches its recorded checksum.
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    /// A human-readable summary of the verification.
    pub message: String,
}
