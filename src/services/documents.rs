use crate::error::{ApiError, Result};
use crate::models::document::{
    Document, DocumentFilters, DocumentUpdate, UploadRequest, VerifyReport,
};
use crate::transport::{Transport, UploadPayload};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Orchestrates document CRUD against the backend.
///
/// All durable state, storage, and checksum computation live server-side;
/// this service only issues requests and renders the results into typed
/// records.
#[derive(Clone)]
pub struct DocumentService {
    transport: Arc<dyn Transport>,
}

impl DocumentService {
    /// Creates a new `DocumentService`.
    ///
    /// # Arguments
    ///
    /// * `transport` - The shared transport port.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Lists the current user's documents.
    ///
    /// # Arguments
    ///
    /// * `filters` - Optional type/search filters.
    /// * `page` - 1-based page number.
    /// * `limit` - Page size.
    ///
    /// # Returns
    ///
    /// A `Result` containing the documents; an empty or unexpected payload
    /// is an empty list.
    pub async fn list(
        &self,
        filters: &DocumentFilters,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Document>> {
        let mut params = vec![format!("page={}", page), format!("limit={}", limit)];
        if let Some(doc_type) = &filters.doc_type {
            params.push(format!("type={}", urlencoding::encode(doc_type)));
        }
        if let Some(search) = &filters.search {
            params.push(format!("search={}", urlencoding::encode(search)));
        }

        let endpoint = format!("/documentos?{}", params.join("&"));
        tracing::debug!("📄 Listing documents: {}", endpoint);
        let result = self.transport.get(&endpoint).await?;

        if !result.success {
            return Err(result.as_error());
        }

        Ok(document_list(result.data.as_ref()))
    }

    /// Fetches one document by id.
    pub async fn get(&self, document_id: Uuid) -> Result<Document> {
        let result = self
            .transport
            .get(&format!("/documentos/{}", document_id))
            .await?;

        if !result.success {
            return Err(result.as_error());
        }

        result.decode()
    }

    /// Uploads a new document as a multipart form.
    ///
    /// # Arguments
    ///
    /// * `request` - The file content plus its metadata.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created document record.
    pub async fn upload(&self, request: UploadRequest) -> Result<Document> {
        if request.title.trim().is_empty() {
            return Err(ApiError::Validation("Title is required".to_string()));
        }
        if request.bytes.is_empty() {
            return Err(ApiError::Validation("File is empty".to_string()));
        }

        let mut fields = vec![("title".to_string(), request.title.clone())];
        if !request.tags.is_empty() {
            let tags = serde_json::to_string(&request.tags)
                .map_err(|e| ApiError::Internal(format!("Failed to encode tags: {}", e)))?;
            fields.push(("tags".to_string(), tags));
        }

        tracing::debug!(
            "📤 Uploading \"{}\" ({} bytes)",
            request.file_name,
            request.bytes.len()
        );
        let result = self
            .transport
            .upload(
                "/documentos/upload",
                UploadPayload {
                    file_name: request.file_name,
                    bytes: request.bytes,
                    fields,
                },
            )
            .await?;

        if !result.success {
            return Err(result.as_error());
        }

        let document: Document = result.decode()?;
        tracing::info!("✅ Document uploaded: {}", document.id);
        Ok(document)
    }

    /// Updates a document's metadata.
    pub async fn update(&self, document_id: Uuid, update: &DocumentUpdate) -> Result<Document> {
        let body = serde_json::to_value(update)
            .map_err(|e| ApiError::Internal(format!("Failed to encode update: {}", e)))?;

        let result = self
            .transport
            .patch(&format!("/documentos/{}", document_id), Some(body))
            .await?;

        if !result.success {
            return Err(result.as_error());
        }

        result.decode()
    }

    /// Deletes a document.
    pub async fn delete(&self, document_id: Uuid) -> Result<()> {
        let result = self
            .transport
            .delete(&format!("/documentos/{}", document_id))
            .await?;

        if !result.success {
            return Err(result.as_error());
        }

        tracing::info!("🗑️ Document deleted: {}", document_id);
        Ok(())
    }

    /// Searches documents by free text, with the same filters as `list`.
    pub async fn search(&self, query: &str, filters: &DocumentFilters) -> Result<Vec<Document>> {
        let mut with_search = filters.clone();
        with_search.search = Some(query.to_string());
        self.list(&with_search, 1, 50).await
    }

    /// Asks the backend to re-verify a document's integrity checksum.
    ///
    /// The comparison runs server-side; the report is lenient about the
    /// exact response shape because older backends return a bare verdict.
    pub async fn verify(&self, document_id: Uuid) -> Result<VerifyReport> {
        tracing::debug!("🔎 Verifying document {}", document_id);
        let result = self
            .transport
            .post(&format!("/documentos/{}/verify", document_id), None)
            .await?;

        if !result.success {
            return Err(result.as_error());
        }

        if let Ok(report) = result.decode::<VerifyReport>() {
            return Ok(report);
        }

        let is_valid = result
            .data
            .as_ref()
            .and_then(|d| d.get("isValid").or_else(|| d.get("success")))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let message = result
            .data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| result.message.clone())
            .unwrap_or_else(|| "Verification completed".to_string());

        Ok(VerifyReport {
            document_id,
            is_valid,
            message,
        })
    }
}

/// Coerces the document listing shapes into one sequence: a bare array,
/// `{documents: [...]}`, or `{data: [...]}`.
fn document_list(data: Option<&Value>) -> Vec<Document> {
    let items = match data {
        Some(Value::Array(items)) => items.as_slice(),
        Some(Value::Object(map)) => match map.get("documents").or_else(|| map.get("data")) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::warn!("🚨 Skipping unreadable document row: {}", e);
                None
            }
        })
        .collect()
}
