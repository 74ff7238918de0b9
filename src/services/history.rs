use crate::error::{ApiError, Result};
use crate::models::history::{CreateHistoryEntry, HistoryEntry, HistoryPage};
use crate::transport::Transport;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Default page size for the activity listing.
const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Orchestrates the activity-history feed behind the dashboard's History
/// page.
///
/// The backend is the system of record; this service only reads pages and
/// appends entries. Nothing is cached locally since the feed is append-only
/// and every page read is cheap.
#[derive(Clone)]
pub struct HistoryService {
    transport: Arc<dyn Transport>,
}

impl HistoryService {
    /// Creates a new `HistoryService`.
    ///
    /// # Arguments
    ///
    /// * `transport` - The shared transport port.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Lists one page of the activity history.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Restrict to one user's activity, when present.
    /// * `page` - 1-based page number.
    /// * `limit` - Page size; 0 falls back to the default of 20.
    ///
    /// # Returns
    ///
    /// A `Result` containing the requested [`HistoryPage`].
    pub async fn list(
        &self,
        user_id: Option<Uuid>,
        page: u32,
        limit: u32,
    ) -> Result<HistoryPage> {
        let limit = if limit == 0 { DEFAULT_PAGE_LIMIT } else { limit };
        let mut params = vec![format!("page={}", page), format!("limit={}", limit)];
        if let Some(user_id) = user_id {
            params.push(format!("userId={}", user_id));
        }

        let endpoint = format!("/history?{}", params.join("&"));
        tracing::debug!("📊 Listing activity history: {}", endpoint);
        let result = self.transport.get(&endpoint).await?;

        if !result.success {
            return Err(result.as_error());
        }

        // Documented shape is a full page object; older backends return the
        // bare entries array, which gets wrapped into a single page.
        match result.data.as_ref() {
            Some(Value::Array(_)) => {
                let entries: Vec<HistoryEntry> = result.decode()?;
                let total = entries.len() as u64;
                Ok(HistoryPage {
                    entries,
                    total,
                    page,
                    limit,
                })
            }
            _ => result.decode(),
        }
    }

    /// Records one activity entry.
    ///
    /// # Arguments
    ///
    /// * `entry` - The activity to record.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored entry, including its id and
    /// server-side timestamp.
    pub async fn record(&self, entry: &CreateHistoryEntry) -> Result<HistoryEntry> {
        let body = serde_json::to_value(entry)
            .map_err(|e| ApiError::Internal(format!("Failed to encode history entry: {}", e)))?;

        let result = self.transport.post("/history", Some(body)).await?;

        if !result.success {
            return Err(result.as_error());
        }

        let stored: HistoryEntry = result.decode()?;
        tracing::debug!("📊 Activity recorded: {} ({})", stored.id, stored.action.as_str());
        Ok(stored)
    }

    /// Fetches one history entry by id.
    pub async fn get(&self, entry_id: i64) -> Result<HistoryEntry> {
        let result = self
            .transport
            .get(&format!("/history/{}", entry_id))
            .await?;

        if !result.success {
            return Err(result.as_error());
        }

        result.decode()
    }
}
