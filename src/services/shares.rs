use crate::error::{ApiError, Result};
use crate::models::share::{
    CreateShareRequest, DocumentShare, ShareCreated, SharedDocument, SharedWithMe,
};
use crate::models::user::UserForSharing;
use crate::transport::Transport;
use crate::validation::share::validate_share_request;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

/// Minimum query length before the user search hits the network.
const MIN_SEARCH_CHARS: usize = 3;

/// Orchestrates the document-sharing workflow: create, list both sides of
/// the asymmetric queries, resolve a token, and revoke.
///
/// Keeps an advisory local copy of the owner-side listing ("my shared") and
/// an in-flight set of revokes keyed by share id, so the UI can disable one
/// row's action without blocking unrelated rows.
#[derive(Clone)]
pub struct ShareService {
    transport: Arc<dyn Transport>,
    my_shared: Arc<RwLock<Vec<DocumentShare>>>,
    revoking: Arc<Mutex<HashSet<Uuid>>>,
}

impl ShareService {
    /// Creates a new `ShareService`.
    ///
    /// # Arguments
    ///
    /// * `transport` - The shared transport port.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            my_shared: Arc::new(RwLock::new(Vec::new())),
            revoking: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Shares a document with another user.
    ///
    /// Preconditions (target user present, grantable permission level, sane
    /// expiry) are validated locally and fail without a network call. On
    /// success the owner-side listing is refetched, so a subsequent
    /// [`Self::cached_my_shared`] already reflects the new share.
    ///
    /// # Arguments
    ///
    /// * `request` - The share-creation request.
    ///
    /// # Returns
    ///
    /// A `Result` containing the new share and its capability token.
    pub async fn create(&self, request: &CreateShareRequest) -> Result<ShareCreated> {
        validate_share_request(request)?;

        let body = serde_json::to_value(request)
            .map_err(|e| ApiError::Internal(format!("Failed to encode share request: {}", e)))?;

        tracing::debug!(
            "🔗 Sharing document {} ({} for {}h)",
            request.document_id,
            request.permission_level.as_str(),
            request.expires_in_hours
        );
        let result = self
            .transport
            .post("/documentos/simple-share", Some(body))
            .await?;

        if !result.success {
            return Err(result.as_error());
        }

        let created = match &result.data {
            // Documented response shape: { success, message, share, share_token }.
            Some(Value::Object(map)) if map.contains_key("share") => {
                serde_json::from_value::<ShareCreated>(Value::Object(map.clone()))
                    .map_err(|e| ApiError::MalformedResponse(e.to_string()))?
            }
            // Some backend versions return the bare share record.
            Some(value) => {
                let share: DocumentShare = serde_json::from_value(value.clone())
                    .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
                let share_token = share.share_token.clone();
                ShareCreated { share, share_token }
            }
            None => {
                return Err(ApiError::MalformedResponse(
                    "share response carried no data".to_string(),
                ));
            }
        };

        tracing::info!("✅ Document shared: share {}", created.share.id);

        // Read-after-write consistency is client-enforced via refetch.
        if let Err(e) = self.my_shared().await {
            tracing::warn!("🚨 Could not refresh my-shared after create: {}", e);
        }

        Ok(created)
    }

    /// Lists documents shared with the current user.
    ///
    /// Tolerates all server list shapes; an empty or unexpected payload is
    /// an empty list, never an error.
    pub async fn shared_with_me(&self) -> Result<Vec<SharedWithMe>> {
        let result = self.transport.get("/documentos/shared-with-me").await?;

        if !result.success {
            return Err(result.as_error());
        }

        Ok(coerce_list(result.data.as_ref(), "data"))
    }

    /// Lists shares created by the current user and refreshes the advisory
    /// local copy.
    pub async fn my_shared(&self) -> Result<Vec<DocumentShare>> {
        let result = self.transport.get("/documentos/my-shared").await?;

        if !result.success {
            return Err(result.as_error());
        }

        let shares: Vec<DocumentShare> = coerce_list(result.data.as_ref(), "data");
        *self.my_shared.write().unwrap() = shares.clone();
        Ok(shares)
    }

    /// Returns the advisory local copy of the owner-side listing.
    ///
    /// Advisory until the next refetch; [`Self::my_shared`] is the
    /// authoritative read.
    pub fn cached_my_shared(&self) -> Vec<DocumentShare> {
        self.my_shared.read().unwrap().clone()
    }

    /// Resolves a share token into its share and document bundle.
    ///
    /// Expiry is not enforced here: the caller checks the derived
    /// `is_expired` before using `signed_file_url`, and the backend remains
    /// the authority (it may refuse an expired token outright).
    ///
    /// # Arguments
    ///
    /// * `share_token` - The opaque capability string.
    pub async fn resolve(&self, share_token: &str) -> Result<SharedDocument> {
        let endpoint = format!(
            "/documentos/shared/{}",
            urlencoding::encode(share_token)
        );
        let result = self.transport.get(&endpoint).await?;

        if !result.success {
            return Err(result.as_error());
        }

        result.decode()
    }

    /// Revokes a share. One-way; there is no re-activation path.
    ///
    /// While the call is outstanding the share id sits in the in-flight
    /// set; a concurrent revoke for the same id is rejected locally, while
    /// revokes for other ids proceed independently. On success the share is
    /// removed from the advisory local listing immediately; on failure the
    /// listing is left untouched.
    ///
    /// # Arguments
    ///
    /// * `share_id` - The share to revoke.
    pub async fn revoke(&self, share_id: Uuid) -> Result<()> {
        {
            let mut revoking = self.revoking.lock().unwrap();
            if !revoking.insert(share_id) {
                return Err(ApiError::Validation(format!(
                    "A revoke for share {} is already in progress",
                    share_id
                )));
            }
        }

        tracing::debug!("🔗 Revoking share {}", share_id);
        let outcome = self
            .transport
            .delete(&format!("/documentos/shares/{}/revoke", share_id))
            .await;

        // Membership changes are synchronous relative to the call that
        // produced them, on success and failure alike.
        self.revoking.lock().unwrap().remove(&share_id);

        let result = outcome?;
        if !result.success {
            return Err(result.as_error());
        }

        // Optimistic local patch; advisory until the next refetch.
        self.my_shared
            .write()
            .unwrap()
            .retain(|share| share.id != share_id);

        tracing::info!("✅ Share revoked: {}", share_id);
        Ok(())
    }

    /// Returns `true` while a revoke for `share_id` is outstanding.
    pub fn is_revoking(&self, share_id: Uuid) -> bool {
        self.revoking.lock().unwrap().contains(&share_id)
    }

    /// Searches users to share a document with.
    ///
    /// Queries shorter than three characters return an empty list without
    /// touching the network.
    ///
    /// # Arguments
    ///
    /// * `query` - The partial name or email to search for.
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserForSharing>> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_CHARS {
            return Ok(Vec::new());
        }

        let endpoint = format!("/share/search-users?q={}", urlencoding::encode(query));
        let result = self.transport.get(&endpoint).await?;

        if !result.success {
            return Err(result.as_error());
        }

        Ok(coerce_list(result.data.as_ref(), "users"))
    }
}

/// Coerces the three observed server list shapes into one sequence:
/// a bare array, an object wrapping the array under `key`, or anything
/// else (treated as an empty list). Rows that fail to parse are skipped
/// with a warning instead of poisoning the whole listing.
fn coerce_list<T: DeserializeOwned>(data: Option<&Value>, key: &str) -> Vec<T> {
    let items = match data {
        Some(Value::Array(items)) => items.as_slice(),
        Some(Value::Object(map)) => match map.get(key) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("🚨 Skipping unreadable list row: {}", e);
                None
            }
        })
        .collect()
}
