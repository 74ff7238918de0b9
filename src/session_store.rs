use crate::models::user::{AuthUser, SessionUser};
use std::collections::HashMap;
use std::sync::RwLock;

/// The storage key for the cached user record.
const USER_KEY: &str = "safedocs_user_info";
/// The storage key for the session-active flag.
const SESSION_ACTIVE_KEY: &str = "safedocs_session_active";

/// Credential-like keys left behind by an older design that kept tokens in
/// script-accessible storage. Swept once when the transport is constructed.
const LEGACY_CREDENTIAL_KEYS: &[&str] = &[
    "access_token",
    "refresh_token",
    "expires_at",
    "expires_in",
    "token_type",
    "user",
    "safedocs_access_token",
    "safedocs_refresh_token",
    "safedocs_expires_at",
    "sb-access-token",
    "sb-refresh-token",
    "supabase.auth.token",
];

/// The UI's belief about "who is logged in".
///
/// Holds only non-secret profile fields plus an active-flag. This is a hint
/// for optimistic rendering; it must never gate a privileged action. The
/// authoritative check is always a round trip through the auth orchestrator.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    /// Creates a new, empty `SessionStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the non-secret subset of `user` and marks the session active.
    ///
    /// # Arguments
    ///
    /// * `user` - The server-confirmed identity to cache.
    pub fn set_session(&self, user: &AuthUser) {
        let safe_user = SessionUser::from(user);

        match serde_json::to_string(&safe_user) {
            Ok(serialized) => {
                let mut entries = self.entries.write().unwrap();
                entries.insert(USER_KEY.to_string(), serialized);
                entries.insert(SESSION_ACTIVE_KEY.to_string(), "true".to_string());
                tracing::debug!("🔐 User session stored (no tokens)");
            }
            Err(e) => {
                tracing::error!("❌ Failed to serialize session user: {}", e);
            }
        }
    }

    /// Returns `true` iff both the active-flag and the user record are set.
    ///
    /// Hint only; see the type-level docs.
    pub fn has_active_session(&self) -> bool {
        let entries = self.entries.read().unwrap();
        entries.get(SESSION_ACTIVE_KEY).map(String::as_str) == Some("true")
            && entries.contains_key(USER_KEY)
    }

    /// Returns the cached user record, or `None` when absent or unreadable.
    pub fn get_user(&self) -> Option<SessionUser> {
        let entries = self.entries.read().unwrap();
        let raw = entries.get(USER_KEY)?;

        match serde_json::from_str(raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::error!("❌ Failed to read cached session user: {}", e);
                None
            }
        }
    }

    /// Unconditionally removes the user record and the active-flag.
    ///
    /// Called on logout and on any detected 401.
    pub fn clear_session(&self) {
        let mut entries = self.entries.write().unwrap();
        entries.remove(USER_KEY);
        entries.remove(SESSION_ACTIVE_KEY);
        tracing::debug!("🔐 Local session cleared");
    }

    /// Inserts a raw advisory entry. Exists for UI-state odds and ends and
    /// for exercising the legacy-credential sweep.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().unwrap().insert(key.into(), value.into());
    }

    /// Returns a raw advisory entry.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    /// Removes credential-like keys left behind by the old token-in-storage
    /// design. Idempotent; returns the number of keys removed.
    pub fn purge_legacy_credentials(&self) -> usize {
        let mut entries = self.entries.write().unwrap();
        let mut removed = 0;

        for key in LEGACY_CREDENTIAL_KEYS {
            if entries.remove(*key).is_some() {
                tracing::warn!("🚨 Removed insecure credential key \"{}\" from local storage", key);
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!("🧹 Legacy credential sweep removed {} key(s)", removed);
        }

        removed
    }
}
