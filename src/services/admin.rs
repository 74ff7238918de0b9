use crate::error::{ApiError, Result};
use crate::models::user::{AdminUser, UserRole};
use crate::transport::Transport;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Orchestrates the admin user-role console.
///
/// Authorization is enforced server-side: a non-admin caller gets a 403,
/// surfaced as [`ApiError::PermissionDenied`] with no local state change.
#[derive(Clone)]
pub struct AdminService {
    transport: Arc<dyn Transport>,
}

impl AdminService {
    /// Creates a new `AdminService`.
    ///
    /// # Arguments
    ///
    /// * `transport` - The shared transport port.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Lists all users.
    ///
    /// Tolerates both observed response shapes: `{users: [...]}` and a
    /// bare array.
    pub async fn list_users(&self) -> Result<Vec<AdminUser>> {
        let result = self.transport.get("/auth/admin/users").await?;

        if !result.success {
            return Err(result.as_error());
        }

        let items = match result.data.as_ref() {
            Some(Value::Array(items)) => items.as_slice(),
            Some(Value::Object(map)) => match map.get("users") {
                Some(Value::Array(items)) => items.as_slice(),
                _ => {
                    return Err(ApiError::MalformedResponse(
                        "user listing carried no rows".to_string(),
                    ));
                }
            },
            _ => {
                return Err(ApiError::MalformedResponse(
                    "user listing carried no rows".to_string(),
                ));
            }
        };

        let users: Vec<AdminUser> = items
            .iter()
            .filter_map(|item| match serde_json::from_value(item.clone()) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("🚨 Skipping unreadable user row: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("👥 Listed {} user(s)", users.len());
        Ok(users)
    }

    /// Changes a user's role.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user whose role changes.
    /// * `role` - The new role.
    pub async fn update_role(&self, user_id: Uuid, role: UserRole) -> Result<()> {
        let result = self
            .transport
            .patch(
                &format!("/auth/admin/users/{}/role", user_id),
                Some(json!({ "role": role.as_str() })),
            )
            .await?;

        if !result.success {
            return Err(result.as_error());
        }

        tracing::info!("✅ Role of {} changed to {}", user_id, role.as_str());
        Ok(())
    }

    /// Deletes a user account.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let result = self
            .transport
            .delete(&format!("/auth/admin/users/{}", user_id))
            .await?;

        if !result.success {
            return Err(result.as_error());
        }

        tracing::info!("🗑️ User deleted: {}", user_id);
        Ok(())
    }
}
