use crate::error::{ApiError, Result};
use crate::models::share::CreateShareRequest;

/// The longest expiry window a share can be created with, in hours.
const MAX_EXPIRY_HOURS: u32 = 24 * 365;

/// Validates a share-creation request before any network dispatch.
///
/// # Arguments
///
/// * `request` - The share-creation request to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the request may be sent.
pub fn validate_share_request(request: &CreateShareRequest) -> Result<()> {
    if request.shared_with_user_id.is_none() {
        return Err(ApiError::Validation(
            "Select a user to share the document with".to_string(),
        ));
    }

    if !request.permission_level.grantable() {
        return Err(ApiError::Validation(format!(
            "Permission level \"{}\" cannot be granted; use read or comment",
            request.permission_level.as_str()
        )));
    }

    if request.expires_in_hours == 0 {
        return Err(ApiError::Validation(
            "Expiry must be at least one hour".to_string(),
        ));
    }

    if request.expires_in_hours > MAX_EXPIRY_HOURS {
        return Err(ApiError::Validation(
            "Expiry cannot exceed one year".to_string(),
        ));
    }

    Ok(())
}
