use crate::error::{ApiError, Result};

/// Validates an email address.
///
/// # Arguments
///
/// * `email` - The email address to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the email is plausible.
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(ApiError::Validation("Email is required".to_string()));
    }

    if email.len() > 255 {
        return Err(ApiError::Validation(
            "Email must be at most 255 characters".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ApiError::Validation(
            "Email must contain an @ sign".to_string(),
        ));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ApiError::Validation(
            "Email address is not valid".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(ApiError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates a username.
///
/// # Arguments
///
/// * `username` - The username to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the username is valid.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.len() < 3 {
        return Err(ApiError::Validation(
            "Username must be at least 3 characters long".to_string(),
        ));
    }

    if username.len() > 255 {
        return Err(ApiError::Validation(
            "Username must be at most 255 characters".to_string(),
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ApiError::Validation(
            "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
        ));
    }

    Ok(())
}
