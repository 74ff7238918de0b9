use crate::error::{ApiError, Result};
use crate::models::user::AuthUser;
use crate::session_store::SessionStore;
use crate::transport::Transport;
use crate::validation::auth as validation;
use serde_json::{json, Value};
use std::sync::Arc;

/// The result of a structurally successful login call.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Identity confirmed; a local session was established.
    Authenticated(AuthUser),
    /// Credentials were accepted but the email address is unconfirmed.
    /// No session is established.
    RequiresEmailConfirmation(Option<AuthUser>),
}

/// Sequences authentication calls through the transport and reconciles the
/// server-confirmed identity with the advisory local session.
#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl AuthService {
    /// Creates a new `AuthService`.
    ///
    /// # Arguments
    ///
    /// * `transport` - The shared transport port.
    /// * `session` - The shared session store.
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    /// Authenticates a user.
    ///
    /// On success the server sets the session cookie and the non-secret
    /// profile is cached locally. An unconfirmed email yields
    /// [`LoginOutcome::RequiresEmailConfirmation`] and no session.
    ///
    /// # Arguments
    ///
    /// * `email` - The user's email address.
    /// * `password` - The user's password.
    ///
    /// # Returns
    ///
    /// A `Result` containing the [`LoginOutcome`].
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        validation::validate_email(email)?;
        if password.is_empty() {
            return Err(ApiError::Validation("Password is required".to_string()));
        }

        tracing::debug!("🔐 Sending login for {}", email);
        let result = self
            .transport
            .post(
                "/auth/login",
                Some(json!({ "email": email, "password": password })),
            )
            .await?;

        if result.success {
            if let Some(data) = &result.data {
                let user_value = data.get("user").cloned().unwrap_or(Value::Null);

                if user_value.is_null() {
                    // Registered but never confirmed; the backend withholds
                    // the profile until the email is verified.
                    tracing::debug!("🔐 Login deferred, email confirmation pending");
                    return Ok(LoginOutcome::RequiresEmailConfirmation(None));
                }

                let user: AuthUser = serde_json::from_value(user_value)
                    .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

                if !user.email_confirmed {
                    tracing::debug!("🔐 Email not confirmed for {}", email);
                    return Ok(LoginOutcome::RequiresEmailConfirmation(Some(user)));
                }

                self.session.set_session(&user);
                tracing::info!("✅ User authenticated: {}", user.id);
                return Ok(LoginOutcome::Authenticated(user));
            }
        }

        Err(classify_login_failure(result.error.as_deref()))
    }

    /// Registers a new account.
    ///
    /// Registration never establishes a session: the user must confirm
    /// their email first, then log in. This is policy, not an accident of
    /// the backend contract.
    ///
    /// # Arguments
    ///
    /// * `email` - The new account's email address.
    /// * `password` - The new account's password.
    /// * `name` - The user's full name.
    /// * `username` - The user's username.
    ///
    /// # Returns
    ///
    /// A `Result` containing the registered `AuthUser`.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        username: &str,
    ) -> Result<AuthUser> {
        validation::validate_email(email)?;
        validation::validate_password(password)?;
        validation::validate_username(username)?;

        tracing::debug!("🔐 Registering {}", username);
        let result = self
            .transport
            .post(
                "/auth/register",
                Some(json!({
                    "email": email,
                    "password": password,
                    "name": name,
                    "username": username,
                })),
            )
            .await?;

        if result.success {
            if let Some(user_value) = result.data.as_ref().and_then(|d| d.get("user")) {
                let user: AuthUser = serde_json::from_value(user_value.clone())
                    .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
                tracing::info!("✅ User registered: {} (confirmation pending)", user.id);
                return Ok(user);
            }
        }

        Err(result
            .error
            .as_deref()
            .map(|e| classify_login_failure(Some(e)))
            .unwrap_or_else(|| ApiError::Api("Registration failed".to_string())))
    }

    /// Logs out.
    ///
    /// The backend call is best-effort: a failure is logged, never
    /// surfaced. The local session is cleared unconditionally afterward.
    pub async fn logout(&self) -> Result<()> {
        match self.transport.post("/auth/logout", None).await {
            Ok(result) if !result.success => {
                tracing::warn!(
                    "🚪 Backend logout failed, clearing local session anyway: {:?}",
                    result.error
                );
            }
            Err(e) => {
                tracing::warn!("🚪 Backend logout failed, clearing local session anyway: {}", e);
            }
            Ok(_) => {}
        }

        self.session.clear_session();
        tracing::info!("🚪 Logged out");
        Ok(())
    }

    /// Round-trips to `/auth/me` and returns the confirmed identity.
    ///
    /// This is the only authoritative "am I logged in" check; the session
    /// store alone is a hint. On success the local cache is refreshed; on
    /// any failure (including 401) the local session is cleared and `None`
    /// is returned. Never returns an error.
    pub async fn current_user(&self) -> Option<AuthUser> {
        match self.transport.get("/auth/me").await {
            Ok(result) if result.success => match &result.data {
                Some(data) => match serde_json::from_value::<AuthUser>(data.clone()) {
                    Ok(user) => {
                        self.session.set_session(&user);
                        Some(user)
                    }
                    Err(e) => {
                        tracing::warn!("🚨 Unreadable /auth/me payload: {}", e);
                        self.session.clear_session();
                        None
                    }
                },
                None => {
                    self.session.clear_session();
                    None
                }
            },
            Ok(result) => {
                tracing::debug!("🔐 /auth/me rejected: {:?}", result.error);
                self.session.clear_session();
                None
            }
            Err(e) => {
                tracing::warn!("🚨 /auth/me unreachable: {}", e);
                self.session.clear_session();
                None
            }
        }
    }

    /// Asks the backend to rotate the session credential.
    ///
    /// # Returns
    ///
    /// A `Result` containing the refreshed `AuthUser`.
    pub async fn refresh_session(&self) -> Result<AuthUser> {
        let result = match self.transport.post("/auth/refresh", None).await {
            Ok(result) => result,
            Err(e) => {
                self.session.clear_session();
                return Err(e);
            }
        };

        if result.success {
            if let Some(data) = &result.data {
                let user: AuthUser = serde_json::from_value(data.clone())
                    .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
                self.session.set_session(&user);
                tracing::debug!("🔄 Session refreshed for {}", user.id);
                return Ok(user);
            }
        }

        Err(result.as_error())
    }

    /// Convenience wrapper: `true` iff [`Self::current_user`] confirms an
    /// identity.
    pub async fn is_authenticated(&self) -> bool {
        self.current_user().await.is_some()
    }
}

/// Classifies a server-side login failure into a user-facing error.
fn classify_login_failure(error: Option<&str>) -> ApiError {
    let Some(raw) = error else {
        // Structural failure with no error field at all.
        return ApiError::InvalidCredentials;
    };

    let lowered = raw.to_lowercase();
    // The backend answers in English or Spanish depending on its locale.
    if lowered.contains("invalid login credentials")
        || lowered.contains("invalid credentials")
        || lowered.contains("credenciales inválidas")
    {
        ApiError::InvalidCredentials
    } else if lowered.contains("email not confirmed") {
        ApiError::EmailNotConfirmed
    } else if lowered.contains("too many requests") {
        ApiError::RateLimited
    } else {
        ApiError::Api(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_server_phrases_map_to_specific_errors() {
        assert!(matches!(
            classify_login_failure(Some("Invalid login credentials")),
            ApiError::InvalidCredentials
        ));
        assert!(matches!(
            classify_login_failure(Some("Credenciales inválidas")),
            ApiError::InvalidCredentials
        ));
        assert!(matches!(
            classify_login_failure(Some("Email not confirmed")),
            ApiError::EmailNotConfirmed
        ));
        assert!(matches!(
            classify_login_failure(Some("Too many requests, slow down")),
            ApiError::RateLimited
        ));
    }

    #[test]
    fn unknown_phrases_surface_verbatim() {
        assert!(matches!(
            classify_login_failure(Some("account disabled by admin")),
            ApiError::Api(msg) if msg == "account disabled by admin"
        ));
    }

    #[test]
    fn missing_error_field_defaults_to_invalid_credentials() {
        assert!(matches!(
            classify_login_failure(None),
            ApiError::InvalidCredentials
        ));
    }
}
