use thiserror::Error;

/// The client's error type.
///
/// Every failure an orchestrator can surface to a caller maps onto exactly
/// one of these variants, so UI code can show a specific message instead of
/// a raw network error.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never reached the server or the server is unreachable.
    #[error("Could not reach the server: {0}")]
    Connectivity(String),

    /// The request exceeded the configured client-side timeout.
    #[error("Request timed out, check your connection")]
    Timeout,

    /// The email/password pair was rejected by the backend.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but its email address has not been confirmed.
    #[error("Please confirm your email address before signing in")]
    EmailNotConfirmed,

    /// The backend rejected the attempt due to rate limiting.
    #[error("Too many attempts, try again later")]
    RateLimited,

    /// The ambient session credential is missing or expired (HTTP 401).
    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// The caller is authenticated but not entitled to the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A precondition failed before any network dispatch.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server replied with a body the client could not interpret.
    #[error("Invalid response format: {0}")]
    MalformedResponse(String),

    /// A server-provided error message, surfaced verbatim.
    #[error("{0}")]
    Api(String),

    /// An internal client error.
    #[error("Internal client error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `ApiError` as the error type.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Returns `true` when the failure is a connectivity problem the user
    /// may resolve by retrying, as opposed to a credential or policy error.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Connectivity(_) | ApiError::Timeout)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            tracing::warn!("⏱️ Request timed out: {}", err);
            return ApiError::Timeout;
        }

        if err.is_connect() || err.is_request() {
            tracing::warn!("🚨 Network request failed: {}", err);
            return ApiError::Connectivity(err.to_string());
        }

        if err.is_decode() {
            return ApiError::MalformedResponse(err.to_string());
        }

        ApiError::Connectivity(err.to_string())
    }
}
