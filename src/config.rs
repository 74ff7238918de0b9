use anyhow::{Context, Result};
use std::env;

/// Default backend base URL when `SAFEDOCS_BASE_URL` is not set.
const DEFAULT_BASE_URL: &str = "http://localhost:3001";
/// Default client-side request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// The client's configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// The base URL of the SafeDocs backend, without a trailing slash.
    pub base_url: String,
    /// The hard client-side timeout applied to every request, in seconds.
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Creates a new `ApiConfig` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ApiConfig`.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("SAFEDOCS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = env::var("SAFEDOCS_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .context("Invalid SAFEDOCS_TIMEOUT_SECS")?;

        Ok(Self::new(base_url, timeout_secs))
    }

    /// Creates a new `ApiConfig` from explicit values.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The backend base URL; a trailing slash is removed.
    /// * `timeout_secs` - The client-side request timeout in seconds.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            timeout_secs,
        }
    }

    /// Builds a full URL for an endpoint path.
    ///
    /// Absolute URLs are passed through untouched; relative endpoints are
    /// joined to the base URL with exactly one slash between them.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }

        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}
