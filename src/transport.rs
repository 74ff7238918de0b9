use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::session_store::SessionStore;
use async_trait::async_trait;
use http::Method;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// The message synthesized for success responses with an empty body.
const EMPTY_BODY_MESSAGE: &str = "operation succeeded";

/// The normalized envelope every network call resolves to.
///
/// Regardless of the raw server shape (bare array, `{success,data}` object,
/// bare object, empty body), after normalization exactly one of
/// "success with data" or "failure with error" holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResult {
    /// Whether the call succeeded.
    pub success: bool,
    /// The payload, when the server provided one.
    pub data: Option<Value>,
    /// The failure description, when the call failed.
    pub error: Option<String>,
    /// An informational message, when the server provided one.
    pub message: Option<String>,
    /// The HTTP status the envelope was derived from, when known.
    pub status: Option<u16>,
}

impl ApiResult {
    /// Creates a success envelope carrying `data`.
    pub fn ok_data(data: Value, status: Option<u16>) -> Self {
        Self {
            success: true,
            data: Some(data),
            status,
            ..Default::default()
        }
    }

    /// Creates a success envelope carrying only a message.
    pub fn ok_message(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            status,
            ..Default::default()
        }
    }

    /// Creates a failure envelope carrying `error`.
    pub fn fail(error: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            status,
            ..Default::default()
        }
    }

    /// Returns `true` when the envelope came from an HTTP 401, meaning the
    /// ambient credential is missing or expired.
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(StatusCode::UNAUTHORIZED.as_u16())
    }

    /// Deserializes the payload into `T`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the decoded payload; a missing or mismatched
    /// payload is a [`ApiError::MalformedResponse`].
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let data = self
            .data
            .clone()
            .ok_or_else(|| ApiError::MalformedResponse("response carried no data".to_string()))?;

        serde_json::from_value(data).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    /// Converts a failure envelope into the matching [`ApiError`].
    ///
    /// 401 becomes [`ApiError::SessionExpired`], 403 becomes
    /// [`ApiError::PermissionDenied`], anything else surfaces the server's
    /// error string verbatim.
    pub fn as_error(&self) -> ApiError {
        let message = self
            .error
            .clone()
            .unwrap_or_else(|| "request failed".to_string());

        match self.status {
            Some(401) => ApiError::SessionExpired,
            Some(403) => ApiError::PermissionDenied(message),
            _ => ApiError::Api(message),
        }
    }
}

/// Extracts a server-provided error string from a parsed body.
fn error_field(value: &Value) -> Option<String> {
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Normalizes a raw HTTP response into an [`ApiResult`].
///
/// The steps run in a fixed order:
/// 1. Non-success status: failure with the server's error/message field,
///    falling back to the status line.
/// 2. Empty body on a success status: synthesized success with a message.
/// 3. Unparsable body on a success status: synthesized bare success.
/// 4. Array body: wrapped as success-with-data.
/// 5. Object body already carrying `success`/`data`/`error`: passed through.
/// 6. Any other body: treated wholesale as the payload.
pub fn normalize_response(status: StatusCode, body: &str) -> ApiResult {
    let trimmed = body.trim();

    if !status.is_success() {
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("🔐 Ambient session credential missing or expired (401)");
        }

        let fallback = || {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown error")
            )
        };

        let error = if trimmed.is_empty() {
            fallback()
        } else {
            match serde_json::from_str::<Value>(trimmed) {
                Ok(parsed) => error_field(&parsed).unwrap_or_else(fallback),
                Err(_) => "invalid response format".to_string(),
            }
        };

        return ApiResult::fail(error, Some(status.as_u16()));
    }

    if trimmed.is_empty() {
        // Common on successful DELETEs.
        return ApiResult::ok_message(EMPTY_BODY_MESSAGE, Some(status.as_u16()));
    }

    let parsed: Value = match serde_json::from_str(trimmed) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("🚨 Unparsable body on a success status, assuming success: {}", e);
            return ApiResult {
                success: true,
                status: Some(status.as_u16()),
                ..Default::default()
            };
        }
    };

    match parsed {
        Value::Array(_) => ApiResult::ok_data(parsed, Some(status.as_u16())),
        Value::Object(ref map)
            if map.contains_key("success")
                || map.contains_key("data")
                || map.contains_key("error") =>
        {
            let success = map
                .get("success")
                .and_then(Value::as_bool)
                .unwrap_or(true);

            ApiResult {
                success,
                // A failure never carries a payload, even when the server
                // sent one alongside the error.
                data: if success { map.get("data").cloned() } else { None },
                error: map.get("error").and_then(Value::as_str).map(str::to_string),
                message: map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                status: Some(status.as_u16()),
            }
        }
        other => ApiResult::ok_data(other, Some(status.as_u16())),
    }
}

/// A file plus form fields for a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// The file name sent with the multipart part.
    pub file_name: String,
    /// The raw file content.
    pub bytes: Vec<u8>,
    /// Plain-text form fields sent alongside the file.
    pub fields: Vec<(String, String)>,
}

/// The transport port: the single choke point for every HTTP call.
///
/// Orchestrators depend on this trait, never on a concrete HTTP client, so
/// tests can substitute an in-memory implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one HTTP call and returns the normalized envelope.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method.
    /// * `endpoint` - A path relative to the configured base URL, or an
    ///   absolute URL.
    /// * `body` - An optional JSON body.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<ApiResult>;

    /// Performs one multipart upload and returns the normalized envelope.
    async fn upload(&self, endpoint: &str, payload: UploadPayload) -> Result<ApiResult>;

    /// Convenience wrapper for GET.
    async fn get(&self, endpoint: &str) -> Result<ApiResult> {
        self.request(Method::GET, endpoint, None).await
    }

    /// Convenience wrapper for POST.
    async fn post(&self, endpoint: &str, body: Option<Value>) -> Result<ApiResult> {
        self.request(Method::POST, endpoint, body).await
    }

    /// Convenience wrapper for PATCH.
    async fn patch(&self, endpoint: &str, body: Option<Value>) -> Result<ApiResult> {
        self.request(Method::PATCH, endpoint, body).await
    }

    /// Convenience wrapper for DELETE.
    async fn delete(&self, endpoint: &str) -> Result<ApiResult> {
        self.request(Method::DELETE, endpoint, None).await
    }
}

/// The production transport: reqwest with an ambient cookie jar.
///
/// The session credential is a cookie managed by the jar; application code
/// never reads or writes it. Callers therefore never pass a token.
pub struct HttpTransport {
    config: ApiConfig,
    http: reqwest::Client,
    session: Arc<SessionStore>,
}

impl HttpTransport {
    /// Creates a new `HttpTransport`.
    ///
    /// Applies the configured hard timeout to every request and runs the
    /// one-time sweep of legacy credential keys from the advisory store.
    ///
    /// # Arguments
    ///
    /// * `config` - The client configuration.
    /// * `session` - The shared session store.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `HttpTransport`.
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        session.purge_legacy_credentials();
        tracing::info!("✅ HTTP transport initialized for {}", config.base_url);

        Ok(Self {
            config: config.clone(),
            http,
            session,
        })
    }

    /// Applies the 401 side effect: any unauthorized response clears the
    /// advisory local session so the UI stops claiming the user is signed in.
    fn observe(&self, result: ApiResult) -> ApiResult {
        if result.is_unauthorized() {
            self.session.clear_session();
        }
        result
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<ApiResult> {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!("🌐 {} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;

        Ok(self.observe(normalize_response(status, &text)))
    }

    async fn upload(&self, endpoint: &str, payload: UploadPayload) -> Result<ApiResult> {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!("🌐 POST (multipart) {}", url);

        let mut form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(payload.bytes).file_name(payload.file_name),
        );
        for (key, value) in payload.fields {
            form = form.text(key, value);
        }

        // No explicit Content-Type: reqwest sets the multipart boundary.
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;

        Ok(self.observe(normalize_response(status, &text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_is_wrapped_as_data() {
        let result = normalize_response(StatusCode::OK, r#"[{"id": 1}, {"id": 2}]"#);

        assert!(result.success);
        assert_eq!(result.data, Some(json!([{"id": 1}, {"id": 2}])));
        assert!(result.error.is_none());
    }

    #[test]
    fn envelope_shaped_object_passes_through() {
        let result = normalize_response(
            StatusCode::OK,
            r#"{"success": true, "data": {"id": 7}, "message": "hello"}"#,
        );

        assert!(result.success);
        assert_eq!(result.data, Some(json!({"id": 7})));
        assert_eq!(result.message.as_deref(), Some("hello"));
    }

    #[test]
    fn envelope_with_failure_flag_is_a_failure() {
        let result =
            normalize_response(StatusCode::OK, r#"{"success": false, "error": "nope"}"#);

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("nope"));
    }

    #[test]
    fn failure_envelope_drops_any_payload_it_carried() {
        let result = normalize_response(
            StatusCode::OK,
            r#"{"success": false, "error": "quota exceeded", "data": {"used": 99}}"#,
        );

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("quota exceeded"));
        assert!(result.data.is_none());
    }

    #[test]
    fn plain_object_becomes_the_payload() {
        let result = normalize_response(StatusCode::OK, r#"{"id": 9, "title": "doc"}"#);

        assert!(result.success);
        assert_eq!(result.data, Some(json!({"id": 9, "title": "doc"})));
    }

    #[test]
    fn empty_body_synthesizes_success_with_message() {
        let result = normalize_response(StatusCode::OK, "");

        assert!(result.success);
        assert!(result.data.is_none());
        assert_eq!(result.message.as_deref(), Some("operation succeeded"));
    }

    #[test]
    fn unparsable_body_on_success_status_is_success() {
        let result = normalize_response(StatusCode::OK, "<!doctype html>");

        assert!(result.success);
        assert!(result.error.is_none());
    }

    #[test]
    fn unparsable_body_on_error_status_is_invalid_format() {
        let result = normalize_response(StatusCode::BAD_GATEWAY, "<!doctype html>");

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("invalid response format"));
    }

    #[test]
    fn error_status_prefers_server_error_field() {
        let result = normalize_response(
            StatusCode::BAD_REQUEST,
            r#"{"error": "documentId is required"}"#,
        );

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("documentId is required"));
        assert_eq!(result.status, Some(400));
    }

    #[test]
    fn error_status_falls_back_to_message_field_then_status_line() {
        let with_message =
            normalize_response(StatusCode::CONFLICT, r#"{"message": "already shared"}"#);
        assert_eq!(with_message.error.as_deref(), Some("already shared"));

        let bare = normalize_response(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(
            bare.error.as_deref(),
            Some("HTTP 500: Internal Server Error")
        );
    }

    #[test]
    fn unauthorized_is_a_failure_not_a_panic() {
        let result = normalize_response(StatusCode::UNAUTHORIZED, r#"{"error": "expired"}"#);

        assert!(!result.success);
        assert!(result.is_unauthorized());
        assert!(matches!(result.as_error(), ApiError::SessionExpired));
    }

    #[test]
    fn forbidden_maps_to_permission_denied() {
        let result = normalize_response(StatusCode::FORBIDDEN, r#"{"error": "admins only"}"#);

        assert!(matches!(
            result.as_error(),
            ApiError::PermissionDenied(msg) if msg == "admins only"
        ));
    }

    #[test]
    fn every_raw_shape_yields_exactly_one_canonical_shape() {
        let bodies = [
            (StatusCode::OK, r#"[1, 2, 3]"#),
            (StatusCode::OK, r#"{"success": true, "data": [1]}"#),
            (StatusCode::OK, r#"{"success": false, "error": "x", "data": [1]}"#),
            (StatusCode::OK, r#"{"plain": "object"}"#),
            (StatusCode::OK, ""),
            (StatusCode::OK, "not-json"),
            (StatusCode::NOT_FOUND, r#"{"error": "missing"}"#),
            (StatusCode::NOT_FOUND, ""),
            (StatusCode::BAD_GATEWAY, "not-json"),
        ];

        for (status, body) in bodies {
            let result = normalize_response(status, body);
            // Success never carries an error; failure always carries one.
            if result.success {
                assert!(result.error.is_none(), "body {:?}", body);
            } else {
                assert!(result.error.is_some(), "body {:?}", body);
                assert!(result.data.is_none(), "body {:?}", body);
            }
        }
    }

    #[test]
    fn decode_rejects_missing_payload() {
        let result = ApiResult::ok_message("done", Some(200));
        let decoded: Result<Vec<i32>> = result.decode();
        assert!(matches!(decoded, Err(ApiError::MalformedResponse(_))));
    }

    #[test]
    fn decode_reads_typed_payload() {
        let result = ApiResult::ok_data(json!({"id": 4, "title": "x"}), Some(200));

        #[derive(serde::Deserialize)]
        struct Row {
            id: i32,
            title: String,
        }

        let row: Row = result.decode().unwrap();
        assert_eq!(row.id, 4);
        assert_eq!(row.title, "x");
    }
}
