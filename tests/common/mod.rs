#![allow(dead_code)]

use async_trait::async_trait;
use http::Method;
use safedocs_client::error::{ApiError, Result};
use safedocs_client::transport::{ApiResult, Transport, UploadPayload};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

/// One request as seen by a fake transport.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub endpoint: String,
    pub body: Option<Value>,
}

fn route(method: &Method, endpoint: &str) -> String {
    format!("{} {}", method, endpoint)
}

/// In-memory transport: canned envelopes per route, recorded requests.
///
/// Responses are queued per `(method, endpoint)` pair; each request pops
/// one. A route with no canned response yields a clean failure envelope so
/// a missing stub shows up as a test assertion, not a panic.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<HashMap<String, VecDeque<ApiResult>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one canned envelope for a route.
    pub fn respond(&self, method: Method, endpoint: &str, result: ApiResult) {
        self.responses
            .lock()
            .unwrap()
            .entry(route(&method, endpoint))
            .or_default()
            .push_back(result);
    }

    /// Returns every request seen so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns the requests issued against one route.
    pub fn requests_to(&self, method: Method, endpoint: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.endpoint == endpoint)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<ApiResult> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.clone(),
            endpoint: endpoint.to_string(),
            body,
        });

        let canned = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&route(&method, endpoint))
            .and_then(VecDeque::pop_front);

        Ok(canned.unwrap_or_else(|| {
            ApiResult::fail(format!("no canned response for {} {}", method, endpoint), Some(500))
        }))
    }

    async fn upload(&self, endpoint: &str, payload: UploadPayload) -> Result<ApiResult> {
        let body = serde_json::json!({
            "file_name": payload.file_name,
            "bytes_len": payload.bytes.len(),
            "fields": payload.fields,
        });
        self.request(Method::POST, endpoint, Some(body)).await
    }
}

/// A transport for which the server is unreachable: every call fails with a
/// connectivity error before any response exists.
pub struct DownTransport;

#[async_trait]
impl Transport for DownTransport {
    async fn request(
        &self,
        _method: Method,
        _endpoint: &str,
        _body: Option<Value>,
    ) -> Result<ApiResult> {
        Err(ApiError::Connectivity("connection refused".to_string()))
    }

    async fn upload(&self, _endpoint: &str, _payload: UploadPayload) -> Result<ApiResult> {
        Err(ApiError::Connectivity("connection refused".to_string()))
    }
}

/// A transport whose responses are held at a gate until the test releases
/// them, for observing in-flight state.
pub struct GatedTransport {
    started: AtomicUsize,
    gate: Semaphore,
}

impl GatedTransport {
    pub fn new() -> Self {
        Self {
            started: AtomicUsize::new(0),
            gate: Semaphore::new(0),
        }
    }

    /// The number of requests that have reached the gate.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Lets `n` held requests complete.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn request(
        &self,
        _method: Method,
        _endpoint: &str,
        _body: Option<Value>,
    ) -> Result<ApiResult> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| ApiError::Internal("gate closed".to_string()))?;
        permit.forget();

        Ok(ApiResult::ok_message("operation succeeded", Some(200)))
    }

    async fn upload(&self, endpoint: &str, _payload: UploadPayload) -> Result<ApiResult> {
        self.request(Method::POST, endpoint, None).await
    }
}

/// Polls until `predicate` holds or the deadline passes.
pub async fn wait_until(mut predicate: impl FnMut() -> bool) {
    for _ in 0..200 {
        if predicate() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("condition not reached within deadline");
}
