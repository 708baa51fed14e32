//! HTTP plumbing behind the [`Criteria`] seam.

use crate::criteria::{Criteria, Request};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// A minimal HTTP response: status plus raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON, failing on any non-2xx status first.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        if !self.is_success() {
            return Err(TransportError::Status {
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            });
        }
        serde_json::from_slice(&self.body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response body: {0}")]
    Decode(String),

    #[error("no mock response registered for {path}")]
    NoMockResponse { path: String },
}

/// A real transport backed by reqwest, rooted at a fixed API base URL.
#[derive(Clone)]
pub struct ReqwestTransport {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fbpost/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Absolute URL for a request, query string included.
    pub fn url_for(&self, request: &Request) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = request.path().trim_start_matches('/');
        let query = request.query_string();
        if query.is_empty() {
            format!("{}/{}", base, path)
        } else {
            format!("{}/{}?{}", base, path, query)
        }
    }
}

#[async_trait]
impl Criteria for ReqwestTransport {
    async fn apply(&self, request: Request) -> Result<HttpResponse, TransportError> {
        let url = self.url_for(&request);
        tracing::debug!(path = request.path(), "GET");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| TransportError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Transport(e.without_url().to_string()))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}

// ---------- Test-only mock transport ----------

#[cfg(test)]
use std::collections::{HashMap, VecDeque};
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// In-memory transport keyed by request path. Responses queued for the same
/// path are served in FIFO order.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[cfg(test)]
#[derive(Default)]
struct MockTransportInner {
    routes: HashMap<String, VecDeque<Result<HttpResponse, String>>>,
    requests: Vec<Request>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, path: impl Into<String>, response: HttpResponse) {
        self.push(path.into(), Ok(response));
    }

    pub fn push_json(&self, path: impl Into<String>, body: &str) {
        self.push_response(path, HttpResponse::new(200, body));
    }

    /// Queue a transport-level failure (no response at all).
    pub fn push_failure(&self, path: impl Into<String>, message: impl Into<String>) {
        self.push(path.into(), Err(message.into()));
    }

    fn push(&self, path: String, entry: Result<HttpResponse, String>) {
        let mut inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");
        inner.routes.entry(path).or_default().push_back(entry);
    }

    pub fn requests(&self) -> Vec<Request> {
        let inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");
        inner.requests.clone()
    }

    /// Number of requests applied to `path` so far.
    pub fn calls_to(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path() == path).count()
    }
}

#[cfg(test)]
#[async_trait]
impl Criteria for MockTransport {
    async fn apply(&self, request: Request) -> Result<HttpResponse, TransportError> {
        let mut inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");

        let path = request.path().to_string();
        inner.requests.push(request);

        match inner.routes.get_mut(&path).and_then(|q| q.pop_front()) {
            Some(Ok(resp)) => Ok(resp),
            Some(Err(message)) => Err(TransportError::Transport(message)),
            None => Err(TransportError::NoMockResponse { path }),
        }
    }
}
