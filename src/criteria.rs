use crate::http::{HttpResponse, TransportError};
use async_trait::async_trait;

/// Ordered request parameters. A `None` value is still sent, as `key=`.
pub type Parameters = Vec<(String, Option<String>)>;

/// A path plus the query parameters to send with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    path: String,
    parameters: Parameters,
}

impl Request {
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_parameters(path, Vec::new())
    }

    pub fn with_parameters(path: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            path: path.into(),
            parameters,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((key.into(), Some(value.into())));
        self
    }

    pub fn optional_param(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.parameters.push((key.into(), value));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = path.into();
        self
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: Parameters) -> &mut Self {
        self.parameters = parameters;
        self
    }

    /// Look up a parameter by key. The outer `Option` is presence of the key,
    /// the inner one is the (possibly absent) value.
    pub fn parameter(&self, key: &str) -> Option<Option<&str>> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Render the parameters as a URL query string, in insertion order.
    pub fn query_string(&self) -> String {
        self.parameters
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value.as_deref().unwrap_or(""))
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Something a [`Request`] can be applied to.
#[async_trait]
pub trait Criteria: Send + Sync {
    async fn apply(&self, request: Request) -> Result<HttpResponse, TransportError>;
}
