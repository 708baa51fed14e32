//! Graph API error types.

use crate::http::TransportError;
use thiserror::Error;

/// Errors that can occur while resolving a post.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Invalid Facebook post URL: {0}")]
    InvalidInput(String),

    #[error("Bad credentials for the Facebook OAuth client: {0}")]
    Authentication(#[source] TransportError),

    #[error("Graph API request failed: {0}")]
    Upstream(#[source] TransportError),

    #[error("Message id {0} not found")]
    NotFound(String),
}

impl GraphError {
    /// True for failures the caller caused, as opposed to the API or credentials.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GraphError::InvalidInput(_) | GraphError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_cause() {
        let err = GraphError::Upstream(TransportError::Transport("Bad request".to_string()));
        assert_eq!(
            err.to_string(),
            "Graph API request failed: http transport error: Bad request"
        );

        let err = GraphError::NotFound("6815841748_123456789".to_string());
        assert_eq!(err.to_string(), "Message id 6815841748_123456789 not found");
    }

    #[test]
    fn test_is_client_error() {
        assert!(GraphError::InvalidInput("x".to_string()).is_client_error());
        assert!(GraphError::NotFound("x".to_string()).is_client_error());
        assert!(
            !GraphError::Authentication(TransportError::Decode("x".to_string())).is_client_error()
        );
    }
}
