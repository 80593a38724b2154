//! Unified error type exposed by **`ssechat-core`**.
//!
//! Completion sources convert their internal errors into one of these
//! variants before handing them to the relay.  The relay only needs to know
//! *that* a session failed and a printable reason; the concrete backend error
//! stays reachable through [`RelayError::Backend`] for logging.

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The configured backend does not recognise or support the requested
    /// `model`.
    #[error("provider `{provider}` does not support model `{model}`")]
    ModelNotSupported {
        provider: &'static str,
        model: String,
    },

    /// Generic forwarding of any backend-specific error that doesn’t fit another
    /// category.
    #[error("backend returned an error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid: {0}")]
    Invalid(String),
}

impl RelayError {
    /// Short, single-line description safe to hand to a chat client.
    ///
    /// Backend details (response bodies, URLs) stay in the logs.
    pub fn client_message(&self) -> &'static str {
        match self {
            RelayError::ModelNotSupported { .. } => "model not supported",
            RelayError::Backend(_) => "completion backend failed",
            RelayError::InvalidRequest(_) => "invalid request",
            RelayError::Invalid(_) => "relay misconfigured",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_message_hides_backend_details() {
        let err = RelayError::Backend("status 401: {\"error\":\"bad key sk-123\"}".into());
        assert_eq!(err.client_message(), "completion backend failed");
        assert!(err.to_string().contains("sk-123"));
    }
}
