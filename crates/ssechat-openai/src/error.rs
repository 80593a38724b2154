use reqwest::StatusCode;
use ssechat_core::error::RelayError;

/// High-level error type covering every failure mode the client can hit.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn’t decode chunk: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("OpenAI returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("event stream broke: {0}")]
    Stream(String),

    /// An error object sent in place of a chunk after the stream started.
    #[error("OpenAI reported an error mid-stream: {0}")]
    Reported(String),
}

impl From<OpenAiError> for RelayError {
    fn from(value: OpenAiError) -> Self {
        RelayError::Backend(Box::new(value))
    }
}
