use reqwest::StatusCode;

/// Everything that can end a chat stream early on the client side.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("event stream broke: {0}")]
    Stream(String),

    #[error("relay reported an error: {0}")]
    Relay(String),
}
