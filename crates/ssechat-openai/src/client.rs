use async_stream::try_stream;
use eventsource_stream::Eventsource;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{
    Client as HttpClient,
    header::{ACCEPT, HeaderValue},
};
use std::time::Duration;

use crate::{
    api_v1::{ChatCompletionChunkResponse, ChatCompletionRequest, ChatCompletionStreamEvent},
    error::OpenAiError,
};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Literal data payload OpenAI sends as its last event.
const DONE_SENTINEL: &str = "[DONE]";

/// Minimal HTTP client for OpenAI’s *chat/completions* endpoint.
///
/// * Streaming only: one request ▶ one SSE response ▶ many chunks.
/// * No retries; a failed call is reported once and the caller decides.
/// * Shares a single `reqwest::Client`, so cloning `OpenAiClient` is cheap.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    http: HttpClient,
    base: String,
}

impl OpenAiClient {
    /// Convenience constructor building a default `reqwest` client with a
    /// connect timeout and Rustls TLS.
    ///
    /// There is deliberately no total request timeout: a streamed answer can
    /// take longer than any sensible fixed limit.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        connect_timeout: Duration,
    ) -> Result<Self, OpenAiError> {
        let http = HttpClient::builder()
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self::with_http(api_key, http, base_url))
    }

    /// Build with a custom `reqwest::Client` in case the caller needs proxy
    /// settings, custom TLS, etc.
    pub fn with_http(
        api_key: impl Into<String>,
        http: HttpClient,
        base_url: Option<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            http,
            base: base_url
                .map(|base| base.trim_end_matches('/').to_owned())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Perform a **streaming** chat completion.
    ///
    /// The HTTP request is sent on first poll.  The stream ends after the
    /// `[DONE]` sentinel or when the body ends, whichever comes first.  Any
    /// error is yielded once and ends the stream.  Dropping the stream drops
    /// the response body and with it the connection.
    pub fn chat_completion_stream(
        &self,
        mut request: ChatCompletionRequest,
    ) -> impl Stream<Item = Result<ChatCompletionChunkResponse, OpenAiError>> + Send + '_ {
        request.stream = Some(true);

        let url = format!("{}/chat/completions", self.base);

        try_stream! {
            tracing::debug!(%url, model = %request.model, "opening completion stream");

            let resp = self
                .http
                .post(url)
                .bearer_auth(&self.api_key)
                .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
                .json(&request)
                .send()
                .await?;

            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                tracing::warn!(%status, "completion request rejected");
                return Err(OpenAiError::Api { status, body })?;
            }

            let events = resp.bytes_stream().eventsource();
            futures_util::pin_mut!(events);

            while let Some(event) = events.next().await {
                let event = event.map_err(|e| OpenAiError::Stream(e.to_string()))?;
                let data = event.data.trim();

                if data.is_empty() {
                    continue;
                }
                if data == DONE_SENTINEL {
                    tracing::trace!("completion stream reached sentinel");
                    break;
                }

                match serde_json::from_str::<ChatCompletionStreamEvent>(data)? {
                    ChatCompletionStreamEvent::Chunk(chunk) => yield chunk,
                    ChatCompletionStreamEvent::Error { error } => {
                        tracing::warn!(kind = ?error.kind, "completion stream reported an error");
                        return Err(OpenAiError::Reported(error.message))?;
                    }
                }
            }
        }
    }
}
