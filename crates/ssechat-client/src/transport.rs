//! SSE transport to the relay's `/api/chat` endpoint.
use std::{pin::Pin, time::Duration};

use async_stream::{stream, try_stream};
use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use reqwest::{
    Client as HttpClient,
    header::{ACCEPT, HeaderValue},
};
use ssechat_core::wire::{DONE_EVENT, ERROR_EVENT};

use crate::{
    consumer::{ChatConsumer, SessionId, StreamSignal},
    error::ClientError,
};

pub const DEFAULT_SERVER: &str = "http://localhost:8080";

pub type SignalStream = Pin<Box<dyn Stream<Item = StreamSignal> + Send + 'static>>;

/// Opens one SSE connection per prompt.  Cloning is cheap.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: HttpClient,
    base: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = HttpClient::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    pub fn chat_url(&self, prompt: &str) -> String {
        format!("{}/api/chat?query={}", self.base, urlencoding::encode(prompt))
    }

    /// Open the stream for `prompt`.
    ///
    /// Yields a [`StreamSignal::Message`] per delta and always finishes with
    /// exactly one of `Done`, `Failed`, or `Closed`.  Dropping the stream
    /// closes the connection.
    pub fn open(&self, prompt: &str) -> SignalStream {
        let events = relay_events(self.http.clone(), self.chat_url(prompt));

        Box::pin(stream! {
            futures_util::pin_mut!(events);
            while let Some(item) = events.next().await {
                match item {
                    Ok(StreamSignal::Message(data)) => yield StreamSignal::Message(data),
                    Ok(terminal) => {
                        yield terminal;
                        return;
                    }
                    Err(err) => {
                        yield StreamSignal::Failed(err.to_string());
                        return;
                    }
                }
            }
            yield StreamSignal::Closed;
        })
    }
}

fn relay_events(
    http: HttpClient,
    url: String,
) -> impl Stream<Item = Result<StreamSignal, ClientError>> + Send + 'static {
    try_stream! {
        tracing::debug!(%url, "opening relay stream");

        let resp = http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body })?;
        }

        let events = resp.bytes_stream().eventsource();
        futures_util::pin_mut!(events);

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| ClientError::Stream(e.to_string()))?;
            match event.event.as_str() {
                DONE_EVENT => {
                    yield StreamSignal::Done;
                    break;
                }
                ERROR_EVENT => return Err(ClientError::Relay(event.data))?,
                _ => yield StreamSignal::Message(event.data),
            }
        }
    }
}

/// Feed every signal of `signals` into `consumer` under `session`, calling
/// `on_update` after each one that was applied.
pub async fn pump<S, F>(consumer: &mut ChatConsumer, session: SessionId, signals: S, mut on_update: F)
where
    S: Stream<Item = StreamSignal>,
    F: FnMut(&mut ChatConsumer),
{
    futures_util::pin_mut!(signals);
    while let Some(signal) = signals.next().await {
        if consumer.on_signal(session, signal) {
            on_update(consumer);
        }
        if consumer.active_session() != Some(session) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_url_encoded_into_the_query() {
        let client = RelayClient::with_http(HttpClient::new(), "http://relay.local/");

        assert_eq!(
            client.chat_url("what is 1+1? & why"),
            "http://relay.local/api/chat?query=what%20is%201%2B1%3F%20%26%20why"
        );
    }
}
