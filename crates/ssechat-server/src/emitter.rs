//! The relay emitter: one completion stream in, one SSE body out.
//!
//! Every accepted request gets its own pipeline:
//!
//! ```text
//!   CompletionSource::stream_completion ──▶ relay task ──▶ mpsc ──▶ SSE body
//! ```
//!
//! The relay task is the cancellation boundary.  It waits on the next delta
//! *and* on the channel closing; when the HTTP layer drops the body (client
//! went away) the channel closes, the task stops and drops the delta stream,
//! which releases the outbound vendor connection.
use std::{convert::Infallible, sync::Arc};

use axum::response::sse::Event;
use futures_util::{Stream, StreamExt};
use ssechat_core::{
    CompletionPrompt, CompletionSource,
    wire::{DONE_DATA, DONE_EVENT, ERROR_EVENT, quote_delta},
};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{Instrument, debug, info, warn};

/// Frames the relay task hands to the SSE body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayFrame {
    /// One delta, sent as a default `message` event.
    Delta(String),
    /// Optional terminal frame after a normal end of stream.
    Done,
    /// Optional terminal frame after a source error.
    Failed(&'static str),
}

impl RelayFrame {
    pub fn into_event(self) -> Event {
        match self {
            RelayFrame::Delta(text) => Event::default().data(quote_delta(&text)),
            RelayFrame::Done => Event::default().event(DONE_EVENT).data(DONE_DATA),
            RelayFrame::Failed(reason) => Event::default().event(ERROR_EVENT).data(reason),
        }
    }
}

/// How a relay session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The source reached its end of stream.
    Completed { deltas: u64 },
    /// The source yielded an error; the stream was closed.
    Failed { deltas: u64, reason: String },
    /// The client disconnected first; the source was dropped.
    ClientGone { deltas: u64 },
}

#[derive(Debug, Clone)]
pub struct RelayOptions {
    /// Send `event: done` / `event: error` before closing.
    pub terminal_events: bool,
    /// Frames buffered between the relay task and the HTTP body.
    pub channel_capacity: usize,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            terminal_events: false,
            channel_capacity: 32,
        }
    }
}

/// Start a relay session for `prompt` and return the SSE body stream plus a
/// handle resolving to the session outcome.
pub fn spawn_relay<S>(
    source: Arc<S>,
    prompt: CompletionPrompt,
    options: &RelayOptions,
) -> (
    impl Stream<Item = Result<Event, Infallible>> + Send + 'static,
    JoinHandle<SessionOutcome>,
)
where
    S: CompletionSource + 'static,
{
    let (tx, mut rx) = mpsc::channel(options.channel_capacity.max(1));
    let span = tracing::info_span!(
        "relay",
        source = source.name(),
        prompt_chars = prompt.as_str().chars().count()
    );

    let deltas = source.stream_completion(prompt);
    let task = tokio::spawn(relay_session(deltas, options.terminal_events, tx).instrument(span));

    let body = async_stream::stream! {
        while let Some(frame) = rx.recv().await {
            yield Ok(frame.into_event());
        }
    };

    (body, task)
}

/// Forward `deltas` into `tx` until the source ends, fails, or the receiver
/// goes away.
pub async fn relay_session<D>(
    deltas: D,
    terminal_events: bool,
    tx: mpsc::Sender<RelayFrame>,
) -> SessionOutcome
where
    D: Stream<Item = ssechat_core::Result<ssechat_core::DeltaEvent>>,
{
    debug!("relay session started");
    futures_util::pin_mut!(deltas);

    let mut forwarded = 0u64;
    let outcome = loop {
        let next = tokio::select! {
            biased;
            _ = tx.closed() => break SessionOutcome::ClientGone { deltas: forwarded },
            next = deltas.next() => next,
        };

        match next {
            Some(Ok(delta)) => {
                if tx.send(RelayFrame::Delta(delta.text)).await.is_err() {
                    break SessionOutcome::ClientGone { deltas: forwarded };
                }
                forwarded += 1;
            }
            Some(Err(err)) => {
                warn!(error = %err, "completion source failed");
                if terminal_events {
                    let _ = tx.send(RelayFrame::Failed(err.client_message())).await;
                }
                break SessionOutcome::Failed {
                    deltas: forwarded,
                    reason: err.to_string(),
                };
            }
            None => {
                if terminal_events {
                    let _ = tx.send(RelayFrame::Done).await;
                }
                break SessionOutcome::Completed { deltas: forwarded };
            }
        }
    };

    info!(?outcome, "relay session closed");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use ssechat_core::{DeltaEvent, RelayError};

    fn delta(text: &str) -> ssechat_core::Result<DeltaEvent> {
        Ok(DeltaEvent { text: text.into() })
    }

    async fn drain(mut rx: mpsc::Receiver<RelayFrame>) -> Vec<RelayFrame> {
        let mut frames = Vec::new();
        while let Some(frame) = rx.recv().await {
            frames.push(frame);
        }
        frames
    }

    #[tokio::test]
    async fn forwards_deltas_in_order_and_closes() {
        let (tx, rx) = mpsc::channel(8);
        let source = stream::iter(vec![delta("H"), delta("i")]);

        let outcome = relay_session(source, false, tx).await;

        assert_eq!(outcome, SessionOutcome::Completed { deltas: 2 });
        assert_eq!(
            drain(rx).await,
            vec![RelayFrame::Delta("H".into()), RelayFrame::Delta("i".into())]
        );
    }

    #[tokio::test]
    async fn terminal_events_mark_done_and_failure() {
        let (tx, rx) = mpsc::channel(8);
        let outcome = relay_session(stream::iter(vec![delta("ok")]), true, tx).await;
        assert_eq!(outcome, SessionOutcome::Completed { deltas: 1 });
        assert_eq!(
            drain(rx).await,
            vec![RelayFrame::Delta("ok".into()), RelayFrame::Done]
        );

        let (tx, rx) = mpsc::channel(8);
        let failing = stream::iter(vec![
            delta("par"),
            Err(RelayError::Backend("connection reset".into())),
            delta("never"),
        ]);
        let outcome = relay_session(failing, true, tx).await;
        assert!(matches!(outcome, SessionOutcome::Failed { deltas: 1, .. }));
        assert_eq!(
            drain(rx).await,
            vec![
                RelayFrame::Delta("par".into()),
                RelayFrame::Failed("completion backend failed"),
            ]
        );
    }

    #[tokio::test]
    async fn errors_without_terminal_events_just_close() {
        let (tx, rx) = mpsc::channel(8);
        let failing = stream::iter(vec![Err(RelayError::Backend("refused".into()))]);

        let outcome = relay_session(failing, false, tx).await;

        assert!(matches!(outcome, SessionOutcome::Failed { deltas: 0, .. }));
        assert!(drain(rx).await.is_empty());
    }

    #[tokio::test]
    async fn dropped_receiver_stops_a_pending_source() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);

        let outcome = relay_session(stream::pending::<ssechat_core::Result<DeltaEvent>>(), false, tx).await;

        assert_eq!(outcome, SessionOutcome::ClientGone { deltas: 0 });
    }
}
