//! The seam between the relay and a concrete LLM vendor.
//!
//! A **completion source** turns one [`CompletionPrompt`] into one outbound
//! streaming call and yields the decoded text deltas in vendor order.  The
//! relay never sees vendor JSON; it only sees [`DeltaEvent`]s, a normal end of
//! stream, or a single terminal [`RelayError`](crate::error::RelayError).
//!
//! Contract for implementors:
//!
//! * exactly one network call per `stream_completion` invocation, no retries,
//! * the stream ends (`None`) on the vendor's end-of-stream sentinel or on the
//!   natural end of the transport,
//! * an `Err` item is terminal; nothing is yielded after it,
//! * dropping the stream releases the outbound connection.
use futures_core::stream::Stream;

use crate::{
    delta::{CompletionPrompt, DeltaEvent},
    error::Result,
};

pub trait CompletionSource: Send + Sync {
    /// Stream returned by [`Self::stream_completion`].
    ///
    /// Owned (`'static`) so a relay can move it into its own task and drop it
    /// independently of the source.
    type Deltas: Stream<Item = Result<DeltaEvent>> + Send + 'static;

    /// Start a streaming completion for `prompt`.
    ///
    /// The request is issued lazily, on first poll.
    fn stream_completion(&self, prompt: CompletionPrompt) -> Self::Deltas;

    /// Name used in logs.
    fn name(&self) -> &'static str;
}
