//! # `ssechat-client`
//!
//! Client side of the ssechat relay, split so the logic is testable without
//! a terminal or a network:
//!
//! * [`transcript`] – the ordered list of chat turns.
//! * [`consumer`] – [`ChatConsumer`], a pure state machine folding user
//!   actions and stream signals into the transcript.
//! * [`transport`] – [`RelayClient`], which turns one SSE connection into a
//!   stream of [`StreamSignal`]s.
//!
//! ```rust,no_run
//! use ssechat_client::{ChatConsumer, RelayClient, transport::pump};
//!
//! # async fn run() -> Result<(), ssechat_client::ClientError> {
//! let client = RelayClient::new("http://localhost:8080")?;
//! let mut consumer = ChatConsumer::new();
//!
//! consumer.set_input("hi");
//! if let Some(request) = consumer.send() {
//!     pump(&mut consumer, request.session, client.open(&request.prompt), |_| {}).await;
//! }
//! println!("{:?}", consumer.transcript().last());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod consumer;
pub mod error;
pub mod input;
pub mod logging;
pub mod transcript;
pub mod transport;

pub use consumer::{
    ChatConsumer, OutgoingRequest, SessionId, SessionPhase, StreamOutcome, StreamSignal, UiEffect,
};
pub use error::ClientError;
pub use transcript::{ChatTurn, Speaker, Transcript};
pub use transport::RelayClient;
