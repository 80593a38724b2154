//! # `ssechat-core`
//!
//! Provider-agnostic building blocks of the ssechat relay:
//!
//! | Module       | What it provides                                                      |
//! |--------------|-----------------------------------------------------------------------|
//! | [`delta`]    | [`CompletionPrompt`] (one user send) and [`DeltaEvent`] (one fragment) |
//! | [`provider`] | The [`CompletionSource`] trait implemented by vendor adapters         |
//! | [`model`]    | Model identifiers                                                     |
//! | [`wire`]     | The SSE framing convention shared by server and client                |
//! | [`error`]    | [`RelayError`] and the workspace `Result` alias                       |
//!
//! Vendor crates (e.g. `ssechat-openai`) implement [`CompletionSource`]; the
//! server relays whatever source it is handed, which keeps the HTTP layer
//! testable against scripted fakes.

pub mod delta;
pub mod error;
pub mod model;
pub mod provider;
pub mod wire;

pub use delta::{CompletionPrompt, DeltaEvent};
pub use error::{RelayError, Result};
pub use model::{Model, OpenAiModel};
pub use provider::CompletionSource;
