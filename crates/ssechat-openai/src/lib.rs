//! OpenAI chat-completions adapter for the ssechat relay.
//!
//! [`OpenAiAdapter`] implements [`ssechat_core::CompletionSource`]: one prompt
//! in, one streaming `POST /chat/completions` out, decoded into plain text
//! deltas.  Build it with [`OpenAiAdapterBuilder`].
mod adapter;
mod model_map;
mod provider_impl_chat_stream;

pub use adapter::{OpenAiAdapter, OpenAiAdapterBuilder};
pub use client::OpenAiClient;
pub mod api_v1;
mod client;
pub mod error;
