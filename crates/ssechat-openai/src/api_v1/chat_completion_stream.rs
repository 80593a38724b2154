use serde::Deserialize;

use super::chat_completion::{FinishReason, MessageRole};

/// A delta message as returned by OpenAI when `stream = true`.
#[allow(dead_code)]
#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionMessageDelta {
    #[serde(default)]
    pub role: Option<MessageRole>,
    #[serde(default)]
    pub content: Option<String>,
}

/// A single streaming choice payload.
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunkChoice {
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub delta: Option<ChatCompletionMessageDelta>,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// The outermost object sent by OpenAI for each SSE chunk.
///
/// Only `choices` matters to the relay and it is required; the metadata
/// fields are optional so OpenAI-compatible servers that omit them still
/// decode.
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunkResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<ChatCompletionChunkChoice>,
}

/// Error object OpenAI may send in place of a chunk once the response has
/// already started.
#[derive(Debug, Deserialize)]
pub struct StreamErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Payload of one `data:` frame.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ChatCompletionStreamEvent {
    Error { error: StreamErrorBody },
    Chunk(ChatCompletionChunkResponse),
}

impl ChatCompletionChunkResponse {
    /// Incremental text of the first choice, if it carries any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()?
            .delta
            .as_ref()?
            .content
            .as_deref()
            .filter(|content| !content.is_empty())
    }
}
