//! Messages flowing *into* a completion source and the deltas flowing out.
//!
//! Both types are deliberately tiny.  A prompt is the raw user text of one
//! send; there is no conversation history because every send is a stateless
//! single-prompt call.  A delta is one non-empty fragment of generated text.

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// The user text of a single send.
///
/// Construction validates that the prompt is not blank so a completion
/// source never issues a network call for nothing.  The text itself is kept
/// verbatim (no trimming) because that is what the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPrompt(String);

impl CompletionPrompt {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RelayError::InvalidRequest("prompt must not be blank".into()));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A single incremental fragment of assistant output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaEvent {
    pub text: String,
}

impl DeltaEvent {
    /// Wraps `text` unless it is empty; empty fragments carry no information
    /// and are never relayed.
    pub fn non_empty(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (!text.is_empty()).then_some(Self { text })
    }
}
