use std::fmt;

/// Who authored a [`ChatTurn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speaker {
    User,
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
        })
    }
}

/// One entry of the visible conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// Ordered list of turns.
///
/// Append-only from the outside; the consumer may rewrite the text of the
/// assistant turn it is currently streaming into and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a turn and return its index.
    pub(crate) fn push(&mut self, turn: ChatTurn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    pub(crate) fn replace_text(&mut self, index: usize, text: &str) {
        if let Some(turn) = self.turns.get_mut(index) {
            turn.text.clear();
            turn.text.push_str(text);
        }
    }
}
