//! The chat consumer: input handling, the loading guard, and folding stream
//! signals into the [`Transcript`].
//!
//! [`ChatConsumer`] performs no I/O.  A front end feeds it user actions and
//! the [`StreamSignal`]s of the connection it opened, and renders the state
//! and [`UiEffect`]s it hands back:
//!
//! ```text
//!   send()            Message(..)            Done / Closed / Failed
//! Idle ──▶ AwaitingFirstDelta ──▶ Streaming ──────────────────────▶ Closed(outcome)
//!                     │                                                 ▲
//!                     └──────────── Done / Closed / Failed ─────────────┘
//! ```
//!
//! Every send gets a fresh [`SessionId`].  Signals tagged with any other id
//! are dropped, so a late frame from an abandoned connection can never touch
//! a newer turn.
use std::time::Duration;

use ssechat_core::wire::unquote_delta;
use tracing::{debug, warn};

use crate::transcript::{ChatTurn, Speaker, Transcript};

/// Delay before the input regains focus after a transcript change, so the
/// re-render settles first.
pub const FOCUS_DELAY: Duration = Duration::from_millis(50);

/// Tag of one send and the SSE connection opened for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// What the front end must do to start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    pub session: SessionId,
    pub prompt: String,
}

/// What the transport observed on an open connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    /// Raw data of one `message` event, still quoted.
    Message(String),
    /// The relay marked a normal end of stream.
    Done,
    /// The connection or the relay failed.
    Failed(String),
    /// The body ended without a terminal marker.
    Closed,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Explicit `done` marker received.
    Completed,
    /// Stream closed without a marker; the answer may or may not be whole.
    Ended,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    AwaitingFirstDelta,
    Streaming,
    Closed(StreamOutcome),
}

/// Side effects a front end should apply after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEffect {
    ScrollToLatest,
    FocusInput { after: Duration },
}

#[derive(Debug)]
struct ActiveSession {
    id: SessionId,
    accumulated: String,
    turn: Option<usize>,
}

#[derive(Debug, Default)]
pub struct ChatConsumer {
    transcript: Transcript,
    input: String,
    composing: bool,
    loading: bool,
    last_session: u64,
    active: Option<ActiveSession>,
    phase: SessionPhase,
    effects: Vec<UiEffect>,
}

impl ChatConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Session whose signals are currently accepted.
    pub fn active_session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|session| session.id)
    }

    /// Take the effects queued since the last call.
    pub fn take_effects(&mut self) -> Vec<UiEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn composition_start(&mut self) {
        self.composing = true;
    }

    pub fn composition_end(&mut self) {
        self.composing = false;
    }

    /// Enter key.  Ignored while an input-method composition is open because
    /// that Enter confirms the composed characters.
    pub fn key_enter(&mut self) -> Option<OutgoingRequest> {
        if self.composing {
            return None;
        }
        self.send()
    }

    /// Explicit send action.
    ///
    /// Returns `None` when the input is blank or a response is still
    /// loading.  Otherwise records the user turn (unless it repeats the
    /// previous user turn verbatim), clears the input, enters the loading
    /// state, and returns the request the front end must open.
    pub fn send(&mut self) -> Option<OutgoingRequest> {
        if self.loading || self.input.trim().is_empty() {
            return None;
        }

        let prompt = std::mem::take(&mut self.input);
        let repeated = matches!(
            self.transcript.last(),
            Some(ChatTurn { speaker: Speaker::User, text }) if *text == prompt
        );
        if repeated {
            debug!("skipping duplicate user turn");
        } else {
            self.transcript.push(ChatTurn::user(prompt.clone()));
            self.transcript_changed();
        }

        self.last_session += 1;
        let session = SessionId(self.last_session);
        self.active = Some(ActiveSession {
            id: session,
            accumulated: String::new(),
            turn: None,
        });
        self.loading = true;
        self.phase = SessionPhase::AwaitingFirstDelta;

        Some(OutgoingRequest { session, prompt })
    }

    /// Apply one transport signal.  Returns `false` if it was ignored
    /// because `session` is not the active one.
    pub fn on_signal(&mut self, session: SessionId, signal: StreamSignal) -> bool {
        match self.active.as_ref() {
            Some(active) if active.id == session => {}
            _ => {
                debug!(session = session.get(), "ignoring signal for inactive session");
                return false;
            }
        }

        match signal {
            StreamSignal::Message(data) => self.apply_delta(&data),
            StreamSignal::Done => self.close(StreamOutcome::Completed),
            StreamSignal::Closed => self.close(StreamOutcome::Ended),
            StreamSignal::Failed(reason) => {
                warn!(%reason, "chat stream failed");
                self.close(StreamOutcome::Failed(reason));
            }
        }
        true
    }

    fn apply_delta(&mut self, data: &str) {
        let delta = unquote_delta(data);
        if delta.is_empty() {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };

        active.accumulated.push_str(delta);
        match active.turn {
            Some(index) => self.transcript.replace_text(index, &active.accumulated),
            None => {
                active.turn = Some(
                    self.transcript
                        .push(ChatTurn::assistant(active.accumulated.clone())),
                );
            }
        }
        self.phase = SessionPhase::Streaming;
        self.transcript_changed();
    }

    /// Every outcome re-enables the input the same way; only the recorded
    /// outcome differs.
    fn close(&mut self, outcome: StreamOutcome) {
        self.active = None;
        self.loading = false;
        self.phase = SessionPhase::Closed(outcome);
        self.effects.push(UiEffect::FocusInput { after: FOCUS_DELAY });
    }

    fn transcript_changed(&mut self) {
        self.effects.push(UiEffect::ScrollToLatest);
        self.effects.push(UiEffect::FocusInput { after: FOCUS_DELAY });
    }
}
