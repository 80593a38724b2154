//! HTTP surface of the relay.
//!
//! * `GET /api/chat?query=<prompt>` – SSE stream of quoted deltas.
//! * `GET /healthz` – liveness probe.
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{
        IntoResponse, Response,
        sse::{KeepAlive, Sse},
    },
    routing::get,
};
use serde::Deserialize;
use ssechat_core::{CompletionPrompt, CompletionSource};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use crate::emitter::{RelayOptions, spawn_relay};

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub query: String,
}

/// Immutable per-process state shared by all requests.
pub struct AppState<S> {
    pub source: Arc<S>,
    pub relay: RelayOptions,
    pub keep_alive: Option<Duration>,
}

impl<S> AppState<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            relay: RelayOptions::default(),
            keep_alive: None,
        }
    }

    pub fn with_relay_options(mut self, relay: RelayOptions) -> Self {
        self.relay = relay;
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: Option<Duration>) -> Self {
        self.keep_alive = keep_alive;
        self
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            relay: self.relay.clone(),
            keep_alive: self.keep_alive,
        }
    }
}

pub fn router<S>(state: AppState<S>) -> Router
where
    S: CompletionSource + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/api/chat", get(chat::<S>))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn chat<S>(
    State(state): State<AppState<S>>,
    Query(ChatQuery { query }): Query<ChatQuery>,
) -> Response
where
    S: CompletionSource + 'static,
{
    let prompt = match CompletionPrompt::new(query) {
        Ok(prompt) => prompt,
        Err(err) => {
            debug!(error = %err, "rejecting chat request");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    // The session task is detached: it ends on its own when the source
    // finishes or the body below is dropped.
    let (body, _session) = spawn_relay(Arc::clone(&state.source), prompt, &state.relay);

    let sse = Sse::new(body);
    match state.keep_alive {
        Some(interval) => sse
            .keep_alive(KeepAlive::new().interval(interval))
            .into_response(),
        None => sse.into_response(),
    }
}

async fn healthz() -> &'static str {
    "ok"
}
