//! # `ssechat-server`
//!
//! The relay emitter of ssechat as a library, so the binary stays a thin
//! wrapper and tests can mount the router over a scripted
//! [`CompletionSource`](ssechat_core::CompletionSource).
//!
//! ```rust,no_run
//! use ssechat_openai::OpenAiAdapterBuilder;
//! use ssechat_server::routes::{AppState, router};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let source = OpenAiAdapterBuilder::new_from_env().build()?;
//! let app = router(AppState::new(source));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod emitter;
pub mod logging;
pub mod routes;

pub use config::ServerConfig;
pub use emitter::{RelayFrame, RelayOptions, SessionOutcome, spawn_relay};
pub use routes::{AppState, router};
