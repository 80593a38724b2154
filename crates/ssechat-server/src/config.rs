use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use ssechat_core::Model;

use crate::emitter::RelayOptions;

/// Command line / environment configuration of the relay server.
#[derive(Debug, Clone, Parser)]
#[command(name = "ssechat-server")]
#[command(author, version, about = "Streams LLM completions to chat clients over SSE", long_about = None)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "SSECHAT_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Bearer token for the completion API.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Base URL of the completion API, including the version segment.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Model every completion is requested from.
    #[arg(long, env = "SSECHAT_MODEL", default_value = "gpt-3.5-turbo")]
    pub model: Model,

    /// Connect timeout for the outbound completion call, in seconds.
    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Interval of SSE keep-alive comments, in seconds (0 disables them).
    #[arg(long, default_value_t = 15)]
    pub keep_alive_secs: u64,

    /// Send `event: done` / `event: error` before closing a stream.
    #[arg(long, env = "SSECHAT_TERMINAL_EVENTS")]
    pub terminal_events: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl ServerConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn keep_alive(&self) -> Option<Duration> {
        (self.keep_alive_secs > 0).then(|| Duration::from_secs(self.keep_alive_secs))
    }

    pub fn relay_options(&self) -> RelayOptions {
        RelayOptions {
            terminal_events: self.terminal_events,
            ..RelayOptions::default()
        }
    }
}
