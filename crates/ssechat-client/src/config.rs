use clap::Parser;

use crate::transport::DEFAULT_SERVER;

/// Command line / environment configuration of the terminal chat client.
#[derive(Debug, Clone, Parser)]
#[command(name = "ssechat")]
#[command(author, version, about = "Chat with an ssechat relay from the terminal", long_about = None)]
pub struct ClientConfig {
    /// Base URL of the relay server.
    #[arg(long, env = "SSECHAT_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults_to_local_relay() {
        let config = ClientConfig::try_parse_from(["ssechat"]).unwrap();
        assert_eq!(config.server, "http://localhost:8080");
        assert!(!config.log_json);
    }
}
