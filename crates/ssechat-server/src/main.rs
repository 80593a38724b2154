use anyhow::Context;
use clap::Parser;
use ssechat_openai::OpenAiAdapterBuilder;
use ssechat_server::{
    config::ServerConfig,
    logging,
    routes::{AppState, router},
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    logging::init(config.log_json);

    let source = OpenAiAdapterBuilder::new()
        .api_key(config.openai_api_key.clone())
        .base_url(config.openai_base_url.clone())
        .model(config.model.clone())
        .connect_timeout(config.connect_timeout())
        .build()
        .context("building completion adapter")?;

    info!(
        model = source.model(),
        base_url = source.base_url(),
        "completion adapter ready"
    );

    let state = AppState::new(source)
        .with_relay_options(config.relay_options())
        .with_keep_alive(config.keep_alive());
    let app = router(state);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
