use tracing_subscriber::{EnvFilter, fmt};

/// Install the global `tracing` subscriber.
///
/// Honours `RUST_LOG`; falls back to `info` for this crate and `warn` for
/// everything else.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,ssechat_server=info,tower_http=info"));

    let builder = fmt().with_env_filter(filter).with_target(true);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(err) = result {
        eprintln!("tracing subscriber already installed: {err}");
    }
}
