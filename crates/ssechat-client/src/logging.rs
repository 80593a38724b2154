use tracing_subscriber::{EnvFilter, fmt};

/// Install the global `tracing` subscriber on stderr, leaving stdout to the
/// conversation.
///
/// Quiet unless `RUST_LOG` says otherwise.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(err) = result {
        eprintln!("tracing subscriber already installed: {err}");
    }
}
