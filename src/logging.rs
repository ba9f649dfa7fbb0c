//! Tracing initialization

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber on stderr.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `debug` when verbose.
/// Safe to call more than once (later calls are no-ops).
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
