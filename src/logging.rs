//! Logging setup. Compact `tracing` output to stderr, so diagnostics stay
//! out of the alternate screen the dashboard draws on.
//!
//! Filter priority: RUST_LOG env var > CLI --debug flag > default "info".

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "info";

pub fn init(debug_flag: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        "Logging initialised"
    );
}
