//! Logging initialization shared by the Flying411 binaries

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber
///
/// `F411_LOG` overrides the configured level (standard env-filter syntax,
/// e.g. `F411_LOG=f411_bu=debug,reqwest=warn`).
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_env("F411_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
