//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global JSON subscriber
///
/// An unparsable `log_level` falls back to `info`. Calling this twice is
/// harmless; the second subscriber is simply not installed.
pub fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Tracing initialized for service: {}", config.service.name);
    }
}
