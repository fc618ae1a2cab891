//! # Logging
//!
//! Tracing subscriber setup for the binaries.
//!
//! Logs are written to stderr so rendered manifests on stdout can be piped
//! straight into `kubectl apply -f -`.

use tracing_subscriber::EnvFilter;

use crate::config::BuilderConfig;

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(config: &BuilderConfig) -> String {
    format!("keystone_workloads={}", config.log_level.to_lowercase())
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Calling this twice
/// is harmless; the second call leaves the first subscriber in place.
pub fn init(config: &BuilderConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config).into());

    let result = if config.json_logs() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(config.log_enable_color)
            .with_writer(std::io::stderr)
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Tracing subscriber already initialized: {}", e);
    }
}
