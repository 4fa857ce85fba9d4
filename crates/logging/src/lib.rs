//! Logging setup for the anomaly prediction service
//!
//! Installs a global `tracing` subscriber writing either human-readable or
//! JSON lines. `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{fmt, EnvFilter};

use common::types::{LogFormat, LogLevel};

/// Builds the default filter directive for the configured level
pub fn default_directive(level: LogLevel) -> String {
    format!("{},tower_http={}", level, level)
}

/// Resolves the effective filter, preferring `RUST_LOG`
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)))
}

/// Installs the global subscriber
///
/// Returns `false` when a subscriber was already installed (for example by a
/// previous call or a test harness); the existing one stays in place.
pub fn init(level: LogLevel, format: LogFormat) -> bool {
    let filter = env_filter(level);

    let installed = match format {
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(true)
            .try_init(),
    };

    installed.is_ok()
}
