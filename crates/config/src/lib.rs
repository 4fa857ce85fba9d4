//! Configuration management for the anomaly prediction service
//!
//! Settings are layered, in increasing precedence: built-in defaults, an
//! optional configuration file, then `ANOMALY__`-prefixed environment
//! variables (`ANOMALY__SERVER__PORT=9000`).

pub mod defaults;
pub mod manager;

// Re-export commonly used types
pub use manager::{
    LoggingSettings, ModelSettings, ServerSettings, ServiceConfig, ValidationSettings,
    CONFIG_PATH_ENV, ENV_PREFIX,
};
