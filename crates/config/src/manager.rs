//! Configuration loading
//!
//! [`ServiceConfig::load`] merges the default values, the optional file and
//! the process environment through the `config` crate and deserializes the
//! result into typed settings.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use common::error::{Error, Result};
use common::types::{LogFormat, LogLevel, ValidationMode};

use crate::defaults;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "ANOMALY";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "ANOMALY_CONFIG";

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerSettings {
    /// Bind address
    pub host: String,

    /// Listening port
    pub port: u16,
}

/// Model artifact settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelSettings {
    /// Location of the serialized artifact
    pub path: PathBuf,
}

/// Request validation settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationSettings {
    /// Mode used when a request does not ask for one
    pub mode: ValidationMode,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingSettings {
    /// Default level, overridden by `RUST_LOG`
    pub level: LogLevel,

    /// Line format
    pub format: LogFormat,
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerSettings,

    /// Model artifact settings
    pub model: ModelSettings,

    /// Request validation settings
    pub validation: ValidationSettings,

    /// Logging settings
    pub logging: LoggingSettings,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: defaults::HOST.to_string(),
                port: defaults::PORT,
            },
            model: ModelSettings {
                path: PathBuf::from(defaults::MODEL_PATH),
            },
            validation: ValidationSettings {
                mode: ValidationMode::default(),
            },
            logging: LoggingSettings {
                level: LogLevel::default(),
                format: LogFormat::default(),
            },
        }
    }
}

impl ServiceConfig {
    /// Loads the configuration from defaults, file and environment
    ///
    /// The file is the one named by `ANOMALY_CONFIG` (required to exist) or
    /// `anomaly.{toml,yaml,json}` in the working directory (optional).
    pub fn load() -> Result<Self> {
        let explicit = env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::load_from(explicit.as_deref())
    }

    /// Loads the configuration from defaults, `file` and environment
    ///
    /// `ANOMALY__*` variables still override values read from `file`.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let environment = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true);

        Self::build(file, Some(environment))
    }

    /// Loads the configuration from defaults and a single file, ignoring the
    /// environment
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::build(Some(path), None)
    }

    fn build(file: Option<&Path>, environment: Option<Environment>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server.host", defaults::HOST)
            .and_then(|b| b.set_default("server.port", i64::from(defaults::PORT)))
            .and_then(|b| b.set_default("model.path", defaults::MODEL_PATH))
            .and_then(|b| b.set_default("validation.mode", defaults::VALIDATION_MODE))
            .and_then(|b| b.set_default("logging.level", defaults::LOG_LEVEL))
            .and_then(|b| b.set_default("logging.format", defaults::LOG_FORMAT))
            .map_err(config_error)?;

        builder = match file {
            Some(path) => {
                debug!("Reading configuration file {:?}", path);
                builder.add_source(File::from(path).required(true))
            }
            None => builder.add_source(File::with_name(defaults::CONFIG_FILE_STEM).required(false)),
        };

        if let Some(environment) = environment {
            builder = builder.add_source(environment);
        }

        let settings: ServiceConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)?;

        settings.validate()?;

        Ok(settings)
    }

    /// Rejects settings the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("server.port must be non-zero".to_string()));
        }

        if self.server.host.trim().is_empty() {
            return Err(Error::Config("server.host must not be empty".to_string()));
        }

        if self.server.host.parse::<IpAddr>().is_err() {
            return Err(Error::Config(format!(
                "server.host must be an IP address, got {:?}",
                self.server.host
            )));
        }

        if self.model.path.as_os_str().is_empty() {
            return Err(Error::Config("model.path must not be empty".to_string()));
        }

        Ok(())
    }

    /// `host:port` string the server binds to
    pub fn bind_address(&self) -> String {
        match self.server.host.parse::<IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, self.server.port).to_string(),
            Err(_) => format!("{}:{}", self.server.host, self.server.port),
        }
    }
}

fn config_error(err: config::ConfigError) -> Error {
    Error::Config(err.to_string())
}
