//! Built-in default settings

/// Default bind address
pub const HOST: &str = "0.0.0.0";

/// Default listening port
pub const PORT: u16 = 8000;

/// Default location of the model artifact, relative to the working directory
pub const MODEL_PATH: &str = "summative/linear_regression/best_model.json";

/// Default validation mode
pub const VALIDATION_MODE: &str = "fail_fast";

/// Default log level
pub const LOG_LEVEL: &str = "info";

/// Default log format
pub const LOG_FORMAT: &str = "text";

/// Base name of the optional configuration file (`anomaly.toml`, `anomaly.yaml`, ...)
pub const CONFIG_FILE_STEM: &str = "anomaly";
