//! Error types for batbot domain logic

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration key: {0}")]
    MissingKey(&'static str),

    #[error("Invalid numeric value for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Failed to read config file: {0}")]
    File(#[from] config::ConfigError),

    #[error("Failed to resolve hostname: {0}")]
    Hostname(#[source] std::io::Error),
}

/// Battery sensor errors
#[derive(Error, Debug)]
pub enum BatteryError {
    #[error("No battery detected on this host")]
    Unavailable,

    #[error("Failed to read battery sysfs entry: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unparseable battery reading: {0}")]
    Malformed(String),
}
