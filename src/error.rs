//! Top-level error type for the host binary.

use crate::config::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum ShooterError {
    /// Terminal or log-file I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be used
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ShooterError>;
