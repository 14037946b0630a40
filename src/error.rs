use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rotolog
#[derive(Debug, Error)]
pub enum RotologError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    #[error("Log directory does not exist: {0}")]
    LogDirectoryMissing(PathBuf),

    // Log-related errors
    #[error("Log error: {0}")]
    LogError(String),

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rotolog operations
pub type Result<T> = std::result::Result<T, RotologError>;
