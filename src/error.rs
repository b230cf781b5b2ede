//! Application error type.
//!
//! Only the I/O and configuration edges produce errors. Scoring never fails:
//! thin or missing data degrades a verdict toward `UNCERTAIN` instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input JSON '{}': {source}", path.display())]
    InputFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config TOML '{}': {source}", path.display())]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    Data(String),
}

impl AppError {
    /// Process exit code: 2 for usage/config/file problems, 4 for data problems.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_)
            | AppError::Read { .. }
            | AppError::Write { .. }
            | AppError::InputFormat { .. }
            | AppError::ConfigFormat { .. } => 2,
            AppError::Encode(_) | AppError::Data(_) => 4,
        }
    }
}
