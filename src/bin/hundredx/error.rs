//! Error types for the command line client.

use hundredx_sdk::{ApiError, error::Error as SdkError};

use crate::config::ConfigError;

/// Main error type for the command line client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Environment configuration error: {0}")]
    EnvConfig(#[from] envy::Error),

    #[error("SDK error: {0}")]
    Sdk(#[from] SdkError),

    #[error("Request failed: {0}")]
    Api(#[from] ApiError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
