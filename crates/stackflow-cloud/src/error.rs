//! Cloud provisioner error types

use thiserror::Error;

/// Cloud provisioner errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Unsupported service provider: {0}")]
    UnsupportedProvider(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Node not ready: {0}")]
    NodeNotReady(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
