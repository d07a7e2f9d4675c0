//! DigitalOcean provisioner error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigitalOceanError {
    #[error("doctl not found. Please install: https://docs.digitalocean.com/reference/doctl/how-to/install/")]
    DoctlNotFound,

    #[error("doctl authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("doctl command failed: {0}")]
    CommandFailed(String),

    #[error("Droplet not found: {0}")]
    DropletNotFound(String),

    #[error("Droplet has no public address: {0}")]
    MissingPublicAddress(String),

    #[error("SSH key registration returned no key")]
    EmptySshKeyResponse,

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cloud error: {0}")]
    CloudError(#[from] stackflow_cloud::CloudError),
}

pub type Result<T> = std::result::Result<T, DigitalOceanError>;
