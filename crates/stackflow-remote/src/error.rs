//! Remote execution error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("SSH private key not found: {0}")]
    KeyNotFound(PathBuf),

    #[error("Remote command failed on {host}: {command}\n{stderr}")]
    CommandFailed {
        host: String,
        command: String,
        stderr: String,
    },

    #[error("Upload to {host} failed: {path}\n{stderr}")]
    UploadFailed {
        host: String,
        path: PathBuf,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RemoteError>;
