//! Remote executor trait definition

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Runs commands on a single remote node over an authenticated channel.
///
/// Calls block until the remote command completes or the transport
/// reports an error; the private key is passed per call because key
/// material may be generated mid-run.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Run a shell command on the node at `host`.
    async fn run(&self, private_key: &Path, host: &str, command: &str) -> Result<()>;

    /// Upload a local file to `remote_path` on the node at `host`.
    async fn upload(
        &self,
        private_key: &Path,
        host: &str,
        local: &Path,
        remote_path: &str,
    ) -> Result<()>;
}
