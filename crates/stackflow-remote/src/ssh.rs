//! SSH-backed remote executor
//!
//! Wraps the `ssh` / `scp` CLI commands with key-based authentication.

use crate::error::{RemoteError, Result};
use crate::executor::RemoteExecutor;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// SSH transport for remote nodes
pub struct SshExecutor {
    user: String,
    port: u16,
}

impl SshExecutor {
    pub fn new(user: impl Into<String>, port: u16) -> Self {
        Self {
            user: user.into(),
            port,
        }
    }
}

impl Default for SshExecutor {
    fn default() -> Self {
        Self::new("root", 22)
    }
}

/// Build the ssh argument list for a remote command
fn ssh_args(user: &str, port: u16, private_key: &Path, host: &str, command: &str) -> Vec<String> {
    vec![
        "-i".to_string(),
        private_key.display().to_string(),
        "-p".to_string(),
        port.to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        format!("{}@{}", user, host),
        command.to_string(),
    ]
}

/// Build the scp argument list for a file upload
fn scp_args(
    user: &str,
    port: u16,
    private_key: &Path,
    host: &str,
    local: &Path,
    remote_path: &str,
) -> Vec<String> {
    vec![
        "-i".to_string(),
        private_key.display().to_string(),
        "-P".to_string(),
        port.to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        local.display().to_string(),
        format!("{}@{}:{}", user, host, remote_path),
    ]
}

fn check_key(private_key: &Path) -> Result<()> {
    if !private_key.exists() {
        return Err(RemoteError::KeyNotFound(private_key.to_path_buf()));
    }
    Ok(())
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn run(&self, private_key: &Path, host: &str, command: &str) -> Result<()> {
        check_key(private_key)?;

        tracing::debug!(host, command, "Running remote command");

        let output = Command::new("ssh")
            .args(ssh_args(&self.user, self.port, private_key, host, command))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(RemoteError::CommandFailed {
                host: host.to_string(),
                command: command.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(())
    }

    async fn upload(
        &self,
        private_key: &Path,
        host: &str,
        local: &Path,
        remote_path: &str,
    ) -> Result<()> {
        check_key(private_key)?;

        tracing::debug!(host, local = %local.display(), remote_path, "Uploading file");

        let output = Command::new("scp")
            .args(scp_args(
                &self.user,
                self.port,
                private_key,
                host,
                local,
                remote_path,
            ))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(RemoteError::UploadFailed {
                host: host.to_string(),
                path: local.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ssh_args() {
        let key = PathBuf::from("/home/op/.stackflow/ssh/id_rsa");
        let args = ssh_args("root", 22, &key, "203.0.113.10", "systemctl start etcd");

        assert_eq!(args[0], "-i");
        assert_eq!(args[1], "/home/op/.stackflow/ssh/id_rsa");
        assert!(args.contains(&"BatchMode=yes".to_string()));
        assert_eq!(args[args.len() - 2], "root@203.0.113.10");
        assert_eq!(args[args.len() - 1], "systemctl start etcd");
    }

    #[test]
    fn test_scp_args_target() {
        let key = PathBuf::from("/tmp/id_rsa");
        let local = PathBuf::from("/tmp/etcd.service");
        let args = scp_args("root", 22, &key, "203.0.113.10", &local, "/etc/systemd/system/etcd.service");

        assert_eq!(args[args.len() - 2], "/tmp/etcd.service");
        assert_eq!(
            args[args.len() - 1],
            "root@203.0.113.10:/etc/systemd/system/etcd.service"
        );
    }

    #[tokio::test]
    async fn test_run_missing_key() {
        let executor = SshExecutor::default();
        let missing = PathBuf::from("/nonexistent/id_rsa");

        let err = executor
            .run(&missing, "203.0.113.10", "true")
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::KeyNotFound(_)));
    }
}
