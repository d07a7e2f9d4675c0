//! doctl CLI wrapper
//!
//! Wraps the doctl CLI commands for DigitalOcean operations.

use crate::error::{DigitalOceanError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// doctl CLI wrapper
#[derive(Debug)]
pub struct Doctl {
    token: Option<String>,
}

impl Doctl {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Check if doctl is installed and authenticated
    pub async fn check_auth(&self) -> Result<AccountInfo> {
        let which = Command::new("which").arg("doctl").output().await?;

        if !which.status.success() {
            return Err(DigitalOceanError::DoctlNotFound);
        }

        let output = self
            .run_command(&["account", "get", "--output", "json"])
            .await?;

        let accounts: Vec<AccountInfo> = serde_json::from_str(&output)?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| DigitalOceanError::AuthenticationFailed("no account".to_string()))
    }

    /// Run a doctl command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("doctl");
        cmd.args(args);
        // The token never goes through the logged argument list
        if let Some(ref token) = self.token {
            cmd.arg("--access-token").arg(token);
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: doctl {}", args.join(" "));

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DigitalOceanError::CommandFailed(stderr.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Register a public key under the given name
    pub async fn import_ssh_key(&self, name: &str, public_key: &Path) -> Result<SshKeyInfo> {
        let key_path = public_key.display().to_string();
        let output = self
            .run_command(&[
                "compute",
                "ssh-key",
                "import",
                name,
                "--public-key-file",
                key_path.as_str(),
                "--output",
                "json",
            ])
            .await?;

        let keys: Vec<SshKeyInfo> = serde_json::from_str(&output)?;
        keys.into_iter()
            .next()
            .ok_or(DigitalOceanError::EmptySshKeyResponse)
    }

    /// Create droplets with the given names, blocking until creation finishes
    pub async fn create_droplets(
        &self,
        names: &[String],
        region: &str,
        size: &str,
        image: &str,
        ssh_fingerprint: &str,
    ) -> Result<Vec<DropletInfo>> {
        let mut args: Vec<&str> = vec!["compute", "droplet", "create"];
        args.extend(names.iter().map(String::as_str));
        args.extend([
            "--region",
            region,
            "--size",
            size,
            "--image",
            image,
            "--ssh-keys",
            ssh_fingerprint,
            "--wait",
            "--output",
            "json",
        ]);

        let output = self.run_command(&args).await?;

        let droplets: Vec<DropletInfo> = serde_json::from_str(&output)?;
        Ok(droplets)
    }

    /// Read a single droplet by ID
    pub async fn get_droplet(&self, id: &str) -> Result<DropletInfo> {
        let output = self
            .run_command(&["compute", "droplet", "get", id, "--output", "json"])
            .await?;

        let droplets: Vec<DropletInfo> = serde_json::from_str(&output)?;
        droplets
            .into_iter()
            .next()
            .ok_or_else(|| DigitalOceanError::DropletNotFound(id.to_string()))
    }

}

/// Account information from doctl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub status: String,
}

/// Droplet information from doctl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropletInfo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub networks: Networks,
}

impl DropletInfo {
    pub fn id_str(&self) -> String {
        self.id.to_string()
    }

    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// Public IPv4 address, when already assigned
    pub fn public_address(&self) -> Option<String> {
        self.networks
            .v4
            .iter()
            .find(|n| n.kind == "public")
            .map(|n| n.ip_address.clone())
    }
}

/// Droplet network block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub v4: Vec<NetworkV4>,
}

/// A single IPv4 network entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkV4 {
    pub ip_address: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// SSH key information from doctl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshKeyInfo {
    pub id: u64,
    pub name: String,
    pub fingerprint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_droplet_json() {
        let json = r#"[{
            "id": 412345678,
            "name": "sample-0",
            "status": "active",
            "networks": {
                "v4": [
                    {"ip_address": "10.132.0.2", "type": "private"},
                    {"ip_address": "203.0.113.10", "type": "public"}
                ]
            }
        }]"#;

        let droplets: Vec<DropletInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(droplets.len(), 1);

        let droplet = &droplets[0];
        assert_eq!(droplet.id_str(), "412345678");
        assert!(droplet.is_active());
        assert_eq!(droplet.public_address().as_deref(), Some("203.0.113.10"));
    }

    #[test]
    fn test_parse_droplet_without_public_address() {
        let json = r#"[{"id": 1, "name": "sample-0", "status": "new", "networks": {"v4": []}}]"#;

        let droplets: Vec<DropletInfo> = serde_json::from_str(json).unwrap();
        assert!(!droplets[0].is_active());
        assert!(droplets[0].public_address().is_none());
    }

    #[test]
    fn test_parse_ssh_key_json() {
        let json = r#"[{"id": 123, "name": "stackflow", "fingerprint": "aa:bb:cc:dd"}]"#;

        let keys: Vec<SshKeyInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(keys[0].fingerprint, "aa:bb:cc:dd");
    }
}
