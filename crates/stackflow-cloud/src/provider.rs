//! Provisioner trait definition

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Cloud provisioner abstraction trait
///
/// All providers implement this trait to offer a unified interface for
/// node creation: key upload, node creation and readiness polling.
#[async_trait]
pub trait Provisioner: Send + Sync + std::fmt::Debug {
    /// Returns the provider name used in templates (e.g., "digitalocean")
    fn name(&self) -> &str;

    /// Returns the provider display name for UI
    fn display_name(&self) -> &str;

    /// Check if the provider is properly configured and authenticated
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// Upload a public key to the provider.
    ///
    /// Returns the provider-side fingerprint of the registered key.
    async fn import_ssh_key(&self, name: &str, public_key: &Path) -> Result<String>;

    /// Create `count` nodes from the given spec.
    ///
    /// Nodes are returned in creation order; addresses may not be
    /// reachable yet until `wait_ready` has succeeded.
    async fn create_nodes(&self, spec: &NodeSpec, count: usize) -> Result<Vec<NodeInfo>>;

    /// Poll the provider until the node is ready to accept connections.
    async fn wait_ready(&self, node: &NodeInfo, retry: &RetryConfig) -> Result<()>;
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid
    pub authenticated: bool,

    /// Account/user information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}

/// Parameters for creating a batch of nodes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Name prefix; nodes are named `<prefix>-<index>`
    pub name_prefix: String,

    /// Provider region (e.g., "nyc3")
    pub region: String,

    /// Node size/plan (e.g., "s-2vcpu-4gb")
    pub size: String,

    /// OS image (e.g., "ubuntu-24-04-x64")
    pub image: String,

    /// Fingerprint of the SSH key registered with the provider
    pub ssh_fingerprint: String,
}

/// A provisioned node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Provider-side resource ID
    pub id: String,

    /// Node name
    pub name: String,

    /// Public address
    pub address: String,
}

/// Retry configuration for readiness polling
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of polling attempts
    pub max_attempts: u32,

    /// Initial delay between attempts
    pub initial_delay: Duration,

    /// Maximum delay between attempts
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            initial_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Delay before the given attempt (0-based), capped at `max_delay`
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt as i32);
        let delay = self.initial_delay.mul_f64(factor);
        delay.min(self.max_delay)
    }
}
