//! DigitalOcean provisioner implementation

use crate::doctl::Doctl;
use crate::error::DigitalOceanError;
use async_trait::async_trait;
use stackflow_cloud::{AuthStatus, CloudError, NodeInfo, NodeSpec, Provisioner, RetryConfig};
use std::path::Path;

/// DigitalOcean provisioner
#[derive(Debug)]
pub struct DigitalOceanProvider {
    doctl: Doctl,
}

impl DigitalOceanProvider {
    pub fn new(token: Option<String>) -> Self {
        Self {
            doctl: Doctl::new(token),
        }
    }
}

fn api_error(e: DigitalOceanError) -> CloudError {
    CloudError::ApiError(e.to_string())
}

#[async_trait]
impl Provisioner for DigitalOceanProvider {
    fn name(&self) -> &str {
        "digitalocean"
    }

    fn display_name(&self) -> &str {
        "DigitalOcean"
    }

    async fn check_auth(&self) -> stackflow_cloud::Result<AuthStatus> {
        match self.doctl.check_auth().await {
            Ok(account) => Ok(AuthStatus::ok(format!(
                "{} ({})",
                account.email, account.status
            ))),
            Err(DigitalOceanError::DoctlNotFound) => {
                Ok(AuthStatus::failed(DigitalOceanError::DoctlNotFound.to_string()))
            }
            Err(e) => Ok(AuthStatus::failed(e.to_string())),
        }
    }

    async fn import_ssh_key(
        &self,
        name: &str,
        public_key: &Path,
    ) -> stackflow_cloud::Result<String> {
        let key = self
            .doctl
            .import_ssh_key(name, public_key)
            .await
            .map_err(api_error)?;

        tracing::info!(name = %key.name, fingerprint = %key.fingerprint, "SSH key registered");
        Ok(key.fingerprint)
    }

    async fn create_nodes(
        &self,
        spec: &NodeSpec,
        count: usize,
    ) -> stackflow_cloud::Result<Vec<NodeInfo>> {
        let names: Vec<String> = (0..count)
            .map(|i| format!("{}-{}", spec.name_prefix, i))
            .collect();

        tracing::info!(count, region = %spec.region, size = %spec.size, "Creating droplets");

        let droplets = self
            .doctl
            .create_droplets(
                &names,
                &spec.region,
                &spec.size,
                &spec.image,
                &spec.ssh_fingerprint,
            )
            .await
            .map_err(api_error)?;

        // doctl reports creation results unordered; restore requested order
        let mut nodes = Vec::with_capacity(count);
        for name in &names {
            let droplet = droplets
                .iter()
                .find(|d| &d.name == name)
                .ok_or_else(|| CloudError::ApiError(format!("droplet {} was not created", name)))?;

            let address = droplet.public_address().ok_or_else(|| {
                api_error(DigitalOceanError::MissingPublicAddress(name.clone()))
            })?;

            nodes.push(NodeInfo {
                id: droplet.id_str(),
                name: droplet.name.clone(),
                address,
            });
        }

        Ok(nodes)
    }

    async fn wait_ready(
        &self,
        node: &NodeInfo,
        retry: &RetryConfig,
    ) -> stackflow_cloud::Result<()> {
        for attempt in 0..retry.max_attempts {
            let droplet = self.doctl.get_droplet(&node.id).await.map_err(api_error)?;

            if droplet.is_active() && droplet.public_address().is_some() {
                tracing::debug!(node = %node.name, attempt, "Node is ready");
                return Ok(());
            }

            tracing::debug!(
                node = %node.name,
                status = %droplet.status,
                attempt,
                "Node not ready yet, backing off"
            );
            tokio::time::sleep(retry.delay(attempt)).await;
        }

        Err(CloudError::NodeNotReady(format!(
            "{} did not become active after {} attempts",
            node.name, retry.max_attempts
        )))
    }
}
