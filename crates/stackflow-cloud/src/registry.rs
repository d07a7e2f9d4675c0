//! Provider registry
//!
//! Lookup table mapping template provider names to `Provisioner`
//! implementations. Built once at startup; adding a provider means
//! registering it here, not touching the dispatch path.

use crate::error::{CloudError, Result};
use crate::provider::Provisioner;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available provisioners, keyed by provider name
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provisioner>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provisioner under its own name
    pub fn register(&mut self, provider: Arc<dyn Provisioner>) {
        tracing::debug!(provider = provider.name(), "Registering provisioner");
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Look up a provisioner by template provider name
    pub fn get(&self, name: &str) -> Result<Arc<dyn Provisioner>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| CloudError::UnsupportedProvider(name.to_string()))
    }

    /// Registered provider names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{AuthStatus, NodeInfo, NodeSpec, RetryConfig};
    use async_trait::async_trait;
    use std::path::Path;

    #[derive(Debug)]
    struct FakeProvider;

    #[async_trait]
    impl Provisioner for FakeProvider {
        fn name(&self) -> &str {
            "fakecloud"
        }

        fn display_name(&self) -> &str {
            "Fake Cloud"
        }

        async fn check_auth(&self) -> crate::Result<AuthStatus> {
            Ok(AuthStatus::ok("fake"))
        }

        async fn import_ssh_key(&self, _name: &str, _public_key: &Path) -> crate::Result<String> {
            Ok("aa:bb".to_string())
        }

        async fn create_nodes(
            &self,
            _spec: &NodeSpec,
            count: usize,
        ) -> crate::Result<Vec<NodeInfo>> {
            Ok((0..count)
                .map(|i| NodeInfo {
                    id: i.to_string(),
                    name: format!("node-{}", i),
                    address: format!("203.0.113.{}", 10 + i),
                })
                .collect())
        }

        async fn wait_ready(
            &self,
            _node: &NodeInfo,
            _retry: &RetryConfig,
        ) -> crate::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(FakeProvider));

        assert!(registry.get("fakecloud").is_ok());
        assert_eq!(registry.names(), vec!["fakecloud"]);
    }

    #[test]
    fn test_unknown_provider() {
        let registry = ProviderRegistry::new();

        let err = registry.get("testcloud").unwrap_err();
        assert!(matches!(err, CloudError::UnsupportedProvider(ref name) if name == "testcloud"));
        assert!(err.to_string().contains("testcloud"));
    }
}
