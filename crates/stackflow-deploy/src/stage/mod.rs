//! ステージ実行
//!
//! 1つのインフラ層を対象ノード群にブートストラップする実行単位です。
//! ステージは名前でレジストリに登録され、テンプレートの記載順に
//! ディスパッチされます。

mod docker;
mod etcd;
mod flannel;
mod kubernetes;

pub use docker::DockerStage;
pub use etcd::EtcdStage;
pub use flannel::FlannelStage;
pub use kubernetes::KubernetesStage;

use crate::error::{DeployError, Result};
use async_trait::async_trait;
use stackflow_artifact::ArtifactGenerator;
use stackflow_core::{Component, Deployment, Infra};
use stackflow_remote::RemoteExecutor;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// ステージ実行の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// ステージは全ノードで完了した
    Completed,
    /// ステージは未実装（何もデプロイされていない）
    NotImplemented,
}

impl std::fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageOutcome::Completed => write!(f, "completed"),
            StageOutcome::NotImplemented => write!(f, "not implemented"),
        }
    }
}

/// ステージが利用する共有コラボレーター
pub struct StageContext {
    pub executor: Arc<dyn RemoteExecutor>,
    pub artifacts: Arc<dyn ArtifactGenerator>,
}

/// 1つのインフラ層のブートストラップを担当する実行単位
#[async_trait]
pub trait Stage: Send + Sync + std::fmt::Debug {
    /// テンプレートの infra 名に対応するステージ名
    fn name(&self) -> &str;

    /// ステージを実行する
    ///
    /// 出力ストアへの読み書きは deployment を通して行います。
    /// 最初に失敗したリモート操作・生成処理でステージ全体を中断します。
    async fn run(
        &self,
        deployment: &mut Deployment,
        infra: &Infra,
        cx: &StageContext,
    ) -> Result<StageOutcome>;
}

/// ステージレジストリ
///
/// インフラ名 → ステージ実装の対応表。起動時に一度構築されます。
#[derive(Default)]
pub struct StageRegistry {
    stages: HashMap<String, Arc<dyn Stage>>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 標準の4ステージを登録したレジストリを構築する
    pub fn defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(EtcdStage));
        registry.register(Arc::new(FlannelStage));
        registry.register(Arc::new(DockerStage));
        registry.register(Arc::new(KubernetesStage));
        registry
    }

    pub fn register(&mut self, stage: Arc<dyn Stage>) {
        tracing::debug!(stage = stage.name(), "Registering stage");
        self.stages.insert(stage.name().to_string(), stage);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Stage>> {
        self.stages
            .get(name)
            .cloned()
            .ok_or_else(|| DeployError::UnsupportedInfra(name.to_string()))
    }
}

/// ロール割り当て済みのノード
#[derive(Debug, Clone)]
pub(crate) struct RoleNode {
    /// 論理名（例: etcd-node-0）
    pub role: String,
    /// ノードアドレス
    pub address: String,
}

/// ロールマッピングを構築する
///
/// マスターノード数を検証し、出力ストアの `NODE_<i>` から
/// ロール順にアドレスを引き直します。
pub(crate) fn role_nodes(
    deployment: &Deployment,
    infra: &Infra,
    service: &str,
) -> Result<Vec<RoleNode>> {
    if infra.nodes.master > deployment.nodes {
        return Err(DeployError::MasterCountExceedsNodes {
            infra: infra.name.clone(),
            masters: infra.nodes.master,
            nodes: deployment.nodes,
        });
    }

    (0..infra.nodes.master)
        .map(|i| {
            let address = deployment
                .outputs
                .node_address(i)
                .map_err(|source| DeployError::Outputs {
                    infra: infra.name.clone(),
                    source,
                })?;

            Ok(RoleNode {
                role: format!("{}-node-{}", service, i),
                address: address.to_string(),
            })
        })
        .collect()
}

/// SSH秘密鍵のパスを取得する
pub(crate) fn private_key(deployment: &Deployment) -> Result<PathBuf> {
    deployment
        .tools
        .ssh
        .private
        .clone()
        .ok_or(DeployError::MissingSshKey)
}

/// コンポーネントのバイナリを全ロールノードにインストールする
pub(crate) async fn install_component(
    cx: &StageContext,
    key: &std::path::Path,
    nodes: &[RoleNode],
    component: &Component,
) -> Result<()> {
    let download = format!(
        "curl -L {} -o /usr/local/bin/{}",
        component.url, component.binary
    );
    let chmod = format!("chmod +x /usr/local/bin/{}", component.binary);

    for node in nodes {
        tracing::debug!(binary = %component.binary, node = %node.role, "Installing binary");
        cx.executor.run(key, &node.address, &download).await?;
        cx.executor.run(key, &node.address, &chmod).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackflow_core::InfraNodes;

    fn deployment_with_nodes(count: usize) -> Deployment {
        let mut deployment = Deployment {
            nodes: count,
            ..Default::default()
        };
        for i in 0..count {
            deployment
                .outputs
                .set(stackflow_core::node_key(i), format!("203.0.113.{}", 10 + i));
        }
        deployment
    }

    #[test]
    fn test_role_nodes_order() {
        let deployment = deployment_with_nodes(3);
        let infra = Infra {
            name: "etcd".to_string(),
            nodes: InfraNodes { master: 2 },
            ..Default::default()
        };

        let nodes = role_nodes(&deployment, &infra, "etcd").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].role, "etcd-node-0");
        assert_eq!(nodes[0].address, "203.0.113.10");
        assert_eq!(nodes[1].role, "etcd-node-1");
        assert_eq!(nodes[1].address, "203.0.113.11");
    }

    #[test]
    fn test_role_nodes_master_count_limit() {
        let deployment = deployment_with_nodes(1);
        let infra = Infra {
            name: "etcd".to_string(),
            nodes: InfraNodes { master: 2 },
            ..Default::default()
        };

        let err = role_nodes(&deployment, &infra, "etcd").unwrap_err();
        match err {
            DeployError::MasterCountExceedsNodes {
                infra,
                masters,
                nodes,
            } => {
                assert_eq!(infra, "etcd");
                assert_eq!(masters, 2);
                assert_eq!(nodes, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_role_nodes_missing_node_output() {
        // ノード数は合っているが出力ストアに NODE_1 がない
        let mut deployment = deployment_with_nodes(1);
        deployment.nodes = 2;
        let infra = Infra {
            name: "etcd".to_string(),
            nodes: InfraNodes { master: 2 },
            ..Default::default()
        };

        let err = role_nodes(&deployment, &infra, "etcd").unwrap_err();
        assert!(matches!(err, DeployError::Outputs { .. }));
    }

    #[test]
    fn test_stage_registry_defaults() {
        let registry = StageRegistry::defaults();

        for name in ["etcd", "flannel", "docker", "kubernetes"] {
            assert!(registry.get(name).is_ok(), "{} が未登録", name);
        }

        let err = registry.get("mesos").unwrap_err();
        assert!(matches!(err, DeployError::UnsupportedInfra(ref n) if n == "mesos"));
    }
}
