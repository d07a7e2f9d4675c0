//! デプロイオーケストレーター
//!
//! 認証チェック → SSH鍵準備 → プロバイダー選択 → ノード作成 →
//! ルート証明書生成・配布 → ステージパイプラインの順で実行します。
//! 各ステップは最初のエラーで全体を中断します。

use crate::error::{DeployError, Result};
use crate::stage::{StageContext, StageOutcome, StageRegistry, private_key};
use stackflow_artifact::ArtifactGenerator;
use stackflow_cloud::{NodeSpec, ProviderRegistry, RetryConfig};
use stackflow_core::{Deployment, node_key};
use stackflow_remote::RemoteExecutor;
use std::path::Path;
use std::sync::Arc;

/// ノードに配布したルート証明書の置き場所
const REMOTE_SSL_DIR: &str = "/etc/stackflow/ssl";

/// 1ステージ分の実行結果
#[derive(Debug, Clone)]
pub struct StageReport {
    pub infra: String,
    pub outcome: StageOutcome,
}

/// デプロイ全体の実行結果
///
/// ステージはテンプレート記載順に記録されます。未実装ステージは
/// `NotImplemented` として区別できます（成功扱いにはしません）。
#[derive(Debug, Clone, Default)]
pub struct DeployReport {
    pub stages: Vec<StageReport>,
}

impl DeployReport {
    fn record(&mut self, infra: &str, outcome: StageOutcome) {
        self.stages.push(StageReport {
            infra: infra.to_string(),
            outcome,
        });
    }

    /// すべてのステージが実際にデプロイされたか
    pub fn is_fully_implemented(&self) -> bool {
        self.stages
            .iter()
            .all(|s| s.outcome == StageOutcome::Completed)
    }
}

/// デプロイオーケストレーター
pub struct Deployer {
    providers: ProviderRegistry,
    stages: StageRegistry,
    executor: Arc<dyn RemoteExecutor>,
    artifacts: Arc<dyn ArtifactGenerator>,
    retry: RetryConfig,
}

impl Deployer {
    pub fn new(
        providers: ProviderRegistry,
        stages: StageRegistry,
        executor: Arc<dyn RemoteExecutor>,
        artifacts: Arc<dyn ArtifactGenerator>,
    ) -> Self {
        Self {
            providers,
            stages,
            executor,
            artifacts,
            retry: RetryConfig::default(),
        }
    }

    /// ノード作成後の準備完了ポーリング設定を差し替える
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// デプロイを実行する
    pub async fn deploy(&self, deployment: &mut Deployment) -> Result<DeployReport> {
        self.check_service_auth(deployment)?;
        self.ensure_ssh_keys(deployment).await?;

        // プロバイダー解決はノード作成より前。未対応ならここで中断する
        let provider = self.providers.get(&deployment.service.provider)?;

        let auth = provider.check_auth().await?;
        if !auth.authenticated {
            return Err(DeployError::ProviderAuthFailed {
                provider: provider.name().to_string(),
                reason: auth.error.unwrap_or_else(|| "unknown".to_string()),
            });
        }

        let (_, _, name) = deployment.uris()?;

        // 公開鍵をプロバイダーに登録
        let public = deployment
            .tools
            .ssh
            .public
            .clone()
            .ok_or(DeployError::MissingSshKey)?;
        let fingerprint = provider
            .import_ssh_key(&format!("stackflow-{}", name), &public)
            .await?;

        // ノード作成と準備完了待ち
        let spec = NodeSpec {
            name_prefix: name,
            region: deployment.service.region.clone(),
            size: deployment.service.size.clone(),
            image: deployment.service.image.clone(),
            ssh_fingerprint: fingerprint,
        };

        let nodes = provider.create_nodes(&spec, deployment.nodes).await?;

        for (i, node) in nodes.iter().enumerate() {
            provider.wait_ready(node, &self.retry).await?;
            deployment.log(format!(
                "Node {} created successfully, address: {}",
                i, node.address
            ));
            deployment.outputs.set(node_key(i), node.address.clone());
        }

        // ルート証明書を生成して全ノードに配布
        let roots = self
            .artifacts
            .generate_ca_root(&deployment.config_dir)
            .await?;
        deployment.log("CA root material generated successfully");

        for (key, value) in &roots {
            deployment.outputs.set(key.clone(), value.clone());
        }

        let key = private_key(deployment)?;
        for node in &nodes {
            self.executor
                .run(&key, &node.address, &format!("mkdir -p {}", REMOTE_SSL_DIR))
                .await?;

            for path in roots.values() {
                let local = Path::new(path);
                let file_name = local
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.executor
                    .upload(
                        &key,
                        &node.address,
                        local,
                        &format!("{}/{}", REMOTE_SSL_DIR, file_name),
                    )
                    .await?;
            }
        }

        // ステージパイプライン（テンプレート記載順、並べ替えなし）
        let cx = StageContext {
            executor: self.executor.clone(),
            artifacts: self.artifacts.clone(),
        };

        let mut report = DeployReport::default();
        let infras = deployment.infras.clone();

        for infra in &infras {
            let stage = self.stages.get(&infra.name)?;

            tracing::info!(infra = %infra.name, version = %infra.version, "Running stage");
            deployment.log(format!("Deploying {} {}", infra.name, infra.version));

            let outcome = stage.run(deployment, infra, &cx).await?;
            report.record(&infra.name, outcome);
        }

        Ok(report)
    }

    /// テンプレートの認証情報を検証し、なければ設定ファイルにフォールバックする
    fn check_service_auth(&self, deployment: &mut Deployment) -> Result<()> {
        if deployment.service.has_auth() {
            return Ok(());
        }

        let defaults = stackflow_config::load_default_config()?;
        if !defaults.has_auth() {
            return Err(DeployError::MissingServiceAuth);
        }

        tracing::debug!(provider = %defaults.provider, "Using default service configuration");
        deployment.service.provider = defaults.provider;
        deployment.service.token = defaults.token;
        Ok(())
    }

    /// SSH鍵ペアを準備する
    ///
    /// テンプレートで指定されていればファイルの実在を検証し、
    /// なければ作業ディレクトリに生成します。
    async fn ensure_ssh_keys(&self, deployment: &mut Deployment) -> Result<()> {
        if deployment.tools.ssh.is_configured() {
            deployment.tools.ssh.check_files()?;
            return Ok(());
        }

        let material = self
            .artifacts
            .generate_ssh_keys(&deployment.config_dir)
            .await?;

        deployment.log(format!(
            "Generate SSH key files successfully, fingerprint is {}\nPublic key file @ {}\nPrivate key file @ {}",
            material.fingerprint,
            material.public.display(),
            material.private.display()
        ));

        deployment.tools.ssh.public = Some(material.public);
        deployment.tools.ssh.private = Some(material.private);
        deployment.tools.ssh.fingerprint = Some(material.fingerprint);

        Ok(())
    }
}
