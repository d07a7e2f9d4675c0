//! デプロイエンジンテスト用のインメモリコラボレーター
//!
//! リモート操作・プロビジョニング・成果物生成をプロセス内で代替し、
//! 呼び出しを記録してステージの挙動を検証できるようにします。

use async_trait::async_trait;
use stackflow_artifact::{ArtifactGenerator, ArtifactError};
use stackflow_cloud::{AuthStatus, NodeInfo, NodeSpec, Provisioner, RetryConfig};
use stackflow_core::{Deployment, Infra, SshKeyMaterial};
use stackflow_remote::{RemoteError, RemoteExecutor};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// 記録された1回のリモート操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Run { host: String, command: String },
    Upload { host: String, remote_path: String },
}

/// すべての呼び出しを記録するリモートエグゼキューター
#[derive(Default)]
pub struct RecordingExecutor {
    pub calls: Mutex<Vec<RemoteCall>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 実行されたコマンドのリスト（host, command）
    pub fn commands(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                RemoteCall::Run { host, command } => Some((host.clone(), command.clone())),
                RemoteCall::Upload { .. } => None,
            })
            .collect()
    }

    #[allow(dead_code)]
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                RemoteCall::Upload { host, remote_path } => {
                    Some((host.clone(), remote_path.clone()))
                }
                RemoteCall::Run { .. } => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl RemoteExecutor for RecordingExecutor {
    async fn run(
        &self,
        _private_key: &Path,
        host: &str,
        command: &str,
    ) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(RemoteCall::Run {
            host: host.to_string(),
            command: command.to_string(),
        });
        Ok(())
    }

    async fn upload(
        &self,
        _private_key: &Path,
        host: &str,
        _local: &Path,
        remote_path: &str,
    ) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(RemoteCall::Upload {
            host: host.to_string(),
            remote_path: remote_path.to_string(),
        });
        Ok(())
    }
}

/// `203.0.113.<10+i>` のアドレスを割り当てるフェイクプロバイダー
#[derive(Debug, Default)]
pub struct FakeProvider {
    pub created: Mutex<usize>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created_count(&self) -> usize {
        *self.created.lock().unwrap()
    }
}

#[async_trait]
impl Provisioner for FakeProvider {
    fn name(&self) -> &str {
        "fakecloud"
    }

    fn display_name(&self) -> &str {
        "Fake Cloud"
    }

    async fn check_auth(&self) -> stackflow_cloud::Result<AuthStatus> {
        Ok(AuthStatus::ok("test@example.com"))
    }

    async fn import_ssh_key(
        &self,
        _name: &str,
        _public_key: &Path,
    ) -> stackflow_cloud::Result<String> {
        Ok("aa:bb:cc:dd".to_string())
    }

    async fn create_nodes(
        &self,
        spec: &NodeSpec,
        count: usize,
    ) -> stackflow_cloud::Result<Vec<NodeInfo>> {
        *self.created.lock().unwrap() += count;

        Ok((0..count)
            .map(|i| NodeInfo {
                id: format!("{}", 1000 + i),
                name: format!("{}-{}", spec.name_prefix, i),
                address: format!("203.0.113.{}", 10 + i),
            })
            .collect())
    }

    async fn wait_ready(
        &self,
        _node: &NodeInfo,
        _retry: &RetryConfig,
    ) -> stackflow_cloud::Result<()> {
        Ok(())
    }
}

/// 外部CLIを使わずにファイルを生成するフェイクアーティファクトジェネレーター
///
/// 設定レンダリングは本物のテンプレート展開を使うため、
/// ステージ側のテンプレート不備はテストで検出されます。
#[derive(Default)]
pub struct FakeArtifacts;

impl FakeArtifacts {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArtifactGenerator for FakeArtifacts {
    async fn generate_ssh_keys(&self, dir: &Path) -> Result<SshKeyMaterial, ArtifactError> {
        let ssh_dir = dir.join("ssh");
        std::fs::create_dir_all(&ssh_dir)?;

        let private = ssh_dir.join("id_rsa");
        let public = ssh_dir.join("id_rsa.pub");
        std::fs::write(&private, "fake private key")?;
        std::fs::write(&public, "ssh-rsa AAAA fake")?;

        Ok(SshKeyMaterial {
            public,
            private,
            fingerprint: "aa:bb:cc:dd".to_string(),
        })
    }

    async fn generate_ca_root(&self, dir: &Path) -> Result<BTreeMap<String, String>, ArtifactError> {
        let ca_dir = dir.join("ca");
        std::fs::create_dir_all(&ca_dir)?;

        let cert = ca_dir.join("ca.pem");
        let key = ca_dir.join("ca-key.pem");
        std::fs::write(&cert, "fake cert")?;
        std::fs::write(&key, "fake key")?;

        let mut roots = BTreeMap::new();
        roots.insert("ca-root-cert".to_string(), cert.display().to_string());
        roots.insert("ca-root-key".to_string(), key.display().to_string());
        Ok(roots)
    }

    async fn render_config(
        &self,
        dir: &Path,
        file_name: &str,
        template: &str,
        context: &tera::Context,
    ) -> Result<PathBuf, ArtifactError> {
        std::fs::create_dir_all(dir)?;

        let rendered = stackflow_artifact::render_to_string(file_name, template, context)?;
        let path = dir.join(file_name);
        std::fs::write(&path, rendered)?;
        Ok(path)
    }
}

/// テスト用のDeploymentを作業ディレクトリ付きで構築する
pub fn deployment(provider: &str, nodes: usize, infras: Vec<Infra>) -> (Deployment, TempDir) {
    let dir = tempfile::tempdir().unwrap();

    let mut deployment = Deployment {
        uri: "chronista/deploy/sample".to_string(),
        nodes,
        infras,
        ..Default::default()
    };
    deployment.service.provider = provider.to_string();
    deployment.service.token = "test-token".to_string();
    deployment.service.region = "nyc3".to_string();
    deployment.service.size = "s-2vcpu-4gb".to_string();
    deployment.service.image = "ubuntu-24-04-x64".to_string();
    deployment.config_dir = dir.path().to_path_buf();

    (deployment, dir)
}

/// master数を指定したInfraを構築する
pub fn infra(name: &str, master: usize, components: Vec<stackflow_core::Component>) -> Infra {
    Infra {
        name: name.to_string(),
        version: "1.0.0".to_string(),
        nodes: stackflow_core::InfraNodes { master },
        components,
    }
}

/// binaryとURLだけのコンポーネントを構築する
pub fn component(binary: &str) -> stackflow_core::Component {
    stackflow_core::Component {
        binary: binary.to_string(),
        url: format!("https://example.com/{}", binary),
        before: None,
        after: None,
    }
}
