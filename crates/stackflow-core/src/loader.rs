//! テンプレートローダー
//!
//! YAML / JSON テンプレートを読み込んで [`Deployment`] を生成します。
//! 拡張子が `.json` の場合はJSON、それ以外はYAMLとしてパースします。

use crate::error::{CoreError, Result};
use crate::model::Deployment;
use std::path::Path;
use tracing::{debug, info};

/// テンプレートファイルから Deployment をロードする
///
/// パース後にURIの形式を検証し、作業ディレクトリを初期化します。
pub fn load_deployment(path: &Path, verbose: bool, timestamp: bool) -> Result<Deployment> {
    debug!(template = %path.display(), "Loading deployment template");

    let content = std::fs::read_to_string(path).map_err(|e| CoreError::TemplateRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let mut deployment: Deployment = if is_json {
        serde_json::from_str(&content).map_err(|e| CoreError::TemplateParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|e| CoreError::TemplateParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    deployment.uris()?;

    deployment.verbose = verbose;
    deployment.timestamp = timestamp;
    deployment.init_config_dir(None)?;

    info!(
        uri = %deployment.uri,
        nodes = deployment.nodes,
        infras = deployment.infras.len(),
        "Deployment template loaded"
    );

    Ok(deployment)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML_TEMPLATE: &str = r#"
uri: chronista/deploy/sample
service:
  provider: digitalocean
  region: nyc3
  size: s-2vcpu-4gb
  image: ubuntu-24-04-x64
  token: do-token
nodes: 3
infras:
  - name: etcd
    version: "3.5.16"
    nodes:
      master: 3
    components:
      - binary: etcd
        url: https://example.com/etcd
      - binary: etcdctl
        url: https://example.com/etcdctl
  - name: flannel
    version: "0.26.2"
    nodes:
      master: 3
    components:
      - binary: flanneld
        url: https://example.com/flanneld
        before: setup-network.sh
"#;

    fn write_template(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_yaml_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_template(&dir, "deploy.yaml", YAML_TEMPLATE);

        let deployment = load_deployment(&path, false, false).unwrap();

        assert_eq!(deployment.uri, "chronista/deploy/sample");
        assert_eq!(deployment.service.provider, "digitalocean");
        assert_eq!(deployment.nodes, 3);
        assert_eq!(deployment.infras.len(), 2);
        assert_eq!(deployment.infras[0].name, "etcd");
        assert_eq!(deployment.infras[0].nodes.master, 3);
        assert_eq!(deployment.infras[1].components[0].before.as_deref(), Some("setup-network.sh"));
    }

    #[test]
    fn test_load_json_template() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{
            "uri": "chronista/deploy/sample",
            "service": {"provider": "digitalocean", "token": "do-token"},
            "nodes": 1,
            "infras": [
                {"name": "etcd", "version": "3.5.16", "nodes": {"master": 1},
                 "components": [{"binary": "etcd", "url": "https://example.com/etcd"}]}
            ]
        }"#;
        let path = write_template(&dir, "deploy.json", json);

        let deployment = load_deployment(&path, false, false).unwrap();

        assert_eq!(deployment.nodes, 1);
        assert_eq!(deployment.infras[0].name, "etcd");
    }

    #[test]
    fn test_load_invalid_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_template(&dir, "deploy.yaml", "uri: not-a-valid-uri\nnodes: 1\n");

        let err = load_deployment(&path, false, false).unwrap_err();
        assert!(matches!(err, CoreError::InvalidUri(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");

        let err = load_deployment(&path, false, false).unwrap_err();
        assert!(matches!(err, CoreError::TemplateRead { .. }));
    }

    #[test]
    fn test_load_broken_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_template(&dir, "deploy.yaml", "uri: [unclosed\n");

        let err = load_deployment(&path, false, false).unwrap_err();
        assert!(matches!(err, CoreError::TemplateParse { .. }));
    }
}
