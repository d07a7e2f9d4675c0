//! flannelステージ
//!
//! オーバーレイネットワーク（flannel）をブートストラップします。
//! etcdステージが公開した `EtcdEndpoints` に依存します。

use super::{Stage, StageContext, StageOutcome, install_component, private_key, role_nodes};
use crate::error::{DeployError, Result};
use async_trait::async_trait;
use stackflow_core::{Deployment, Infra};
use tera::Context;

const FLANNELD_SERVICE_TEMPLATE: &str = r#"[Unit]
Description=flanneld {{ version }}
Documentation=https://github.com/flannel-io/flannel
After=network.target

[Service]
Type=notify
ExecStart=/usr/local/bin/flanneld \
  -etcd-endpoints={{ endpoints }} \
  -ip-masq
Restart=on-failure
RestartSec=5

[Install]
WantedBy=multi-user.target
"#;

#[derive(Debug)]
pub struct FlannelStage;

#[async_trait]
impl Stage for FlannelStage {
    fn name(&self) -> &str {
        "flannel"
    }

    async fn run(
        &self,
        deployment: &mut Deployment,
        infra: &Infra,
        cx: &StageContext,
    ) -> Result<StageOutcome> {
        let nodes = role_nodes(deployment, infra, "flannel")?;
        let key = private_key(deployment)?;

        // etcdステージが公開したクライアントエンドポイントに依存する
        let endpoints = deployment
            .outputs
            .get_str("EtcdEndpoints")
            .map_err(|source| DeployError::Outputs {
                infra: infra.name.clone(),
                source,
            })?
            .to_string();

        let mut context = Context::new();
        context.insert("endpoints", &endpoints);
        context.insert("version", &infra.version);

        let stage_dir = deployment.config_dir.join("flannel");
        let unit = cx
            .artifacts
            .render_config(
                &stage_dir,
                "flanneld.service",
                FLANNELD_SERVICE_TEMPLATE,
                &context,
            )
            .await?;

        for node in &nodes {
            cx.executor
                .upload(
                    &key,
                    &node.address,
                    &unit,
                    "/etc/systemd/system/flanneld.service",
                )
                .await?;
        }

        for component in &infra.components {
            install_component(cx, &key, &nodes, component).await?;
        }

        // 宣言されたプリフックはロール0のノードで1回だけ実行する。
        // エンドポイントリストを引数として渡す。
        if let Some(first) = nodes.first() {
            for component in &infra.components {
                if let Some(before) = &component.before {
                    tracing::info!(hook = %before, node = %first.role, "Running pre-hook");
                    cx.executor
                        .run(&key, &first.address, &format!("{} {}", before, endpoints))
                        .await?;
                }
            }
        }

        for node in &nodes {
            tracing::info!(node = %node.role, "Starting flanneld");
            cx.executor
                .run(
                    &key,
                    &node.address,
                    "systemctl daemon-reload && systemctl enable --now flanneld",
                )
                .await?;
        }

        deployment.log(format!(
            "flannel overlay network started on {} nodes",
            nodes.len()
        ));

        Ok(StageOutcome::Completed)
    }
}
