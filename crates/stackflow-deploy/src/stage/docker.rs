//! dockerステージ
//!
//! コンテナランタイム（docker）をブートストラップします。
//! フックはコンポーネント単位でまとめて実行されます:
//! 全プリフック → 全ノードでデーモン起動 → 全ポストフック。

use super::{Stage, StageContext, StageOutcome, install_component, private_key, role_nodes};
use crate::error::Result;
use async_trait::async_trait;
use stackflow_core::{Deployment, Infra};
use tera::Context;

const DOCKER_SERVICE_TEMPLATE: &str = r#"[Unit]
Description=docker {{ version }}
Documentation=https://docs.docker.com
After=network.target flanneld.service

[Service]
Type=notify
ExecStart=/usr/local/bin/dockerd -H unix:///var/run/docker.sock
Restart=on-failure
RestartSec=5
LimitNOFILE=1048576

[Install]
WantedBy=multi-user.target
"#;

#[derive(Debug)]
pub struct DockerStage;

#[async_trait]
impl Stage for DockerStage {
    fn name(&self) -> &str {
        "docker"
    }

    async fn run(
        &self,
        deployment: &mut Deployment,
        infra: &Infra,
        cx: &StageContext,
    ) -> Result<StageOutcome> {
        let nodes = role_nodes(deployment, infra, "docker")?;
        let key = private_key(deployment)?;

        let mut context = Context::new();
        context.insert("version", &infra.version);

        let stage_dir = deployment.config_dir.join("docker");
        let unit = cx
            .artifacts
            .render_config(
                &stage_dir,
                "docker.service",
                DOCKER_SERVICE_TEMPLATE,
                &context,
            )
            .await?;

        for node in &nodes {
            cx.executor
                .upload(
                    &key,
                    &node.address,
                    &unit,
                    "/etc/systemd/system/docker.service",
                )
                .await?;
        }

        for component in &infra.components {
            install_component(cx, &key, &nodes, component).await?;
        }

        // プリフック（ロール0で1回ずつ）
        if let Some(first) = nodes.first() {
            for component in &infra.components {
                if let Some(before) = &component.before {
                    tracing::info!(hook = %before, node = %first.role, "Running pre-hook");
                    cx.executor.run(&key, &first.address, before).await?;
                }
            }
        }

        // 全ノードでデーモンを起動
        for node in &nodes {
            tracing::info!(node = %node.role, "Starting dockerd");
            cx.executor
                .run(
                    &key,
                    &node.address,
                    "systemctl daemon-reload && systemctl enable --now docker",
                )
                .await?;
        }

        // ポストフック（ロール0で1回ずつ）
        if let Some(first) = nodes.first() {
            for component in &infra.components {
                if let Some(after) = &component.after {
                    tracing::info!(hook = %after, node = %first.role, "Running post-hook");
                    cx.executor.run(&key, &first.address, after).await?;
                }
            }
        }

        deployment.log(format!(
            "docker runtime started on {} nodes",
            nodes.len()
        ));

        Ok(StageOutcome::Completed)
    }
}
