//! etcdステージ
//!
//! クラスタ調整ストア（etcd）をマスターノード群にブートストラップします。
//! クライアントエンドポイントリストを `EtcdEndpoints` として公開し、
//! 以降のステージから参照できるようにします。

use super::{Stage, StageContext, StageOutcome, install_component, private_key, role_nodes};
use crate::error::Result;
use async_trait::async_trait;
use stackflow_core::{Deployment, Infra};
use tera::Context;

const ETCD_SERVICE_TEMPLATE: &str = r#"[Unit]
Description=etcd {{ version }}
Documentation=https://etcd.io
After=network.target

[Service]
Type=notify
ExecStart=/usr/local/bin/etcd \
  --name {{ name }} \
  --initial-advertise-peer-urls https://{{ address }}:2380 \
  --listen-peer-urls https://{{ address }}:2380 \
  --listen-client-urls https://{{ address }}:2379,https://127.0.0.1:2379 \
  --advertise-client-urls https://{{ address }}:2379 \
  --initial-cluster-token stackflow-etcd \
  --initial-cluster {{ initial_cluster }} \
  --initial-cluster-state new \
  --data-dir /var/lib/etcd
Restart=on-failure
RestartSec=5
LimitNOFILE=65536

[Install]
WantedBy=multi-user.target
"#;

/// クライアントエンドポイントのポート
const CLIENT_PORT: u16 = 2379;
/// ピアエンドポイントのポート
const PEER_PORT: u16 = 2380;

#[derive(Debug)]
pub struct EtcdStage;

#[async_trait]
impl Stage for EtcdStage {
    fn name(&self) -> &str {
        "etcd"
    }

    async fn run(
        &self,
        deployment: &mut Deployment,
        infra: &Infra,
        cx: &StageContext,
    ) -> Result<StageOutcome> {
        let nodes = role_nodes(deployment, infra, "etcd")?;
        let key = private_key(deployment)?;

        // クライアント/ピアの両エンドポイントリストをロール順に計算
        let client_endpoints: Vec<String> = nodes
            .iter()
            .map(|n| format!("https://{}:{}", n.address, CLIENT_PORT))
            .collect();
        let peer_endpoints: Vec<String> = nodes
            .iter()
            .map(|n| format!("{}=https://{}:{}", n.role, n.address, PEER_PORT))
            .collect();

        // 後続ステージが参照するのはクライアント側のみ
        deployment
            .outputs
            .set("EtcdEndpoints", client_endpoints.join(","));
        deployment.log(format!(
            "etcd endpoints: {}",
            client_endpoints.join(",")
        ));

        let initial_cluster = peer_endpoints.join(",");
        let stage_dir = deployment.config_dir.join("etcd");

        // ノードごとにユニットファイルをレンダリングして配布
        for (i, node) in nodes.iter().enumerate() {
            let mut context = Context::new();
            context.insert("name", &node.role);
            context.insert("address", &node.address);
            context.insert("initial_cluster", &initial_cluster);
            context.insert("version", &infra.version);

            let unit = cx
                .artifacts
                .render_config(
                    &stage_dir,
                    &format!("etcd-{}.service", i),
                    ETCD_SERVICE_TEMPLATE,
                    &context,
                )
                .await?;

            cx.executor
                .upload(&key, &node.address, &unit, "/etc/systemd/system/etcd.service")
                .await?;
        }

        for component in &infra.components {
            install_component(cx, &key, &nodes, component).await?;
        }

        // 全マスターでクラスタを起動
        for node in &nodes {
            tracing::info!(node = %node.role, "Starting etcd");
            cx.executor
                .run(
                    &key,
                    &node.address,
                    "systemctl daemon-reload && systemctl enable --now etcd",
                )
                .await?;
        }

        deployment.log(format!(
            "etcd cluster started on {} nodes",
            nodes.len()
        ));

        Ok(StageOutcome::Completed)
    }
}
