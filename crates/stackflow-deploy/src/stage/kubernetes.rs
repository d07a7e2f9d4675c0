//! kubernetesステージ
//!
//! オーケストレーター層のプレースホルダー。
//! まだ何もデプロイせず、未実装であることを結果として返します。
//! 呼び出し側はこのステージの成功をもってオーケストレーターが
//! 配備されたと見なしてはいけません。

use super::{Stage, StageContext, StageOutcome};
use crate::error::Result;
use async_trait::async_trait;
use stackflow_core::{Deployment, Infra};

#[derive(Debug)]
pub struct KubernetesStage;

#[async_trait]
impl Stage for KubernetesStage {
    fn name(&self) -> &str {
        "kubernetes"
    }

    async fn run(
        &self,
        deployment: &mut Deployment,
        infra: &Infra,
        _cx: &StageContext,
    ) -> Result<StageOutcome> {
        tracing::warn!(version = %infra.version, "kubernetes stage is not implemented yet");
        deployment.log("kubernetes stage is not implemented yet, skipping");

        Ok(StageOutcome::NotImplemented)
    }
}
