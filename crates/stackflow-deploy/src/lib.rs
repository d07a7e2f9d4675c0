//! StackFlow デプロイエンジン
//!
//! テンプレートから生成された [`Deployment`](stackflow_core::Deployment) を受け取り、
//! ノード作成 → ルート証明書配布 → インフラステージ（etcd / flannel /
//! docker / kubernetes）の順で実行します。
//!
//! 状態はステージ間で出力ストアのみを通して受け渡されます。
//! 最初のエラーで実行全体が中断され、ロールバックは行いません。

pub mod deployer;
pub mod error;
pub mod stage;

pub use deployer::{DeployReport, Deployer, StageReport};
pub use error::{DeployError, Result};
pub use stage::{Stage, StageContext, StageOutcome, StageRegistry};
