use stackflow_core::OutputsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error(
        "サービスプロバイダーと認証トークンが指定されていません。\n\
        テンプレートの service セクション、または設定ファイルで指定してください"
    )]
    MissingServiceAuth,

    #[error("SSH秘密鍵が設定されていません")]
    MissingSshKey,

    #[error("プロバイダー {provider} の認証に失敗しました: {reason}")]
    ProviderAuthFailed { provider: String, reason: String },

    #[error(
        "インフラ {infra} のマスターノード数 {masters} がデプロイメントのノード数 {nodes} を超えています"
    )]
    MasterCountExceedsNodes {
        infra: String,
        masters: usize,
        nodes: usize,
    },

    #[error("未対応のインフラです: {0}")]
    UnsupportedInfra(String),

    #[error("出力ストアエラー（インフラ {infra}）: {source}")]
    Outputs {
        infra: String,
        source: OutputsError,
    },

    #[error("コアエラー: {0}")]
    Core(#[from] stackflow_core::CoreError),

    #[error("設定エラー: {0}")]
    Config(#[from] stackflow_config::ConfigError),

    #[error("クラウドエラー: {0}")]
    Cloud(#[from] stackflow_cloud::CloudError),

    #[error("リモート実行エラー: {0}")]
    Remote(#[from] stackflow_remote::RemoteError),

    #[error("アーティファクト生成エラー: {0}")]
    Artifact(#[from] stackflow_artifact::ArtifactError),
}

pub type Result<T> = std::result::Result<T, DeployError>;
