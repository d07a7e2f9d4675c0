use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("不正なデプロイメントURI: {0}（namespace/repository/name 形式で指定してください）")]
    InvalidUri(String),

    #[error("テンプレート読み込みエラー: {path}\n理由: {message}")]
    TemplateRead { path: PathBuf, message: String },

    #[error("テンプレートパースエラー: {path}\n理由: {message}")]
    TemplateParse { path: PathBuf, message: String },

    #[error("ホームディレクトリが見つかりません")]
    HomeDirNotFound,

    #[error("SSH鍵ファイルが見つかりません: {0}")]
    SshKeyNotFound(PathBuf),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 変換エラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML 変換エラー: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
