use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("SSH鍵の生成に失敗しました: {0}")]
    KeygenFailed(String),

    #[error("フィンガープリントの取得に失敗しました: {0}")]
    FingerprintFailed(String),

    #[error("CAルート証明書の生成に失敗しました: {0}")]
    CaFailed(String),

    #[error("テンプレート展開エラー: {file}\n理由: {message}")]
    RenderFailed { file: String, message: String },

    #[error("ファイル書き込みエラー: {path}\n理由: {message}")]
    WriteFailed { path: PathBuf, message: String },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ArtifactError>;
