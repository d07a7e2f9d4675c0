//! StackFlow の設定管理
//!
//! テンプレートにプロバイダーと認証トークンが記載されていない場合の
//! フォールバック設定（`~/.config/stackflow/config.yaml`）を提供します。

pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// プロセス全体のデフォルト設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultConfig {
    /// デフォルトのサービスプロバイダー名
    #[serde(default)]
    pub provider: String,
    /// デフォルトのAPIトークン
    #[serde(default)]
    pub token: String,
}

impl DefaultConfig {
    /// プロバイダーとトークンが揃っているか
    pub fn has_auth(&self) -> bool {
        !self.provider.is_empty() && !self.token.is_empty()
    }
}

/// StackFlowの設定ディレクトリを取得
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("stackflow");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// 設定ファイルのパスを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 STACK_CONFIG_PATH (直接パス指定)
/// 2. ~/.config/stackflow/config.yaml
pub fn find_config_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var("STACK_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("stackflow").join("config.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// デフォルト設定をロードする
///
/// 設定ファイルが存在しない場合は空のデフォルト値を返します。
/// テンプレート側に認証情報がない場合のフォールバックとして使います。
pub fn load_default_config() -> Result<DefaultConfig> {
    match find_config_file() {
        Ok(path) => {
            let content = std::fs::read_to_string(&path)?;
            Ok(serde_yaml::from_str(&content)?)
        }
        Err(ConfigError::ConfigFileNotFound) => Ok(DefaultConfig::default()),
        Err(e) => Err(e),
    }
}
