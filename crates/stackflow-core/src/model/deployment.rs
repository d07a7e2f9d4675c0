//! デプロイメント定義
//!
//! Deployment はテンプレートから生成される集約ルートです。
//! プロビジョニングと各ステージの実行はこの構造体を通して状態を共有します。

use super::infra::Infra;
use super::outputs::Outputs;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// デプロイメント - 1回の実行の設計図
///
/// テンプレート（YAML / JSON）をパースして生成され、
/// ノード作成から各インフラステージの完了まで生存します。
/// プロセス終了後に残るのは生成されたファイルのみです。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deployment {
    /// デプロイメントURI（namespace/repository/name）
    pub uri: String,
    /// サービスプロバイダー設定
    #[serde(default)]
    pub service: Service,
    /// 作成するノード数
    #[serde(default)]
    pub nodes: usize,
    /// インフラコンポーネントのリスト（テンプレート記載順に実行）
    #[serde(default)]
    pub infras: Vec<Infra>,
    /// ツール設定（SSH鍵など）
    #[serde(default)]
    pub tools: Tools,
    /// 作業ディレクトリ（生成した鍵・証明書・設定ファイルの置き場所）
    #[serde(skip)]
    pub config_dir: PathBuf,
    /// ステージ間で共有する出力ストア
    #[serde(skip)]
    pub outputs: Outputs,
    /// タイムスタンプ付きの実行ログ（追記のみ）
    #[serde(skip)]
    pub logs: Vec<String>,
    /// ログを標準出力にも出す
    #[serde(skip)]
    pub verbose: bool,
    /// 標準出力にタイムスタンプを含める
    #[serde(skip)]
    pub timestamp: bool,
}

impl Deployment {
    /// URIを namespace / repository / name に分解
    pub fn uris(&self) -> Result<(String, String, String)> {
        let parts: Vec<&str> = self.uri.split('/').collect();

        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(CoreError::InvalidUri(self.uri.clone()));
        }

        Ok((
            parts[0].to_string(),
            parts[1].to_string(),
            parts[2].to_string(),
        ))
    }

    /// ログに1行追記する
    ///
    /// verbose 時は標準出力にも出力します（timestamp 指定時はタイムスタンプ付き）。
    pub fn log(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref().trim_end();
        let stamped = format!("[{}] {}", chrono::Local::now().to_rfc3339(), line);

        if self.verbose {
            if self.timestamp {
                println!("{}", stamped);
            } else {
                println!("{}", line);
            }
        }

        self.logs.push(stamped);
    }

    /// JSON形式でエクスポート
    pub fn json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// YAML形式でエクスポート
    pub fn yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// 作業ディレクトリを初期化する
    ///
    /// 未指定の場合は `~/.stackflow` を使用し、存在しなければ作成します。
    pub fn init_config_dir(&mut self, path: Option<PathBuf>) -> Result<()> {
        self.config_dir = match path {
            Some(path) => path,
            None => dirs::home_dir()
                .ok_or(CoreError::HomeDirNotFound)?
                .join(".stackflow"),
        };

        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
            tracing::debug!(dir = %self.config_dir.display(), "Created working directory");
        }

        Ok(())
    }
}

/// サービスプロバイダー設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    /// プロバイダー名（digitalocean など）
    #[serde(default)]
    pub provider: String,
    /// リージョン
    #[serde(default)]
    pub region: String,
    /// ノードサイズ（プラン）
    #[serde(default)]
    pub size: String,
    /// OSイメージ
    #[serde(default)]
    pub image: String,
    /// APIトークン
    #[serde(default)]
    pub token: String,
}

impl Service {
    /// プロバイダーと認証トークンが揃っているか
    pub fn has_auth(&self) -> bool {
        !self.provider.is_empty() && !self.token.is_empty()
    }
}

/// ツール設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tools {
    /// SSH鍵設定
    #[serde(default)]
    pub ssh: SshKey,
}

/// SSH鍵設定
///
/// テンプレートで未指定の場合、デプロイ時に作業ディレクトリへ生成されます。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SshKey {
    /// 公開鍵ファイルのパス
    #[serde(default)]
    pub public: Option<PathBuf>,
    /// 秘密鍵ファイルのパス
    #[serde(default)]
    pub private: Option<PathBuf>,
    /// 公開鍵のフィンガープリント
    #[serde(default)]
    pub fingerprint: Option<String>,
}

impl SshKey {
    /// 鍵ペアのパスが両方設定されているか
    pub fn is_configured(&self) -> bool {
        self.public.is_some() && self.private.is_some()
    }

    /// 設定済みの鍵ファイルが実在するか検証
    pub fn check_files(&self) -> Result<()> {
        for path in [&self.public, &self.private].into_iter().flatten() {
            if !path.exists() {
                return Err(CoreError::SshKeyNotFound(path.clone()));
            }
        }
        Ok(())
    }
}

/// 生成済みSSH鍵マテリアル
#[derive(Debug, Clone)]
pub struct SshKeyMaterial {
    pub public: PathBuf,
    pub private: PathBuf,
    pub fingerprint: String,
}
