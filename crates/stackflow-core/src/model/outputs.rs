//! 出力ストア
//!
//! ステージ間で引き継ぐ成果物（ノードアドレス・生成した鍵・
//! エンドポイントリストなど）を保持するキーバリューストアです。
//! キーは一意で、同じキーへの書き込みは上書きになります（後勝ち）。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OutputsError {
    #[error("出力キーが見つかりません: {key}（先行ステージが公開していない可能性があります）")]
    MissingKey { key: String },

    #[error("出力キー {key} の型が不正です（期待: {expected}）")]
    WrongType { key: String, expected: &'static str },
}

/// ノードアドレスの出力キー（`NODE_<index>`、作成順・0始まり）
pub fn node_key(index: usize) -> String {
    format!("NODE_{}", index)
}

/// ステージ間で共有する出力ストア
///
/// あるステージが公開したキーは、以降の全ステージから参照できます。
/// 型付きアクセサは欠落・型不一致を [`OutputsError`] として返します。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(flatten)]
    values: HashMap<String, serde_json::Value>,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// キーに値を設定する（既存キーは上書き）
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// 生の値を取得する
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// 文字列として取得する
    pub fn get_str(&self, key: &str) -> Result<&str, OutputsError> {
        let value = self.values.get(key).ok_or_else(|| OutputsError::MissingKey {
            key: key.to_string(),
        })?;

        value.as_str().ok_or(OutputsError::WrongType {
            key: key.to_string(),
            expected: "string",
        })
    }

    /// ノード `index` のアドレスを取得する
    pub fn node_address(&self, index: usize) -> Result<&str, OutputsError> {
        self.get_str(&node_key(index))
    }

    /// カンマ結合されたエンドポイントリストを分解して取得する
    pub fn endpoint_list(&self, key: &str) -> Result<Vec<String>, OutputsError> {
        let joined = self.get_str(key)?;
        Ok(joined.split(',').map(|s| s.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }
}
