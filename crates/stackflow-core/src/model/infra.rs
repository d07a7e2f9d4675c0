//! インフラコンポーネント定義

use serde::{Deserialize, Serialize};

/// インフラコンポーネント記述子
///
/// 1つのインフラ層（etcd / flannel / docker / kubernetes）の
/// バージョン・対象ノード数・インストールするコンポーネントを定義します。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Infra {
    /// インフラ名（etcd, flannel, docker, kubernetes）
    pub name: String,
    /// バージョン文字列
    #[serde(default)]
    pub version: String,
    /// このインフラを担当するノード数
    #[serde(default)]
    pub nodes: InfraNodes,
    /// インストールするコンポーネントのリスト（記載順に処理）
    #[serde(default)]
    pub components: Vec<Component>,
}

/// インフラごとのノード割り当て
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfraNodes {
    /// マスターとして動作するノード数
    #[serde(default)]
    pub master: usize,
}

/// インストール単位
///
/// before / after のフックスクリプトは、宣言されていれば
/// ロール0のノード上で1回だけ実行されます。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Component {
    /// バイナリ名（/usr/local/bin 配下に配置される）
    pub binary: String,
    /// ダウンロードURL
    pub url: String,
    /// インストール後・デーモン起動前に実行するスクリプト
    #[serde(default)]
    pub before: Option<String>,
    /// デーモン起動後に実行するスクリプト
    #[serde(default)]
    pub after: Option<String>,
}
