//! StackFlow コア
//!
//! デプロイメントテンプレートのデータモデルとローダーを提供します。
//! テンプレート（YAML / JSON）をパースして [`Deployment`] を生成し、
//! 各ステージが共有する出力ストア [`Outputs`] を保持します。

pub mod error;
pub mod loader;
pub mod model;

pub use error::{CoreError, Result};
pub use loader::load_deployment;
pub use model::*;
