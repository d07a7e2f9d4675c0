//! モデル定義
//!
//! デプロイメントテンプレートのデータモデルを定義します。
//! 各モデルは機能ごとにモジュールに分離されています。

mod deployment;
mod infra;
mod outputs;

// Re-exports
pub use deployment::*;
pub use infra::*;
pub use outputs::*;
