//! アーティファクト生成
//!
//! デプロイに必要なローカル成果物（SSH鍵ペア・CAルート証明書・
//! レンダリング済み設定ファイル）を作業ディレクトリに生成します。
//! 生成は [`ArtifactGenerator`] トレイト越しに行われるため、
//! デプロイエンジンのテストではインメモリ実装に差し替えられます。

pub mod error;
pub mod generator;
pub mod render;

pub use error::{ArtifactError, Result};
pub use generator::{ArtifactGenerator, LocalArtifactGenerator};
pub use render::render_to_string;
