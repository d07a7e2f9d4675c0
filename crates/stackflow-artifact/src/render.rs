//! テンプレート展開
//!
//! Teraを使用して設定ファイル・systemdユニットのテンプレート展開を行います。

use crate::error::{ArtifactError, Result};
use tera::{Context, Tera};

/// 文字列テンプレートをコンテキストで展開する
pub fn render_to_string(name: &str, template: &str, context: &Context) -> Result<String> {
    Tera::one_off(template, context, false).map_err(|e| ArtifactError::RenderFailed {
        file: name.to_string(),
        message: collect_error_chain(&e),
    })
}

/// Teraのエラーチェーンを1つのメッセージにまとめる
///
/// 未定義変数などの原因はsource側に埋まっているため、チェーン全体を連結します。
fn collect_error_chain(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }

    details.join(" | ")
}
