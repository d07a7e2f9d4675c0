//! アーティファクトジェネレーター
//!
//! SSH鍵ペア・CAルート証明書・設定ファイルの生成を担当します。
//! 鍵と証明書は `ssh-keygen` / `openssl` のCLIをラップして生成します。

use crate::error::{ArtifactError, Result};
use crate::render::render_to_string;
use async_trait::async_trait;
use stackflow_core::SshKeyMaterial;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tera::Context;
use tokio::process::Command;

/// ローカル成果物の生成インターフェース
#[async_trait]
pub trait ArtifactGenerator: Send + Sync {
    /// SSH鍵ペアを `dir/ssh/` に生成してフィンガープリントを返す
    async fn generate_ssh_keys(&self, dir: &Path) -> Result<SshKeyMaterial>;

    /// CAルート証明書と秘密鍵を `dir/ca/` に生成する
    ///
    /// 戻り値は成果物名 → 生成ファイルパスのマップ（出力ストアに公開される）。
    async fn generate_ca_root(&self, dir: &Path) -> Result<BTreeMap<String, String>>;

    /// テンプレートを展開して `dir/<file_name>` に書き出す
    async fn render_config(
        &self,
        dir: &Path,
        file_name: &str,
        template: &str,
        context: &Context,
    ) -> Result<PathBuf>;
}

/// CLIツール（ssh-keygen / openssl）ベースの実装
#[derive(Debug, Default)]
pub struct LocalArtifactGenerator;

impl LocalArtifactGenerator {
    pub fn new() -> Self {
        Self
    }
}

async fn run_tool(
    program: &str,
    args: &[&str],
    on_error: impl FnOnce(String) -> ArtifactError,
) -> Result<()> {
    tracing::debug!("Running: {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(on_error(stderr.to_string()));
    }

    Ok(())
}

/// `ssh-keygen -lf` の出力からフィンガープリント部分を取り出す
///
/// 出力形式: `4096 SHA256:xxxx comment (RSA)`
fn parse_fingerprint(output: &str) -> Result<String> {
    output
        .split_whitespace()
        .nth(1)
        .map(|s| s.to_string())
        .ok_or_else(|| ArtifactError::FingerprintFailed(output.to_string()))
}

#[async_trait]
impl ArtifactGenerator for LocalArtifactGenerator {
    async fn generate_ssh_keys(&self, dir: &Path) -> Result<SshKeyMaterial> {
        let ssh_dir = dir.join("ssh");
        std::fs::create_dir_all(&ssh_dir)?;

        let private = ssh_dir.join("id_rsa");
        let public = ssh_dir.join("id_rsa.pub");
        let private_str = private.display().to_string();

        run_tool(
            "ssh-keygen",
            &[
                "-t", "rsa", "-b", "4096", "-f", &private_str, "-N", "", "-C", "stackflow",
            ],
            ArtifactError::KeygenFailed,
        )
        .await?;

        let public_str = public.display().to_string();
        let output = Command::new("ssh-keygen")
            .args(["-lf", public_str.as_str(), "-E", "md5"])
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ArtifactError::FingerprintFailed(stderr.to_string()));
        }

        let fingerprint = parse_fingerprint(&String::from_utf8_lossy(&output.stdout))?;
        // doctl等のプロバイダーはMD5フィンガープリントを `MD5:` 接頭辞なしで扱う
        let fingerprint = fingerprint
            .strip_prefix("MD5:")
            .unwrap_or(&fingerprint)
            .to_string();

        tracing::info!(public = %public.display(), fingerprint = %fingerprint, "SSH key pair generated");

        Ok(SshKeyMaterial {
            public,
            private,
            fingerprint,
        })
    }

    async fn generate_ca_root(&self, dir: &Path) -> Result<BTreeMap<String, String>> {
        let ca_dir = dir.join("ca");
        std::fs::create_dir_all(&ca_dir)?;

        let key = ca_dir.join("ca-key.pem");
        let cert = ca_dir.join("ca.pem");
        let key_str = key.display().to_string();
        let cert_str = cert.display().to_string();

        run_tool(
            "openssl",
            &["genrsa", "-out", &key_str, "2048"],
            ArtifactError::CaFailed,
        )
        .await?;

        run_tool(
            "openssl",
            &[
                "req", "-x509", "-new", "-nodes", "-key", &key_str, "-subj", "/CN=stackflow-ca",
                "-days", "3650", "-out", &cert_str,
            ],
            ArtifactError::CaFailed,
        )
        .await?;

        tracing::info!(dir = %ca_dir.display(), "CA root material generated");

        let mut roots = BTreeMap::new();
        roots.insert("ca-root-cert".to_string(), cert_str);
        roots.insert("ca-root-key".to_string(), key_str);
        Ok(roots)
    }

    async fn render_config(
        &self,
        dir: &Path,
        file_name: &str,
        template: &str,
        context: &Context,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let rendered = render_to_string(file_name, template, context)?;
        let path = dir.join(file_name);

        std::fs::write(&path, rendered).map_err(|e| ArtifactError::WriteFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(file = %path.display(), "Config file rendered");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fingerprint() {
        let output = "4096 MD5:aa:bb:cc:dd:ee stackflow (RSA)";
        assert_eq!(parse_fingerprint(output).unwrap(), "MD5:aa:bb:cc:dd:ee");
    }

    #[test]
    fn test_parse_fingerprint_malformed() {
        assert!(parse_fingerprint("garbage").is_err());
        assert!(parse_fingerprint("").is_err());
    }

    #[tokio::test]
    async fn test_render_config_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let generator = LocalArtifactGenerator::new();

        let mut context = Context::new();
        context.insert("version", "3.5.16");

        let path = generator
            .render_config(dir.path(), "etcd.conf", "version={{ version }}", &context)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "version=3.5.16");
    }

    #[tokio::test]
    async fn test_render_config_undefined_variable() {
        let dir = tempfile::tempdir().unwrap();
        let generator = LocalArtifactGenerator::new();

        let result = generator
            .render_config(dir.path(), "etcd.conf", "{{ missing }}", &Context::new())
            .await;

        assert!(matches!(result, Err(ArtifactError::RenderFailed { .. })));
    }
}
