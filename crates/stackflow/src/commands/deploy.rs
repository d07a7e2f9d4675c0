use colored::Colorize;
use stackflow_artifact::LocalArtifactGenerator;
use stackflow_cloud::ProviderRegistry;
use stackflow_cloud_digitalocean::DigitalOceanProvider;
use stackflow_deploy::{Deployer, StageOutcome, StageRegistry};
use stackflow_remote::SshExecutor;
use std::path::Path;
use std::sync::Arc;

/// デプロイコマンド
pub async fn handle(template: &Path, verbose: bool, timestamp: bool) -> anyhow::Result<()> {
    println!(
        "{}",
        format!("テンプレート {} を読み込み中...", template.display()).blue()
    );

    let mut deployment = stackflow_core::load_deployment(template, verbose, timestamp)?;

    println!("  URI: {}", deployment.uri.cyan());
    println!("  ノード数: {}", deployment.nodes);
    let plan: Vec<&str> = deployment.infras.iter().map(|i| i.name.as_str()).collect();
    println!("  インフラ: {}", plan.join(" → ").cyan());

    // プロバイダーに渡すトークン。テンプレートが空の場合は設定ファイル、
    // それも空なら doctl 側の認証設定に任せる
    let token = if deployment.service.token.is_empty() {
        stackflow_config::load_default_config()?.token
    } else {
        deployment.service.token.clone()
    };
    let token = (!token.is_empty()).then_some(token);

    let mut providers = ProviderRegistry::new();
    providers.register(Arc::new(DigitalOceanProvider::new(token)));

    let deployer = Deployer::new(
        providers,
        StageRegistry::defaults(),
        Arc::new(SshExecutor::default()),
        Arc::new(LocalArtifactGenerator::new()),
    );

    println!();
    println!("{}", "デプロイを開始します...".green().bold());

    let report = deployer.deploy(&mut deployment).await?;

    println!();
    for stage in &report.stages {
        match stage.outcome {
            StageOutcome::Completed => {
                println!("  {} {}", "✓".green(), stage.infra);
            }
            StageOutcome::NotImplemented => {
                println!(
                    "  {} {} {}",
                    "⚠".yellow(),
                    stage.infra,
                    "(未実装のためスキップ)".dimmed()
                );
            }
        }
    }

    println!();
    println!("{}", "✓ デプロイが完了しました！".green().bold());
    println!(
        "  出力: {} 件のキーが公開されています",
        deployment.outputs.len()
    );

    Ok(())
}
