use colored::Colorize;
use std::path::Path;

/// テンプレート検証コマンド
///
/// プロバイダーには一切触れず、パースと実行計画の表示だけを行います。
pub fn handle(template: &Path, output: Option<&str>) -> anyhow::Result<()> {
    let deployment = stackflow_core::load_deployment(template, false, false)?;
    let (namespace, repository, name) = deployment.uris()?;

    println!("{}", "✓ テンプレートは有効です".green().bold());
    println!(
        "  URI: {} / {} / {}",
        namespace.cyan(),
        repository.cyan(),
        name.cyan()
    );
    println!("  プロバイダー: {}", deployment.service.provider);
    println!("  ノード数: {}", deployment.nodes);

    println!();
    println!("{}", "実行計画:".bold());
    for infra in &deployment.infras {
        println!(
            "  {} {} {} (master: {})",
            "▶".green(),
            infra.name.cyan().bold(),
            infra.version,
            infra.nodes.master
        );
        for component in &infra.components {
            println!("    • {} ({})", component.binary, component.url.dimmed());
        }
    }

    match output {
        Some("json") => {
            println!();
            println!("{}", deployment.json()?);
        }
        Some(_) => {
            println!();
            println!("{}", deployment.yaml()?);
        }
        None => {}
    }

    Ok(())
}
