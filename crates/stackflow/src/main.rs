mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stack")]
#[command(about = "書いて、流して、立ち上げる。クラスタ構築は、テンプレートになった。", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// テンプレートからインフラスタックをデプロイ
    Deploy {
        /// テンプレートファイル (YAML / JSON)
        template: PathBuf,
        /// 実行ログを標準出力に表示する
        #[arg(short, long)]
        verbose: bool,
        /// ログ出力にタイムスタンプを含める
        #[arg(short, long)]
        timestamp: bool,
    },
    /// テンプレートを検証して実行計画を表示
    Validate {
        /// テンプレートファイル (YAML / JSON)
        template: PathBuf,
        /// テンプレート全体をダンプする形式 (yaml / json)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy {
            template,
            verbose,
            timestamp,
        } => {
            commands::deploy::handle(&template, verbose, timestamp).await?;
        }
        Commands::Validate { template, output } => {
            commands::validate::handle(&template, output.as_deref())?;
        }
        Commands::Version => {
            println!("stackflow {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
