mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(
    about = "Bootstrap application repositories and wire them into the deployment pipeline",
    long_about = None
)]
struct Cli {
    /// デバッグログを有効化
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// アプリケーションのオンボーディング
    #[command(subcommand)]
    App(AppCommands),
    /// スターターテンプレート
    #[command(subcommand)]
    Template(TemplateCommands),
    /// プラットフォームのデプロイ先環境
    #[command(subcommand)]
    Env(EnvCommands),
    /// プラットフォームのテナント
    #[command(subcommand)]
    Tenant(TenantCommands),
    /// バージョン情報を表示
    Version,
}

#[derive(Subcommand)]
enum AppCommands {
    /// 新しいアプリケーションリポジトリを作成
    Create(commands::app::CreateArgs),
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// テンプレート一覧を表示
    List,
    /// テンプレートのパラメータを表示
    Describe {
        /// テンプレート名
        name: String,
    },
}

#[derive(Subcommand)]
enum EnvCommands {
    /// 環境一覧を表示
    List,
}

#[derive(Subcommand)]
enum TenantCommands {
    /// テナント一覧を表示
    List,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // バージョン表示は設定不要
    if matches!(cli.command, Commands::Version) {
        println!("launchpad {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = launchpad_config::load()?;

    match cli.command {
        Commands::App(AppCommands::Create(args)) => {
            commands::app::handle_create(args, config).await
        }
        Commands::Template(TemplateCommands::List) => commands::template::handle_list(&config),
        Commands::Template(TemplateCommands::Describe { name }) => {
            commands::template::handle_describe(&config, &name)
        }
        Commands::Env(EnvCommands::List) => commands::env::handle_list(&config),
        Commands::Tenant(TenantCommands::List) => commands::tenant::handle_list(&config),
        Commands::Version => Ok(()),
    }
}
