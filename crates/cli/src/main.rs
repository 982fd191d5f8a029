use anyhow::Context;
use clap::{Parser, Subcommand};

mod commands;

use commands::{GameIdsArgs, ImportArgs};
use nbb_core::config_loader::DEFAULT_CONFIG_PATH;
use nbb_core::ConfigLoader;
use nbb_data::ConnectionPool;

#[derive(Parser)]
#[command(name = "nbb-store")]
#[command(about = "Persistence for NBB teams, players, games and shots", long_about = None)]
struct Cli {
    /// Optional settings file; DB_* environment variables take precedence
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create any missing tables
    Setup,
    /// Print the game ids recorded for a season
    GameIds(GameIdsArgs),
    /// Write records from a JSON-lines file in one transaction
    Import(ImportArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Settings and pool are both fatal: nothing runs without them.
    let config = ConfigLoader::load_from(&cli.config).map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;
    tracing::info!("Using database {}", config.display_target());

    let pool = ConnectionPool::connect(&config)
        .await
        .context("Could not create the connection pool")?;

    let result = match cli.command {
        Commands::Setup => commands::run_setup(&pool).await,
        Commands::GameIds(args) => commands::run_game_ids(&pool, args).await,
        Commands::Import(args) => commands::run_import(&pool, args).await,
    };

    pool.drain().await;
    result
}
