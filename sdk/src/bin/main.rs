// CLI tool for the Soda DEX
//
// Lists pools and positions, quotes and executes swaps, and drives the
// create-pool / mint / collect / burn flows through the SDK.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soda")]
#[command(about = "Soda DEX CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short, default_value = "soda.toml")]
    config: String,

    /// Override the RPC URL from the configuration
    #[arg(long)]
    rpc_url: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pools
    Pools(commands::pools::PoolsCmd),

    /// List token pairs
    Pairs,

    /// List tokens that can be swapped
    Tokens,

    /// List open positions
    Positions(commands::positions::PositionsCmd),

    /// Quote a swap without sending anything
    Quote(commands::swap::QuoteCmd),

    /// Swap tokens
    Swap(commands::swap::SwapCmd),

    /// Create and initialize a pool
    CreatePool(commands::pools::CreatePoolCmd),

    /// Add liquidity to a pool
    Mint(commands::positions::MintCmd),

    /// Collect owed tokens of a position
    Collect(commands::positions::PositionIdCmd),

    /// Burn a position
    Burn(commands::positions::PositionIdCmd),

    /// Reset a token allowance to zero
    Revoke(commands::swap::RevokeCmd),

    /// Refresh pools and positions until interrupted
    Watch(commands::watch::WatchCmd),

    /// Write a starter configuration file
    InitConfig(commands::config::InitConfigCmd),
}

fn init_logging(log_level: &str) {
    let level = log_level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("soda_sdk={level},soda={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Commands::InitConfig(cmd) = cli.command {
        return commands::config::execute(cmd, &cli.config);
    }

    let client = commands::utils::connect(&cli.config, cli.rpc_url.as_deref())?;
    client
        .check_chain()
        .await
        .context("Connected endpoint serves a different chain")?;

    match cli.command {
        Commands::Pools(cmd) => commands::pools::list(cmd, &client).await,
        Commands::Pairs => commands::pools::pairs(&client).await,
        Commands::Tokens => commands::pools::tokens(&client).await,
        Commands::Positions(cmd) => commands::positions::list(cmd, &client).await,
        Commands::Quote(cmd) => commands::swap::quote(cmd, &client).await,
        Commands::Swap(cmd) => commands::swap::swap(cmd, client).await,
        Commands::CreatePool(cmd) => commands::pools::create(cmd, client).await,
        Commands::Mint(cmd) => commands::positions::mint(cmd, client).await,
        Commands::Collect(cmd) => commands::positions::collect(cmd, client).await,
        Commands::Burn(cmd) => commands::positions::burn(cmd, client).await,
        Commands::Revoke(cmd) => commands::swap::revoke(cmd, client).await,
        Commands::Watch(cmd) => commands::watch::execute(cmd, &client).await,
        Commands::InitConfig(_) => Ok(()),
    }
}
