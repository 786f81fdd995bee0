//! Strictly Arena - Unified CLI

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::sync::Arc;
use strictly_arena::{AppState, Arena, ArenaConfig, ConnectionRegistry, RockPaperScissors};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            single_round,
        } => run_server(config, host, port, single_round).await,
        Command::Config { config } => print_config(config),
    }
}

/// Run the WebSocket game server
async fn run_server(
    config_path: PathBuf,
    host: Option<String>,
    port: Option<u16>,
    single_round: bool,
) -> Result<()> {
    let mut config = ArenaConfig::load(Some(config_path.as_path()))?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if single_round {
        config = config.with_continuous_play(false);
    }

    initialize_tracing(&config);
    info!(
        host = %config.host(),
        port = config.port(),
        continuous_play = config.continuous_play(),
        "Starting Strictly Arena server"
    );

    let registry = Arc::new(ConnectionRegistry::new());
    let arena = Arc::new(Arena::new(RockPaperScissors, registry.clone(), &config));

    strictly_arena::serve(&config, AppState::new(arena, registry)).await
}

/// Print the effective configuration
#[instrument]
fn print_config(config_path: PathBuf) -> Result<()> {
    let config = ArenaConfig::load(Some(config_path.as_path()))?;
    println!("{}", config.to_toml()?);
    Ok(())
}

fn initialize_tracing(config: &ArenaConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
