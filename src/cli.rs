//! Command-line interface for strictly_arena.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Arena - anonymous rock/paper/scissors matchmaking
#[derive(Parser, Debug)]
#[command(name = "strictly_arena")]
#[command(about = "Matchmaking server for two-player rock/paper/scissors", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the WebSocket game server
    Serve {
        /// Path to a TOML config file (defaults are used if it is missing)
        #[arg(short, long, default_value = "arena.toml")]
        config: PathBuf,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Play a single round per pairing instead of re-queueing players
        #[arg(long)]
        single_round: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Path to a TOML config file
        #[arg(short, long, default_value = "arena.toml")]
        config: PathBuf,
    },
}
