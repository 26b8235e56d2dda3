//! CLI module for Whiteboard
//!
//! Provides commands:
//! - `serve`: Run the HTTP server (default)
//! - `migrate`: Create the database schema and exit

use clap::{Parser, Subcommand};

/// Whiteboard drawing server CLI
#[derive(Parser, Debug)]
#[command(name = "whiteboard")]
#[command(about = "REST backend for the Whiteboard drawing editor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve,
    /// Create the database schema and exit
    Migrate,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = crate::server::load_config()?;
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => crate::server::run(config).await,
        Commands::Migrate => crate::server::migrate(config).await,
    }
}
