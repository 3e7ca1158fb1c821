//! CLI adapter for the vault indexer
//!
//! Thin clap layer over `core/`: it loads configuration, applies
//! command-line overrides and renders results. No indexing logic
//! lives here.
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// Vault Indexer - incremental chunking for markdown vaults
///
/// Splits new and modified notes into stable, metadata-rich chunks
/// and exports them for a semantic search backend.
#[derive(Parser, Debug)]
#[command(name = "vault-indexer")]
#[command(version)]
#[command(about = "Incremental chunking indexer for markdown vaults", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one incremental indexing pass
    Index(commands::IndexArgs),

    /// Summarise the recorded change state of a vault
    Status(commands::StatusArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;

    let config = Config::load()?;

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, config, cli.format).await,
        Commands::Status(args) => commands::status::execute(args, config, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &config, cli.format).await,
    }
}
