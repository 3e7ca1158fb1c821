//! Vault Indexer CLI
//!
//! Runs incremental indexing passes over a markdown vault and
//! inspects the recorded change state.
//!
//! # Examples
//!
//! ```bash
//! # Index the default directories of a vault
//! vault-indexer index --vault ~/Notes --output chunks.jsonl
//!
//! # Index specific directories with smaller chunks
//! vault-indexer index --vault ~/Notes --dir Projects --dir Areas --chunk-size 1000
//!
//! # See what the next run would pick up
//! vault-indexer status --vault ~/Notes
//!
//! # Show configuration
//! vault-indexer show-config --format json
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vault_indexer::cli::output::print_error;
use vault_indexer::cli::{run, Cli};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr) // stdout carries command output
        .with_env_filter(filter)
        .with_ansi(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
