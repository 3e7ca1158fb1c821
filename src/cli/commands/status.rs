//! Status command - summarise the recorded change state of a vault

use crate::cli::output::{colors, format_bytes, format_relative_time_colored, print_header};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::indexer::PathWalker;
use crate::core::storage::ChangeStore;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Vault root directory (overrides configuration)
    #[arg(long, short = 'v')]
    pub vault: Option<PathBuf>,

    /// Subdirectory to check (can be specified multiple times)
    #[arg(long = "dir", short = 'd')]
    pub directories: Vec<String>,

    /// List every tracked file
    #[arg(long)]
    pub verbose: bool,
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state_file: String,
    pub state_file_bytes: Option<u64>,
    pub files_tracked: usize,
    pub files_on_disk: usize,
    pub files_pending: usize,
    pub last_indexed: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<TrackedFile>,
}

#[derive(Debug, Serialize)]
pub struct TrackedFile {
    pub path: String,
    pub document_id: String,
    pub last_indexed: DateTime<Utc>,
}

/// Execute the status command
pub async fn execute(
    args: StatusArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    super::apply_vault_overrides(&mut config, args.vault, args.directories);
    config.validate()?;

    let state_path = config.vault.state_path();
    let store = ChangeStore::open(&state_path);

    let walker = PathWalker::new(
        config.indexing.extensions.clone(),
        config.indexing.exclude_patterns.clone(),
    )?;
    let on_disk = walker.collect_files(&config.vault.root, &config.vault.directories)?;

    // Unreadable files count as pending; the next run reports them
    let files_pending = on_disk
        .iter()
        .filter(|path| store.needs_processing(path).unwrap_or(true))
        .count();

    let files = if args.verbose {
        store
            .iter()
            .map(|state| TrackedFile {
                path: state.path.to_string_lossy().into_owned(),
                document_id: state.chunk_tracking_id.clone(),
                last_indexed: state.last_indexed_at,
            })
            .collect()
    } else {
        Vec::new()
    };

    let response = StatusResponse {
        state_file: state_path.to_string_lossy().into_owned(),
        state_file_bytes: std::fs::metadata(&state_path).ok().map(|m| m.len()),
        files_tracked: store.len(),
        files_on_disk: on_disk.len(),
        files_pending,
        last_indexed: store.iter().map(|s| s.last_indexed_at).max(),
        files,
    };

    match format {
        OutputFormat::Human => print_human(&response),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn print_human(response: &StatusResponse) {
    print_header("Vault index status");

    let size = response
        .state_file_bytes
        .map(format_bytes)
        .unwrap_or_else(|| "missing".to_string());
    println!(
        "  {} {} ({})",
        colors::label("State file:"),
        colors::file_path(&response.state_file),
        colors::dim(&size)
    );
    println!(
        "  {} {}",
        colors::label("Tracked:"),
        colors::number(&response.files_tracked.to_string())
    );
    println!(
        "  {} {} on disk, {} pending",
        colors::label("Files:"),
        colors::number(&response.files_on_disk.to_string()),
        colors::number(&response.files_pending.to_string())
    );
    if let Some(last) = &response.last_indexed {
        println!(
            "  {} {}",
            colors::label("Last indexed:"),
            format_relative_time_colored(last)
        );
    }

    for file in &response.files {
        println!(
            "    {} {}",
            colors::file_path(&file.path),
            format_relative_time_colored(&file.last_indexed)
        );
    }
}
