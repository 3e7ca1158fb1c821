//! Index command - run one incremental pass over a vault

use crate::cli::output::{colors, format_duration, print_warning};
use crate::cli::OutputFormat;
use crate::core::backend::JsonlExporter;
use crate::core::config::{Config, RecordPolicy};
use crate::core::indexer::IndexingPipeline;
use crate::core::storage::ChangeStore;
use crate::core::types::RunResult;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Vault root directory (overrides configuration)
    #[arg(long, short = 'v')]
    pub vault: Option<PathBuf>,

    /// Subdirectory to index (can be specified multiple times)
    #[arg(long = "dir", short = 'd')]
    pub directories: Vec<String>,

    /// Characters per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between size-based chunks
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Documents per upload batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// JSON-lines file receiving the chunks
    #[arg(long, short = 'o', default_value = "vault-chunks.jsonl")]
    pub output: PathBuf,

    /// Record files as soon as they are queued instead of after
    /// their batch is uploaded
    #[arg(long)]
    pub optimistic: bool,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub vault: String,
    pub output: String,
    #[serde(flatten)]
    pub result: RunResult,
}

/// Execute the index command
pub async fn execute(
    args: IndexArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    super::apply_vault_overrides(&mut config, args.vault, args.directories);

    if let Some(chunk_size) = args.chunk_size {
        config.indexing.chunk_size = chunk_size;
    }
    if let Some(overlap) = args.overlap {
        config.indexing.overlap = overlap;
    }
    if let Some(batch_size) = args.batch_size {
        config.indexing.batch_size = batch_size;
    }
    if args.optimistic {
        config.indexing.record_policy = RecordPolicy::Optimistic;
    }

    if !config.vault.root.is_dir() {
        return Err(format!(
            "Vault root '{}' is not a directory. Pass --vault or set VAULT_INDEXER_VAULT.",
            config.vault.root.display()
        )
        .into());
    }

    config.log_config();

    let exporter = Arc::new(JsonlExporter::new(&args.output));
    let mut pipeline = IndexingPipeline::new(&config, exporter)?;
    let mut store = ChangeStore::open(config.vault.state_path());

    let cancel = Arc::new(AtomicBool::new(false));
    let signal_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current file");
            signal_flag.store(true, Ordering::SeqCst);
        }
    });

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Indexing {} into {}...",
            colors::file_path(&config.vault.root.display().to_string()),
            colors::file_path(&args.output.display().to_string())
        );
    }

    let result = pipeline.run_with_cancel(&mut store, &cancel).await?;

    let response = IndexResponse {
        vault: config.vault.root.to_string_lossy().into_owned(),
        output: args.output.to_string_lossy().into_owned(),
        result,
    };

    match format {
        OutputFormat::Human => print_human(&response),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn print_human(response: &IndexResponse) {
    let result = &response.result;

    println!(
        "{} {} new, {} updated, {} unchanged, {} empty ({} files seen) in {}",
        colors::success("Indexed"),
        colors::number(&result.files_indexed.to_string()),
        colors::number(&result.files_updated.to_string()),
        colors::number(&result.files_skipped.to_string()),
        colors::number(&result.files_empty.to_string()),
        colors::number(&result.files_seen.to_string()),
        colors::number(&format_duration(result.duration_ms as f64 / 1000.0))
    );
    println!(
        "Uploaded {} documents in {} batches",
        colors::number(&result.documents_uploaded.to_string()),
        colors::number(&result.batches_uploaded.to_string())
    );

    if result.cancelled {
        print_warning("run was cancelled before all files were checked");
    }

    for (i, error) in result.errors.iter().enumerate() {
        print_warning(&format!("{}. {}", i + 1, error));
    }
}
