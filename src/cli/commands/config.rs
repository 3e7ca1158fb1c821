//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub config_file: String,
    pub state_file: String,
    #[serde(flatten)]
    pub config: &'a Config,
}

/// Execute the config command
pub async fn execute(
    _args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let xdg = XdgDirs::new();

    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        state_file: config.vault.state_path().to_string_lossy().into_owned(),
        config,
    };

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  config_file: {}", response.config_file);
            println!("  vault:");
            println!("    root: {}", config.vault.root.display());
            println!("    directories: {:?}", config.vault.directories);
            println!("    state_file: {}", response.state_file);
            println!("  indexing:");
            println!("    chunk_size: {}", config.indexing.chunk_size);
            println!("    overlap: {}", config.indexing.overlap);
            println!("    batch_size: {}", config.indexing.batch_size);
            println!("    extensions: {:?}", config.indexing.extensions);
            println!(
                "    exclude_patterns: {:?}",
                config.indexing.exclude_patterns
            );
            println!("    record_policy: {:?}", config.indexing.record_policy);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
