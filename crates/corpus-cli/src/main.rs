//! Corpus Index CLI
//!
//! # Usage
//!
//! ```bash
//! corpus ingest standards/*.txt
//! corpus search "fall protection requirements" --top-k 5
//! corpus network
//! corpus status
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/corpus-index/config.toml)
//! 3. Environment variables (CORPUS_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use corpus_cli::{
    handle_ingest, handle_network, handle_search, handle_status, init_logging, load_settings, Cli,
    Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(
        cli.config.as_deref(),
        cli.data_dir.as_deref(),
        cli.log_level.as_deref(),
    )?;
    init_logging(&settings)?;

    match cli.command {
        Commands::Ingest { files } => {
            handle_ingest(&settings, &files).await?;
        }
        Commands::Search { query, top_k } => {
            handle_search(&settings, &query, top_k).await?;
        }
        Commands::Network => {
            handle_network(&settings)?;
        }
        Commands::Status => {
            handle_status(&settings)?;
        }
    }

    Ok(())
}
