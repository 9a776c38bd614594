//! CLI argument parsing for the corpus tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Corpus Index
///
/// Ingests text documents into a searchable section corpus and answers
/// similarity queries over it.
#[derive(Parser, Debug)]
#[command(name = "corpus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/corpus-index/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the corpus data directory
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Corpus commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest one or more documents into the corpus
    Ingest {
        /// Files to ingest (pdf, docx, txt)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Search the corpus for sections similar to a query
    Search {
        /// Search query text
        query: String,

        /// Number of results to return
        #[arg(short = 'k', long, default_value_t = 5)]
        top_k: usize,
    },

    /// Print the document relationship network as JSON
    Network,

    /// Show corpus counts and location
    Status,
}
