//! Command implementations for the corpus tool.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use corpus_engine::CorpusEngine;
use corpus_types::Settings;

/// Load settings and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    data_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(data_dir) = data_dir_override {
        settings.data_dir = data_dir.to_string();
    }
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }

    Ok(settings)
}

/// Initialize logging from the environment, falling back to the
/// configured level.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Ingest files into the corpus, one document at a time.
pub async fn handle_ingest(settings: &Settings, files: &[PathBuf]) -> Result<()> {
    let mut engine = CorpusEngine::from_settings(settings)?;

    for file in files {
        let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
        let filename = file.to_string_lossy();

        engine
            .process_document(&bytes, &filename)
            .await
            .with_context(|| format!("Failed to ingest {}", file.display()))?;

        info!(file = %file.display(), "Ingested");
    }

    println!(
        "Corpus now holds {} documents / {} sections",
        engine.document_count(),
        engine.section_count()
    );
    Ok(())
}

/// Search the corpus and print ranked hits.
pub async fn handle_search(settings: &Settings, query: &str, top_k: usize) -> Result<()> {
    let engine = CorpusEngine::from_settings(settings)?;

    let hits = engine.search(query, top_k).await?;

    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "{:2}. [{:.4}] {} :: {}",
            rank + 1,
            hit.score,
            hit.document,
            hit.title
        );
        println!("    {}", hit.content);
    }
    Ok(())
}

/// Print the document network as JSON.
pub fn handle_network(settings: &Settings) -> Result<()> {
    let engine = CorpusEngine::from_settings(settings)?;

    let network = engine.build_network();
    println!("{}", serde_json::to_string_pretty(&network)?);
    Ok(())
}

/// Print corpus counts and location.
pub fn handle_status(settings: &Settings) -> Result<()> {
    let engine = CorpusEngine::from_settings(settings)?;

    println!("Data directory: {}", settings.expanded_data_dir().display());
    println!("Documents:      {}", engine.document_count());
    println!("Sections:       {}", engine.section_count());
    Ok(())
}
