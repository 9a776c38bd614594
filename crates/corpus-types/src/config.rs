//! Configuration loading for corpus-index.
//!
//! Layered precedence: defaults -> config file -> env vars -> CLI flags.
//! Config file lives at ~/.config/corpus-index/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CorpusError;

/// Segmentation oracle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterSettings {
    /// Provider name (e.g., "openai", "anthropic")
    #[serde(default = "default_segmenter_provider")]
    pub provider: String,

    /// Model name (e.g., "gpt-4o-mini", "claude-3-haiku")
    #[serde(default = "default_segmenter_model")]
    pub model: String,

    /// API key (loaded from env var, not stored in config file)
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// How many leading paragraphs are sampled for the oracle call
    #[serde(default = "default_sample_paragraphs")]
    pub sample_paragraphs: usize,
}

fn default_segmenter_provider() -> String {
    "openai".to_string()
}

fn default_segmenter_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_sample_paragraphs() -> usize {
    10
}

impl Default for SegmenterSettings {
    fn default() -> Self {
        Self {
            provider: default_segmenter_provider(),
            model: default_segmenter_model(),
            api_key: None,
            api_base_url: None,
            sample_paragraphs: default_sample_paragraphs(),
        }
    }
}

/// Embedding oracle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderSettings {
    /// Model name (e.g., "text-embedding-3-small")
    #[serde(default = "default_embedder_model")]
    pub model: String,

    /// API key (loaded from env var, not stored in config file)
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    #[serde(default)]
    pub api_base_url: Option<String>,
}

fn default_embedder_model() -> String {
    "text-embedding-3-small".to_string()
}

impl Default for EmbedderSettings {
    fn default() -> Self {
        Self {
            model: default_embedder_model(),
            api_key: None,
            api_base_url: None,
        }
    }
}

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the persisted corpus artifacts
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Segmentation oracle configuration
    #[serde(default)]
    pub segmenter: SegmenterSettings,

    /// Embedding oracle configuration
    #[serde(default)]
    pub embedder: EmbedderSettings,
}

fn default_data_dir() -> String {
    ProjectDirs::from("", "", "corpus-index")
        .map(|p| p.data_local_dir().join("corpus"))
        .unwrap_or_else(|| PathBuf::from("./data"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            segmenter: SegmenterSettings::default(),
            embedder: EmbedderSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/corpus-index/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (CORPUS_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, CorpusError> {
        let config_dir = ProjectDirs::from("", "", "corpus-index")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            // 1. Built-in defaults
            .set_default("data_dir", default_data_dir())
            .map_err(|e| CorpusError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| CorpusError::Config(e.to_string()))?
            .set_default("segmenter.provider", default_segmenter_provider())
            .map_err(|e| CorpusError::Config(e.to_string()))?
            .set_default("segmenter.model", default_segmenter_model())
            .map_err(|e| CorpusError::Config(e.to_string()))?
            .set_default("segmenter.sample_paragraphs", default_sample_paragraphs() as i64)
            .map_err(|e| CorpusError::Config(e.to_string()))?
            .set_default("embedder.model", default_embedder_model())
            .map_err(|e| CorpusError::Config(e.to_string()))?
            // 2. Default config file (~/.config/corpus-index/config.toml)
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        // 3. CLI-specified config file (higher precedence than default)
        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // 4. Environment variables (highest precedence before CLI flags)
        // Format: CORPUS_DATA_DIR, CORPUS_SEGMENTER_MODEL, CORPUS_EMBEDDER_API_KEY, etc.
        builder = builder.add_source(
            Environment::with_prefix("CORPUS")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| CorpusError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CorpusError::Config(e.to_string()))
    }

    /// Expand ~ in data_dir to the actual home directory.
    pub fn expanded_data_dir(&self) -> PathBuf {
        if let Some(rest) = self.data_dir.strip_prefix("~/") {
            if let Ok(home) = std::env::var("HOME") {
                return PathBuf::from(home).join(rest);
            }
        }
        PathBuf::from(&self.data_dir)
    }
}
