//! Configuration for debugmate
//!
//! Loaded from `.debugmate/config.toml` (or the file named by
//! `DEBUGMATE_CONFIG`). Every field has a default, so a missing file or a
//! partial file is fine. Secrets never live in the file: the OpenAI key comes
//! from `OPENAI_API_KEY` (usually via `.env`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternate config file
pub const ENV_CONFIG: &str = "DEBUGMATE_CONFIG";

/// Environment variable overriding the vector store address
pub const ENV_QDRANT: &str = "DEBUGMATE_QDRANT";

/// Environment variable holding the OpenAI API key
pub const ENV_OPENAI_KEY: &str = "OPENAI_API_KEY";

/// Default config location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".debugmate/config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vector_store: VectorStoreConfig,
    pub embeddings: EmbeddingsConfig,
    pub diagnosis: DiagnosisConfig,

    /// Key for the remote embedding and completion APIs (env only)
    #[serde(skip)]
    pub openai_api_key: Option<String>,
}

/// Qdrant connection and collection layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// host:port (or full URL) of the Qdrant REST API
    pub address: String,
    /// Base collection name; partitions are named `<collection>_<dimension>`
    pub collection: String,
    /// Partition inspected by `get_stats`
    pub default_dimension: usize,
    pub timeout_secs: u64,
    /// Number of similar errors retrieved per question
    pub search_limit: usize,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            address: "localhost:6333".to_string(),
            collection: "debug_errors".to_string(),
            default_dimension: 384,
            timeout_secs: 30,
            search_limit: 3,
        }
    }
}

/// Embedding backend selection and model pinning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    /// Try the free local backend before the paid remote one
    pub prefer_local: bool,
    /// sentence-transformers model run by the local backend
    pub local_model: String,
    /// Python interpreter for the local backend (auto-detected when unset)
    pub python: Option<PathBuf>,
    /// Script suggested when local dependencies are missing
    pub remediation_script: String,
    pub remote_model: String,
    pub remote_base_url: String,
    pub timeout_secs: u64,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            prefer_local: true,
            local_model: "all-MiniLM-L6-v2".to_string(),
            python: None,
            remediation_script: "./scripts/install_local_embeddings.sh".to_string(),
            remote_model: "text-embedding-ada-002".to_string(),
            remote_base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Chat model used to write the diagnosis
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagnosisConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Config {
    /// Load configuration from the default location, then apply env overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::from_file(&path)?;
        config.apply_env();
        Ok(config)
    }

    /// Parse a config file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML {}", path.display()))
    }

    /// Pull the API key and store address override from the environment
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(ENV_OPENAI_KEY) {
            if !key.trim().is_empty() {
                self.openai_api_key = Some(key.trim().to_string());
            }
        }

        if let Ok(address) = std::env::var(ENV_QDRANT) {
            if !address.trim().is_empty() {
                self.vector_store.address = address.trim().to_string();
            }
        }
    }

    /// API key, or the empty string when none is configured
    pub fn api_key(&self) -> &str {
        self.openai_api_key.as_deref().unwrap_or_default()
    }
}
