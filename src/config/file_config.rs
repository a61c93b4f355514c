use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_dir: Option<String>,
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub spotify_client_id: Option<String>,
    pub public_base_url: Option<String>,
    pub frontend_base_url: Option<String>,
    pub ollama_url: Option<String>,
    pub ollama_model: Option<String>,

    pub upstream: Option<UpstreamConfig>,
    pub enrichment: Option<EnrichmentConfig>,
}

/// Base URLs of the third-party APIs, mostly useful to point at mocks.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    pub wikipedia_api_url: Option<String>,
    pub spotify_api_url: Option<String>,
    pub spotify_accounts_url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub page_batch_size: Option<usize>,
    pub location: Option<String>,
    pub wikipedia_category: Option<String>,
    pub default_page_artist_ids: Option<Vec<i64>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
