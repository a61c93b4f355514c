mod file_config;

pub use file_config::{EnrichmentConfig, FileConfig, UpstreamConfig};

use crate::categorizer::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use crate::server::RequestsLoggingLevel;
use crate::spotify::{DEFAULT_SPOTIFY_ACCOUNTS_URL, DEFAULT_SPOTIFY_API_URL};
use crate::wikipedia::{DEFAULT_PAGE_BATCH_SIZE, DEFAULT_WIKIPEDIA_API_URL};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8787";
pub const DEFAULT_FRONTEND_BASE_URL: &str = "http://localhost:3002";
pub const DEFAULT_LOCATION: &str = "Toronto";
pub const DEFAULT_WIKIPEDIA_CATEGORY: &str = "Category:Musical_groups_from_Toronto";
pub const DEFAULT_PAGE_ARTIST_IDS: [i64; 3] = [1, 2, 3];

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub spotify_client_id: Option<String>,
    pub public_base_url: Option<String>,
    pub frontend_base_url: Option<String>,
    pub ollama_url: Option<String>,
    pub ollama_model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub db_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub spotify_client_id: String,
    /// Where this server is reachable from a browser. The OAuth redirect URI
    /// is derived from it.
    pub public_base_url: String,
    /// Where the callback sends the browser after a successful login.
    pub frontend_base_url: String,
    pub ollama_url: String,
    pub ollama_model: String,

    pub upstream: UpstreamSettings,
    pub enrichment: EnrichmentSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSettings {
    pub wikipedia_api_url: String,
    pub spotify_api_url: String,
    pub spotify_accounts_url: String,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            wikipedia_api_url: DEFAULT_WIKIPEDIA_API_URL.to_string(),
            spotify_api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            spotify_accounts_url: DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentSettings {
    /// Location stored on imported artists.
    pub location: String,
    pub wikipedia_category: String,
    pub page_batch_size: usize,
    /// Artists whose pages are synced when a request names none.
    pub default_page_artist_ids: Vec<i64>,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            wikipedia_category: DEFAULT_WIKIPEDIA_CATEGORY.to_string(),
            page_batch_size: DEFAULT_PAGE_BATCH_SIZE,
            default_page_artist_ids: DEFAULT_PAGE_ARTIST_IDS.to_vec(),
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // TOML overrides CLI for each field
        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        // Validate db_dir exists
        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let spotify_client_id = file
            .spotify_client_id
            .or_else(|| cli.spotify_client_id.clone())
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "spotify_client_id must be specified via --spotify-client-id, SPOTIFY_CLIENT_ID or in config file"
                )
            })?;

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let public_base_url = file
            .public_base_url
            .or_else(|| cli.public_base_url.clone())
            .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let frontend_base_url = file
            .frontend_base_url
            .or_else(|| cli.frontend_base_url.clone())
            .unwrap_or_else(|| DEFAULT_FRONTEND_BASE_URL.to_string());
        let ollama_url = file
            .ollama_url
            .or_else(|| cli.ollama_url.clone())
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        let ollama_model = file
            .ollama_model
            .or_else(|| cli.ollama_model.clone())
            .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());

        let upstream_file = file.upstream.unwrap_or_default();
        let upstream_defaults = UpstreamSettings::default();
        let upstream = UpstreamSettings {
            wikipedia_api_url: upstream_file
                .wikipedia_api_url
                .unwrap_or(upstream_defaults.wikipedia_api_url),
            spotify_api_url: upstream_file
                .spotify_api_url
                .unwrap_or(upstream_defaults.spotify_api_url),
            spotify_accounts_url: upstream_file
                .spotify_accounts_url
                .unwrap_or(upstream_defaults.spotify_accounts_url),
        };

        let enrichment_file = file.enrichment.unwrap_or_default();
        let enrichment_defaults = EnrichmentSettings::default();
        let page_batch_size = enrichment_file
            .page_batch_size
            .unwrap_or(enrichment_defaults.page_batch_size);
        if page_batch_size == 0 {
            bail!("enrichment.page_batch_size must be greater than 0");
        }
        let enrichment = EnrichmentSettings {
            location: enrichment_file
                .location
                .unwrap_or(enrichment_defaults.location),
            wikipedia_category: enrichment_file
                .wikipedia_category
                .unwrap_or(enrichment_defaults.wikipedia_category),
            page_batch_size,
            default_page_artist_ids: enrichment_file
                .default_page_artist_ids
                .unwrap_or(enrichment_defaults.default_page_artist_ids),
        };

        Ok(Self {
            db_dir,
            port,
            metrics_port,
            logging_level,
            spotify_client_id,
            public_base_url,
            frontend_base_url,
            ollama_url,
            ollama_model,
            upstream,
            enrichment,
        })
    }

    pub fn taxonomy_db_path(&self) -> PathBuf {
        self.db_dir.join("taxonomy.db")
    }

    /// Must be registered as a redirect URI of the Spotify app.
    pub fn spotify_redirect_uri(&self) -> String {
        format!("{}/spotify/callback", self.public_base_url)
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
