use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use toronto_artists_server::categorizer::OllamaCategorizer;
use toronto_artists_server::config;
use toronto_artists_server::server::{
    metrics, run_server, RequestsLoggingLevel, ServerConfig, Services,
};
use toronto_artists_server::spotify::{SpotifyClient, SpotifyClientConfig};
use toronto_artists_server::taxonomy::{SqliteTaxonomyStore, TaxonomyStore};
use toronto_artists_server::wikipedia::WikipediaClient;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding taxonomy.db. Can also be specified in config file.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8787)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Client id of the Spotify app used for the PKCE flow.
    #[clap(long, env = "SPOTIFY_CLIENT_ID")]
    pub spotify_client_id: Option<String>,

    /// Public URL of this server, used to build the OAuth redirect URI.
    #[clap(long)]
    pub public_base_url: Option<String>,

    /// Frontend the OAuth callback redirects to.
    #[clap(long)]
    pub frontend_base_url: Option<String>,

    /// Base URL of the Ollama server used to categorize genres.
    #[clap(long)]
    pub ollama_url: Option<String>,

    /// Ollama model used to categorize genres.
    #[clap(long)]
    pub ollama_model: Option<String>,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_dir: args.db_dir.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            spotify_client_id: args.spotify_client_id.clone(),
            public_base_url: args.public_base_url.clone(),
            frontend_base_url: args.frontend_base_url.clone(),
            ollama_url: args.ollama_url.clone(),
            ollama_model: args.ollama_model.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_dir: {:?}", app_config.db_dir);
    info!("  port: {}", app_config.port);
    info!("  spotify redirect uri: {}", app_config.spotify_redirect_uri());
    info!("  ollama: {} ({})", app_config.ollama_url, app_config.ollama_model);

    if !app_config.taxonomy_db_path().exists() {
        info!(
            "Creating new taxonomy database at {:?}",
            app_config.taxonomy_db_path()
        );
    }
    let store = Arc::new(SqliteTaxonomyStore::new(app_config.taxonomy_db_path())?);

    // Initialize metrics system
    info!("Initializing metrics...");
    metrics::init_metrics();
    metrics::set_taxonomy_metrics(&store.get_stats()?);

    let wikipedia = Arc::new(WikipediaClient::new(
        app_config.upstream.wikipedia_api_url.clone(),
    )?);
    let spotify = Arc::new(SpotifyClient::new(SpotifyClientConfig {
        client_id: app_config.spotify_client_id.clone(),
        redirect_uri: app_config.spotify_redirect_uri(),
        api_base_url: app_config.upstream.spotify_api_url.clone(),
        accounts_base_url: app_config.upstream.spotify_accounts_url.clone(),
    })?);
    let categorizer = Arc::new(OllamaCategorizer::new(
        app_config.ollama_url.clone(),
        app_config.ollama_model.clone(),
    )?);

    let services = Services {
        taxonomy_store: store.clone(),
        user_store: store,
        wikipedia,
        spotify,
        categorizer,
    };
    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        metrics_port: app_config.metrics_port,
        frontend_base_url: app_config.frontend_base_url.clone(),
    };

    info!("Ready to serve at port {}!", app_config.port);
    info!("Metrics available at port {}!", app_config.metrics_port);
    run_server(server_config, services, app_config.enrichment).await
}
