use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;

use tracing::{debug, error, info};

use axum::{
    extract::State,
    middleware,
    response::{IntoResponse, Redirect},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use super::artist_routes::make_artist_routes;
use super::genre_routes::make_genre_routes;
use super::metrics::{metrics_handler, set_taxonomy_metrics};
use super::spotify_routes::make_spotify_routes;
use super::{log_requests, state::*, ServerConfig};
use crate::config::EnrichmentSettings;

/// Interval of the background pass that drops expired OAuth states and
/// refreshes the taxonomy gauges.
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home() -> Redirect {
    Redirect::to("/ui")
}

async fn status(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

pub fn make_app(state: ServerState) -> Result<Router> {
    let root_routes: Router = Router::new()
        .route("/", get(home))
        .route("/status", get(status))
        .with_state(state.clone());

    let app: Router = root_routes
        .nest("/artists", make_artist_routes(state.clone()))
        .nest("/genres", make_genre_routes(state.clone()))
        .nest("/spotify", make_spotify_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .layer(CorsLayer::permissive());

    Ok(app)
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

fn spawn_maintenance(state: ServerState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(MAINTENANCE_INTERVAL);

        loop {
            ticker.tick().await;

            state.auth_state_store.cleanup_expired().await;
            debug!(
                "Pending Spotify authorizations: {}",
                state.auth_state_store.pending_count().await
            );

            match state.taxonomy_store.get_stats() {
                Ok(stats) => set_taxonomy_metrics(&stats),
                Err(e) => error!("Failed to read taxonomy stats: {:#}", e),
            }
        }
    });
}

pub async fn run_server(
    config: ServerConfig,
    services: Services,
    enrichment: EnrichmentSettings,
) -> Result<()> {
    let port = config.port;
    let metrics_port = config.metrics_port;
    let state = ServerState::new(config, services, enrichment);
    let app = make_app(state.clone())?;

    spawn_maintenance(state);

    let metrics_addr = SocketAddr::from(([0, 0, 0, 0], metrics_port));
    let metrics_listener = tokio::net::TcpListener::bind(metrics_addr)
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(metrics_listener, make_metrics_app()).await {
            error!("Metrics server stopped: {}", e);
        }
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    Ok(axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?)
}
