//! Artist routes: listing, Wikipedia import, page content and Spotify enrichment.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{internal_error, ApiError};
use super::session::SpotifySession;
use super::state::{
    GuardedEnrichmentPipeline, GuardedTaxonomyStore, GuardedUserStore, GuardedWikipedia,
    ServerState,
};
use crate::upstream::FetchError;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct UpdatePagesBody {
    pub artist_ids: Option<Vec<i64>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePagesResponse {
    message: &'static str,
    pages_created: usize,
}

#[derive(Deserialize, Debug)]
pub(super) struct LimitBody {
    pub limit: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdatedCountResponse {
    pub updated_count: usize,
    pub message: String,
}

#[derive(Serialize)]
struct PageContentResponse {
    content: String,
}

/// Only strictly positive integers name an artist.
fn parse_artist_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

pub(super) fn parse_limit_body(
    body: Result<Json<LimitBody>, JsonRejection>,
) -> Result<usize, ApiError> {
    match body {
        Ok(Json(LimitBody { limit })) => Ok(limit),
        Err(rejection) => {
            warn!("Rejected limit body: {}", rejection.body_text());
            Err(ApiError::validation("Invalid request"))
        }
    }
}

async fn list_toronto_artists(State(store): State<GuardedTaxonomyStore>) -> Response {
    match store.list_artists_with_genres() {
        Ok(artists) => Json(artists).into_response(),
        Err(e) => internal_error("Failed to fetch Toronto artists", e).into_response(),
    }
}

async fn update_toronto_artists(State(pipeline): State<GuardedEnrichmentPipeline>) -> Response {
    match pipeline.import_category_artists().await {
        Ok(created) => Json(created).into_response(),
        Err(e) => internal_error("Failed to update Toronto artists", e).into_response(),
    }
}

async fn get_artist_wikipedia_source(
    State(store): State<GuardedTaxonomyStore>,
    State(wikipedia): State<GuardedWikipedia>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(artist_id) = parse_artist_id(&raw_id) else {
        return ApiError::validation("Invalid artist ID. Must be a positive integer.")
            .into_response();
    };

    let artist = match store.get_artist(artist_id) {
        Ok(Some(artist)) => artist,
        Ok(None) => return ApiError::not_found("Artist not found").into_response(),
        Err(e) => return internal_error("Failed to fetch artist page content", e).into_response(),
    };

    match wikipedia.fetch_page(artist.page_id).await {
        Ok(page) => Json(PageContentResponse {
            content: page.content,
        })
        .into_response(),
        Err(FetchError::NotFound(_)) => ApiError::not_found("Artist not found").into_response(),
        Err(e @ FetchError::Status { .. }) => ApiError::validation(e.to_string()).into_response(),
        Err(e) => {
            warn!("Wikipedia fetch for artist {} failed: {}", artist_id, e);
            ApiError::upstream("Failed to fetch artist page content").into_response()
        }
    }
}

async fn update_artist_pages(
    State(pipeline): State<GuardedEnrichmentPipeline>,
    body: Bytes,
) -> Response {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        UpdatePagesBody::default()
    } else {
        match serde_json::from_slice::<UpdatePagesBody>(&body) {
            Ok(body) => body,
            Err(e) => {
                warn!("Rejected update-pages body: {}", e);
                return ApiError::validation("Invalid request").into_response();
            }
        }
    };
    let artist_ids = body
        .artist_ids
        .unwrap_or_else(|| pipeline.settings().default_page_artist_ids.clone());

    match pipeline.sync_artist_pages(&artist_ids).await {
        Ok(report) => Json(UpdatePagesResponse {
            message: "Artist pages updated successfully",
            pages_created: report.pages_created,
        })
        .into_response(),
        Err(e) => internal_error("Failed to update artist pages", e).into_response(),
    }
}

async fn update_spotify_info(
    State(user_store): State<GuardedUserStore>,
    State(pipeline): State<GuardedEnrichmentPipeline>,
    headers: HeaderMap,
    body: Result<Json<LimitBody>, JsonRejection>,
) -> Response {
    let session = match SpotifySession::from_headers(&headers, user_store.as_ref()) {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };
    let limit = match parse_limit_body(body) {
        Ok(limit) => limit,
        Err(e) => return e.into_response(),
    };

    match pipeline.enrich_spotify(&session.access_token, limit).await {
        Ok(report) => {
            info!(
                "Spotify enrichment for {}: {} of {} artists updated",
                session.user.id, report.updated, report.processed
            );
            (
                StatusCode::OK,
                Json(UpdatedCountResponse {
                    updated_count: report.updated,
                    message: format!(
                        "Updated {} artists with Spotify information",
                        report.updated
                    ),
                }),
            )
                .into_response()
        }
        Err(e) => internal_error("Failed to update artists with Spotify information", e)
            .into_response(),
    }
}

pub fn make_artist_routes(state: ServerState) -> Router {
    Router::new()
        .route("/toronto", get(list_toronto_artists))
        .route("/toronto/update", post(update_toronto_artists))
        .route(
            "/toronto/{id}/source/wikipedia",
            get(get_artist_wikipedia_source),
        )
        .route("/toronto/update-pages", post(update_artist_pages))
        .route("/update-spotify-info", post(update_spotify_info))
        .with_state(state)
}
