//! Genre routes: the genre table, category mapping and per-category listings.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::artist_routes::{parse_limit_body, LimitBody, UpdatedCountResponse};
use super::error::{internal_error, ApiError};
use super::state::{GuardedEnrichmentPipeline, GuardedTaxonomyStore, ServerState};

#[derive(Deserialize, Debug)]
struct CategoryBody {
    pub category: String,
}

async fn list_genres(State(store): State<GuardedTaxonomyStore>) -> Response {
    match store.list_genres() {
        Ok(genres) => Json(genres).into_response(),
        Err(e) => internal_error("Failed to fetch genres", e).into_response(),
    }
}

async fn update_genre_categories(
    State(pipeline): State<GuardedEnrichmentPipeline>,
    body: Result<Json<LimitBody>, JsonRejection>,
) -> Response {
    let limit = match parse_limit_body(body) {
        Ok(limit) => limit,
        Err(e) => return e.into_response(),
    };

    match pipeline.map_genre_categories(limit).await {
        Ok(report) => {
            info!(
                "Genre category mapping: {} updated, {} uncategorized, {} failed",
                report.updated, report.uncategorized, report.failed
            );
            Json(UpdatedCountResponse {
                updated_count: report.updated,
                message: format!(
                    "Updated {} artist_genre entries with category genre IDs",
                    report.updated
                ),
            })
            .into_response()
        }
        Err(e) => internal_error("Failed to update genre categories", e).into_response(),
    }
}

async fn list_category_genres(State(store): State<GuardedTaxonomyStore>) -> Response {
    match store.list_category_genres() {
        Ok(genres) => Json(genres).into_response(),
        Err(e) => internal_error("Failed to fetch category genres", e).into_response(),
    }
}

async fn list_artists_in_category(
    State(store): State<GuardedTaxonomyStore>,
    body: Result<Json<CategoryBody>, JsonRejection>,
) -> Response {
    let category = match body {
        Ok(Json(CategoryBody { category })) => category,
        Err(rejection) => {
            warn!("Rejected category body: {}", rejection.body_text());
            return ApiError::validation("Category not provided").into_response();
        }
    };

    match store.get_artists_in_category(&category) {
        Ok(artists) => Json(artists).into_response(),
        Err(e) => internal_error("Failed to fetch artists by category", e).into_response(),
    }
}

pub fn make_genre_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(list_genres))
        .route("/update-genre-categories", post(update_genre_categories))
        .route(
            "/categories",
            get(list_category_genres).post(list_artists_in_category),
        )
        .with_state(state)
}
