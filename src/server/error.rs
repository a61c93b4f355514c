use crate::upstream::FetchError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};
use tracing::error;

/// Failure of a route, rendered as `{"message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    /// A third-party service failed on a single-resource call.
    Upstream(String),
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError::Upstream(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(m)
            | ApiError::NotFound(m)
            | ApiError::Upstream(m)
            | ApiError::Internal(m) => m,
        }
    }

    fn render(self, field: &str) -> Response {
        let status = self.status();
        let mut body = Map::new();
        body.insert(field.to_string(), Value::String(self.message().to_string()));
        (status, Json(Value::Object(body))).into_response()
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound(m) => ApiError::NotFound(m),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.render("message")
    }
}

/// Same failures, rendered as `{"error": ...}` for the Spotify routes.
#[derive(Debug)]
pub struct SpotifyRouteError(pub ApiError);

impl From<ApiError> for SpotifyRouteError {
    fn from(e: ApiError) -> Self {
        SpotifyRouteError(e)
    }
}

impl From<FetchError> for SpotifyRouteError {
    fn from(e: FetchError) -> Self {
        SpotifyRouteError(e.into())
    }
}

impl IntoResponse for SpotifyRouteError {
    fn into_response(self) -> Response {
        self.0.render("error")
    }
}

/// Logs `err` and turns it into a 500 carrying `message`.
pub fn internal_error(message: &str, err: anyhow::Error) -> ApiError {
    error!("{}: {:#}", message, err);
    ApiError::internal(message)
}
