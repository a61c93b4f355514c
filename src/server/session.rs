use super::error::{ApiError, SpotifyRouteError};
use super::state::ServerState;
use crate::user::{SpotifyUser, UserStore};

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use tracing::{debug, error};

pub const HEADER_USER_ID_KEY: &str = "X-User-ID";

/// A Spotify-linked user named by the `X-User-ID` header.
#[derive(Debug)]
pub struct SpotifySession {
    pub user: SpotifyUser,
    pub access_token: String,
}

impl SpotifySession {
    pub fn from_headers(headers: &HeaderMap, user_store: &dyn UserStore) -> Result<Self, ApiError> {
        let user_id = headers
            .get(HEADER_USER_ID_KEY)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::validation("User ID not provided"))?;

        let user = match user_store.get_user(user_id) {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!("No user with id {}", user_id);
                return Err(ApiError::not_found("User not found"));
            }
            Err(e) => {
                error!("Failed to load user {}: {:#}", user_id, e);
                return Err(ApiError::internal("Failed to load user"));
            }
        };

        let access_token = user
            .access_token
            .clone()
            .ok_or_else(|| ApiError::validation("User has no Spotify access token"))?;

        Ok(SpotifySession { user, access_token })
    }
}

impl FromRequestParts<ServerState> for SpotifySession {
    type Rejection = SpotifyRouteError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        SpotifySession::from_headers(&parts.headers, ctx.user_store.as_ref())
            .map_err(SpotifyRouteError::from)
    }
}
