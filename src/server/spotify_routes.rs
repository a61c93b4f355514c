//! Spotify routes: the PKCE authorization flow and the user-scoped Web API proxy.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, warn};

use super::config::ServerConfig;
use super::error::{ApiError, SpotifyRouteError};
use super::session::SpotifySession;
use super::state::{
    GuardedAuthStateStore, GuardedSpotify, GuardedTaxonomyStore, GuardedUserStore, ServerState,
};
use crate::spotify::{pkce, PendingAuth, SpotifyTrack, AUTH_STATE_TTL_SECS};
use crate::upstream::FetchError;
use crate::user::UserUpsert;

pub const AUTH_STATE_COOKIE: &str = "spotify_auth_state";

/// Market used for artist top tracks.
const TOP_TRACKS_MARKET: &str = "US";

const ARTIST_SEARCH_SEPARATOR: &str = " OR ";

type RouteResult = Result<Response, SpotifyRouteError>;

#[derive(Deserialize, Debug)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

#[derive(Deserialize, Debug)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CategoryQuery {
    category: Option<String>,
}

#[derive(Deserialize, Debug)]
struct PlayBody {
    uri: Option<String>,
}

#[derive(Deserialize, Debug)]
struct NextTrackBody {
    category: Option<String>,
}

#[derive(Serialize)]
struct ProfileResponse {
    display_name: Option<String>,
    email: Option<String>,
    id: String,
}

#[derive(Serialize)]
struct ArtistHit {
    id: String,
    genres: Vec<String>,
}

#[derive(Serialize, Debug, PartialEq)]
struct TrackSummary {
    id: String,
    name: String,
    uri: String,
    artist: Option<String>,
    album: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl From<SpotifyTrack> for TrackSummary {
    fn from(track: SpotifyTrack) -> Self {
        TrackSummary {
            id: track.id,
            name: track.name,
            uri: track.uri,
            artist: track.artists.into_iter().next().map(|a| a.name),
            image: track.album.images.into_iter().next().map(|i| i.url),
            album: track.album.name,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NextArtist {
    id: i64,
    name: String,
    spotify_id: Option<String>,
}

fn required(value: Option<String>, message: &str) -> Result<String, SpotifyRouteError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(message).into())
}

fn invalid_request(message: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

fn frontend_redirect_url(frontend_base_url: &str, user_id: &str) -> String {
    format!(
        "{}?user_id={}",
        frontend_base_url,
        urlencoding::encode(user_id)
    )
}

/// Removes the cookie the browser holds for the pending authorization.
fn clear_auth_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(AUTH_STATE_COOKIE).path("/"))
}

async fn start_auth(
    State(spotify): State<GuardedSpotify>,
    State(auth_states): State<GuardedAuthStateStore>,
    jar: CookieJar,
) -> Response {
    let code_verifier = pkce::generate_code_verifier();
    let challenge = pkce::code_challenge(&code_verifier);
    let state = pkce::generate_state();

    auth_states
        .store(PendingAuth::new(state.clone(), code_verifier))
        .await;
    debug!("Issued Spotify authorization state");

    let cookie = Cookie::build((AUTH_STATE_COOKIE, state.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(AUTH_STATE_TTL_SECS))
        .build();

    let authorize_url = spotify.authorize_url(&challenge, &state);
    (jar.add(cookie), Redirect::to(&authorize_url)).into_response()
}

async fn auth_callback(
    State(config): State<ServerConfig>,
    State(spotify): State<GuardedSpotify>,
    State(user_store): State<GuardedUserStore>,
    State(auth_states): State<GuardedAuthStateStore>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return invalid_request("Invalid request");
    };
    let Some(cookie_state) = jar.get(AUTH_STATE_COOKIE).map(|c| c.value().to_string()) else {
        return invalid_request("Invalid request");
    };
    if query.state.as_deref() != Some(cookie_state.as_str()) {
        warn!("Spotify callback state does not match the auth cookie");
        return invalid_request("Invalid request");
    }
    let Some(pending) = auth_states.take(&cookie_state).await else {
        warn!("Spotify callback for unknown or expired state");
        return invalid_request("Invalid request");
    };

    let tokens = match spotify.exchange_code(&code, &pending.code_verifier).await {
        Ok(tokens) => tokens,
        Err(e) => {
            warn!("Spotify token exchange failed: {}", e);
            return invalid_request("Failed to obtain access token");
        }
    };

    let profile = match spotify.get_current_user(&tokens.access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("Spotify profile fetch failed: {}", e);
            return invalid_request("Failed to fetch Spotify profile");
        }
    };

    match user_store.upsert_user(
        &profile.id,
        profile.display_name.as_deref(),
        profile.email.as_deref(),
        &tokens,
    ) {
        Ok(UserUpsert::Inserted) => info!("New Spotify user {}", profile.id),
        Ok(UserUpsert::TokensUpdated) => info!("Refreshed tokens for Spotify user {}", profile.id),
        Err(e) => {
            error!("Failed to store Spotify user {}: {:#}", profile.id, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store user").into_response();
        }
    }

    let location = frontend_redirect_url(&config.frontend_base_url, &profile.id);
    (clear_auth_cookie(jar), Redirect::to(&location)).into_response()
}

async fn get_profile(session: SpotifySession) -> Response {
    Json(ProfileResponse {
        display_name: session.user.display_name,
        email: session.user.email,
        id: session.user.id,
    })
    .into_response()
}

async fn search_tracks(
    session: SpotifySession,
    State(spotify): State<GuardedSpotify>,
    Query(query): Query<SearchQuery>,
) -> RouteResult {
    let q = required(query.q, "Invalid request")?;
    let tracks = spotify.search_tracks(&session.access_token, &q).await?;
    Ok(Json(tracks).into_response())
}

async fn search_artist(
    session: SpotifySession,
    State(spotify): State<GuardedSpotify>,
    Query(query): Query<SearchQuery>,
) -> RouteResult {
    let q = required(query.q, "Invalid request")?;
    match spotify.search_artist(&session.access_token, &q).await? {
        Some(artist) => Ok(Json(ArtistHit {
            id: artist.id,
            genres: artist.genres,
        })
        .into_response()),
        None => Err(ApiError::not_found("No artist found").into()),
    }
}

/// One artist search per ` OR `-separated term; failed terms are skipped.
async fn search_artists(
    session: SpotifySession,
    State(spotify): State<GuardedSpotify>,
    Query(query): Query<SearchQuery>,
) -> RouteResult {
    let q = required(query.q, "Invalid request")?;

    let mut items = Vec::new();
    for term in q.split(ARTIST_SEARCH_SEPARATOR) {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        match spotify.search_artist(&session.access_token, term).await {
            Ok(Some(artist)) => items.push(artist),
            Ok(None) => debug!("No Spotify artist for {:?}", term),
            Err(e) => warn!("Spotify artist search for {:?} failed: {}", term, e),
        }
    }

    Ok(Json(json!({ "artists": { "items": items } })).into_response())
}

async fn play(
    session: SpotifySession,
    State(spotify): State<GuardedSpotify>,
    body: Result<Json<PlayBody>, JsonRejection>,
) -> RouteResult {
    let uri = required(body.ok().and_then(|Json(b)| b.uri), "Invalid request")?;

    match spotify.play(&session.access_token, &uri).await {
        Ok(()) => Ok(Json(json!({ "success": true })).into_response()),
        Err(FetchError::Status { message, .. }) => Err(ApiError::upstream(message).into()),
        Err(e) => Err(e.into()),
    }
}

async fn next_track(
    session: SpotifySession,
    State(store): State<GuardedTaxonomyStore>,
    State(spotify): State<GuardedSpotify>,
    body: Result<Json<NextTrackBody>, JsonRejection>,
) -> RouteResult {
    let category = required(body.ok().and_then(|Json(b)| b.category), "Invalid request")?;

    let artist = store
        .get_random_artist_in_category(&category, true)
        .map_err(|e| {
            error!("Failed to pick an artist in {:?}: {:#}", category, e);
            ApiError::internal("An unexpected error occurred")
        })?;
    let Some(spotify_id) = artist.and_then(|a| a.spotify_id) else {
        return Err(ApiError::not_found("No artist found for the given category").into());
    };

    let tracks = match spotify
        .get_artist_top_tracks(&session.access_token, &spotify_id, TOP_TRACKS_MARKET)
        .await
    {
        Ok(tracks) => tracks,
        Err(e) => {
            error!("Top tracks for {} failed: {}", spotify_id, e);
            return Err(ApiError::internal("Failed to fetch top tracks").into());
        }
    };

    let Some(track) = tracks.choose(&mut rand::rng()).cloned() else {
        return Err(ApiError::not_found("No tracks found for the artist").into());
    };

    let track: TrackSummary = track.into();
    Ok(Json(json!({ "track": track })).into_response())
}

async fn next_artist(
    State(store): State<GuardedTaxonomyStore>,
    Query(query): Query<CategoryQuery>,
) -> RouteResult {
    let category = required(query.category, "Category not provided")?;

    let artist = store
        .get_random_artist_in_category(&category, false)
        .map_err(|e| {
            error!("Failed to pick an artist in {:?}: {:#}", category, e);
            ApiError::internal("An unexpected error occurred")
        })?
        .ok_or_else(|| ApiError::not_found("No artist found for the given category"))?;

    let artist = NextArtist {
        id: artist.id,
        name: artist.title,
        spotify_id: artist.spotify_id,
    };
    Ok(Json(json!({ "artist": artist })).into_response())
}

pub fn make_spotify_routes(state: ServerState) -> Router {
    Router::new()
        .route("/auth", get(start_auth))
        .route("/callback", get(auth_callback))
        .route("/profile", get(get_profile))
        .route("/search", get(search_tracks))
        .route("/search-artist", get(search_artist))
        .route("/search2", get(search_artists))
        .route("/play", post(play))
        .route("/next-track", post(next_track))
        .route("/next-artist", get(next_artist))
        .with_state(state)
}
