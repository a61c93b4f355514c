//! reqwest-backed implementation of [`SpotifyApi`].

use super::models::{SpotifyArtist, SpotifyErrorBody, SpotifyProfile, SpotifyTrack};
use super::SpotifyApi;
use crate::upstream::{build_http_client, send, FetchError};
use crate::user::SpotifyTokens;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const SPOTIFY_SCOPES: &str =
    "user-read-private user-read-email user-read-playback-state user-modify-playback-state";

const SERVICE: &str = "spotify";
const TRACK_SEARCH_LIMIT: &str = "50";

#[derive(Debug, Clone)]
pub struct SpotifyClientConfig {
    pub client_id: String,
    /// Must match the redirect URI registered for the app.
    pub redirect_uri: String,
    pub api_base_url: String,
    pub accounts_base_url: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize)]
struct ArtistSearchResponse {
    artists: Paging<SpotifyArtist>,
}

#[derive(Deserialize)]
struct TrackSearchResponse {
    tracks: Paging<Value>,
}

#[derive(Deserialize)]
struct TopTracksResponse {
    #[serde(default)]
    tracks: Vec<SpotifyTrack>,
}

pub struct SpotifyClient {
    client: reqwest::Client,
    client_id: String,
    redirect_uri: String,
    api_base_url: String,
    accounts_base_url: String,
}

impl SpotifyClient {
    pub fn new(config: SpotifyClientConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_http_client()?,
            client_id: config.client_id,
            redirect_uri: config.redirect_uri,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            accounts_base_url: config.accounts_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn accounts_base_url(&self) -> &str {
        &self.accounts_base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path)
    }
}

/// Replaces a raw error body with the `error.message` Spotify puts in it.
fn with_spotify_message(err: FetchError) -> FetchError {
    match err {
        FetchError::Status {
            service,
            status,
            message,
        } => {
            let message = serde_json::from_str::<SpotifyErrorBody>(&message)
                .map(|body| body.error.message)
                .unwrap_or(message);
            FetchError::Status {
                service,
                status,
                message,
            }
        }
        other => other,
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    fn authorize_url(&self, code_challenge: &str, state: &str) -> String {
        format!(
            "{}/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}&code_challenge_method=S256&code_challenge={}&state={}",
            self.accounts_base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(SPOTIFY_SCOPES),
            urlencoding::encode(code_challenge),
            urlencoding::encode(state),
        )
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<SpotifyTokens, FetchError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ];
        let url = format!("{}/api/token", self.accounts_base_url);
        debug!(url = %url, "Exchanging authorization code");

        let response = send(SERVICE, self.client.post(&url).form(&form)).await?;
        let token: TokenResponse = response.json().await?;
        Ok(SpotifyTokens {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        })
    }

    async fn get_current_user(&self, access_token: &str) -> Result<SpotifyProfile, FetchError> {
        let request = self.client.get(self.api_url("me")).bearer_auth(access_token);
        let response = send(SERVICE, request).await.map_err(with_spotify_message)?;
        Ok(response.json().await?)
    }

    async fn search_artist(
        &self,
        access_token: &str,
        query: &str,
    ) -> Result<Option<SpotifyArtist>, FetchError> {
        debug!(query, "Searching Spotify artist");
        let request = self
            .client
            .get(self.api_url("search"))
            .bearer_auth(access_token)
            .query(&[("q", query), ("type", "artist"), ("limit", "1")]);
        let response = send(SERVICE, request).await.map_err(with_spotify_message)?;
        let body: ArtistSearchResponse = response.json().await?;
        Ok(body.artists.items.into_iter().next())
    }

    async fn search_tracks(
        &self,
        access_token: &str,
        query: &str,
    ) -> Result<Vec<Value>, FetchError> {
        debug!(query, "Searching Spotify tracks");
        let request = self
            .client
            .get(self.api_url("search"))
            .bearer_auth(access_token)
            .query(&[("q", query), ("type", "track"), ("limit", TRACK_SEARCH_LIMIT)]);
        let response = send(SERVICE, request).await.map_err(with_spotify_message)?;
        let body: TrackSearchResponse = response.json().await?;
        Ok(body.tracks.items)
    }

    async fn get_artist_top_tracks(
        &self,
        access_token: &str,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<SpotifyTrack>, FetchError> {
        let path = format!("artists/{}/top-tracks", urlencoding::encode(artist_id));
        let request = self
            .client
            .get(self.api_url(&path))
            .bearer_auth(access_token)
            .query(&[("market", market)]);
        let response = send(SERVICE, request).await.map_err(with_spotify_message)?;
        let body: TopTracksResponse = response.json().await?;
        Ok(body.tracks)
    }

    async fn play(&self, access_token: &str, uri: &str) -> Result<(), FetchError> {
        let request = self
            .client
            .put(self.api_url("me/player/play"))
            .bearer_auth(access_token)
            .json(&json!({ "uris": [uri] }));
        send(SERVICE, request).await.map_err(with_spotify_message)?;
        Ok(())
    }
}
