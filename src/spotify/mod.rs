//! Spotify Web API and Accounts service client, plus the PKCE flow helpers.

mod auth_state;
mod client;
mod models;
pub mod pkce;

pub use auth_state::{AuthStateStore, PendingAuth, AUTH_STATE_TTL_SECS};
pub use client::{
    SpotifyClient, SpotifyClientConfig, DEFAULT_SPOTIFY_ACCOUNTS_URL, DEFAULT_SPOTIFY_API_URL,
    SPOTIFY_SCOPES,
};
pub use models::{
    SpotifyAlbum, SpotifyArtist, SpotifyImage, SpotifyProfile, SpotifyTrack, SpotifyTrackArtist,
};

use crate::upstream::FetchError;
use crate::user::SpotifyTokens;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// URL of the consent page for a PKCE authorization request.
    fn authorize_url(&self, code_challenge: &str, state: &str) -> String;

    /// Trades an authorization code and its verifier for tokens.
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<SpotifyTokens, FetchError>;

    async fn get_current_user(&self, access_token: &str) -> Result<SpotifyProfile, FetchError>;

    /// First artist matching `query`, if any.
    async fn search_artist(
        &self,
        access_token: &str,
        query: &str,
    ) -> Result<Option<SpotifyArtist>, FetchError>;

    /// Raw track objects matching `query`.
    async fn search_tracks(&self, access_token: &str, query: &str)
        -> Result<Vec<Value>, FetchError>;

    async fn get_artist_top_tracks(
        &self,
        access_token: &str,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<SpotifyTrack>, FetchError>;

    /// Starts playback of `uri` on the account's active device.
    async fn play(&self, access_token: &str, uri: &str) -> Result<(), FetchError>;
}
