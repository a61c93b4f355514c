//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::{redirect, Response};
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client. Redirects are not followed so tests can inspect them.
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, user_id: Option<&str>) -> Response {
        let mut request = self.client.get(self.url(path));
        if let Some(user_id) = user_id {
            request = request.header("X-User-ID", user_id);
        }
        request.send().await.expect("GET request failed")
    }

    async fn post(&self, path: &str, user_id: Option<&str>, body: Option<Value>) -> Response {
        let mut request = self.client.post(self.url(path));
        if let Some(user_id) = user_id {
            request = request.header("X-User-ID", user_id);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        request.send().await.expect("POST request failed")
    }

    // ========================================================================
    // Root
    // ========================================================================

    /// GET /status
    pub async fn status(&self) -> Response {
        self.get("/status", None).await
    }

    /// GET /
    pub async fn home(&self) -> Response {
        self.get("/", None).await
    }

    // ========================================================================
    // Artists
    // ========================================================================

    /// GET /artists/toronto
    pub async fn list_artists(&self) -> Response {
        self.get("/artists/toronto", None).await
    }

    /// POST /artists/toronto/update
    pub async fn import_artists(&self) -> Response {
        self.post("/artists/toronto/update", None, None).await
    }

    /// GET /artists/toronto/{id}/source/wikipedia
    pub async fn get_wikipedia_source(&self, artist_id: &str) -> Response {
        self.get(
            &format!("/artists/toronto/{}/source/wikipedia", artist_id),
            None,
        )
        .await
    }

    /// POST /artists/toronto/update-pages
    pub async fn update_pages(&self, artist_ids: Option<&[i64]>) -> Response {
        let body = artist_ids.map(|ids| json!({ "artistIds": ids }));
        self.post("/artists/toronto/update-pages", None, body).await
    }

    /// POST /artists/update-spotify-info
    pub async fn update_spotify_info(&self, user_id: Option<&str>, limit: usize) -> Response {
        self.post(
            "/artists/update-spotify-info",
            user_id,
            Some(json!({ "limit": limit })),
        )
        .await
    }

    // ========================================================================
    // Genres
    // ========================================================================

    /// GET /genres
    pub async fn list_genres(&self) -> Response {
        self.get("/genres", None).await
    }

    /// POST /genres/update-genre-categories
    pub async fn update_genre_categories(&self, limit: usize) -> Response {
        self.post(
            "/genres/update-genre-categories",
            None,
            Some(json!({ "limit": limit })),
        )
        .await
    }

    /// GET /genres/categories
    pub async fn list_category_genres(&self) -> Response {
        self.get("/genres/categories", None).await
    }

    /// POST /genres/categories
    pub async fn artists_in_category(&self, category: &str) -> Response {
        self.post(
            "/genres/categories",
            None,
            Some(json!({ "category": category })),
        )
        .await
    }

    // ========================================================================
    // Spotify OAuth
    // ========================================================================

    /// GET /spotify/auth
    pub async fn spotify_auth(&self) -> Response {
        self.get("/spotify/auth", None).await
    }

    /// GET /spotify/callback, optionally carrying the auth state cookie
    pub async fn spotify_callback(
        &self,
        code: Option<&str>,
        state: Option<&str>,
        cookie_state: Option<&str>,
    ) -> Response {
        let mut query = Vec::new();
        if let Some(code) = code {
            query.push(("code", code));
        }
        if let Some(state) = state {
            query.push(("state", state));
        }
        let mut request = self.client.get(self.url("/spotify/callback")).query(&query);
        if let Some(cookie_state) = cookie_state {
            request = request.header(
                reqwest::header::COOKIE,
                format!("spotify_auth_state={}", cookie_state),
            );
        }
        request.send().await.expect("Callback request failed")
    }

    // ========================================================================
    // Spotify proxy
    // ========================================================================

    /// GET /spotify/profile
    pub async fn spotify_profile(&self, user_id: Option<&str>) -> Response {
        self.get("/spotify/profile", user_id).await
    }

    /// GET /spotify/search?q=
    pub async fn search_tracks(&self, user_id: &str, q: &str) -> Response {
        self.get(
            &format!("/spotify/search?q={}", urlencoding::encode(q)),
            Some(user_id),
        )
        .await
    }

    /// GET /spotify/search-artist?q=
    pub async fn search_artist(&self, user_id: &str, q: &str) -> Response {
        self.get(
            &format!("/spotify/search-artist?q={}", urlencoding::encode(q)),
            Some(user_id),
        )
        .await
    }

    /// GET /spotify/search2?q=
    pub async fn search_artists(&self, user_id: &str, q: &str) -> Response {
        self.get(
            &format!("/spotify/search2?q={}", urlencoding::encode(q)),
            Some(user_id),
        )
        .await
    }

    /// POST /spotify/play
    pub async fn play(&self, user_id: &str, body: Value) -> Response {
        self.post("/spotify/play", Some(user_id), Some(body)).await
    }

    /// POST /spotify/next-track
    pub async fn next_track(&self, user_id: &str, category: &str) -> Response {
        self.post(
            "/spotify/next-track",
            Some(user_id),
            Some(json!({ "category": category })),
        )
        .await
    }

    /// GET /spotify/next-artist?category=
    pub async fn next_artist(&self, category: Option<&str>) -> Response {
        match category {
            Some(category) => {
                self.get(
                    &format!(
                        "/spotify/next-artist?category={}",
                        urlencoding::encode(category)
                    ),
                    None,
                )
                .await
            }
            None => self.get("/spotify/next-artist", None).await,
        }
    }
}
