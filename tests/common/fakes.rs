//! In-process stand-ins for Wikipedia, Spotify and the categorizer
//!
//! Each fake records how often it was called so tests can assert that a
//! route did (or did not) reach the upstream service.

use super::constants::*;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use toronto_artists_server::categorizer::{CategorizerError, GenreCategorizer};
use toronto_artists_server::spotify::{
    SpotifyAlbum, SpotifyApi, SpotifyArtist, SpotifyImage, SpotifyProfile, SpotifyTrack,
    SpotifyTrackArtist,
};
use toronto_artists_server::taxonomy::CategoryGenre;
use toronto_artists_server::upstream::FetchError;
use toronto_artists_server::user::SpotifyTokens;
use toronto_artists_server::wikipedia::{CategoryMember, WikipediaApi, WikipediaPage};

// ============================================================================
// Wikipedia
// ============================================================================

#[derive(Default)]
pub struct FakeWikipedia {
    members: Mutex<Vec<CategoryMember>>,
    pages: Mutex<HashMap<i64, String>>,
    page_requests: AtomicUsize,
}

impl FakeWikipedia {
    pub fn add_member(&self, page_id: i64, title: &str) {
        self.members.lock().unwrap().push(CategoryMember {
            page_id,
            title: title.to_string(),
        });
    }

    pub fn set_page(&self, page_id: i64, content: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(page_id, content.to_string());
    }

    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WikipediaApi for FakeWikipedia {
    async fn fetch_category_members(
        &self,
        _category: &str,
    ) -> Result<Vec<CategoryMember>, FetchError> {
        Ok(self.members.lock().unwrap().clone())
    }

    async fn fetch_page(&self, page_id: i64) -> Result<WikipediaPage, FetchError> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);
        let content = self.pages.lock().unwrap().get(&page_id).cloned();
        content
            .map(|content| WikipediaPage {
                page_id,
                title: format!("Page {}", page_id),
                content,
            })
            .ok_or_else(|| FetchError::NotFound(format!("page {}", page_id)))
    }
}

// ============================================================================
// Spotify
// ============================================================================

#[derive(Default)]
pub struct FakeSpotify {
    artists: Mutex<HashMap<String, SpotifyArtist>>,
    failing_searches: Mutex<HashSet<String>>,
    top_tracks: Mutex<HashMap<String, Vec<SpotifyTrack>>>,
    fail_play: AtomicBool,
    token_exchanges: AtomicUsize,
    played: Mutex<Vec<String>>,
}

impl FakeSpotify {
    pub fn add_artist(&self, name: &str, id: &str, genres: &[&str]) {
        self.artists.lock().unwrap().insert(
            name.to_string(),
            SpotifyArtist {
                id: id.to_string(),
                name: name.to_string(),
                genres: genres.iter().map(|g| g.to_string()).collect(),
                extra: Default::default(),
            },
        );
    }

    pub fn fail_search_for(&self, name: &str) {
        self.failing_searches
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    pub fn add_top_track(&self, artist_id: &str, track_id: &str, name: &str) {
        self.top_tracks
            .lock()
            .unwrap()
            .entry(artist_id.to_string())
            .or_default()
            .push(SpotifyTrack {
                id: track_id.to_string(),
                name: name.to_string(),
                uri: format!("spotify:track:{}", track_id),
                artists: vec![SpotifyTrackArtist {
                    name: format!("Artist {}", artist_id),
                }],
                album: SpotifyAlbum {
                    name: format!("Album of {}", name),
                    images: vec![SpotifyImage {
                        url: format!("https://images.test/{}", track_id),
                    }],
                },
            });
    }

    pub fn fail_play(&self) {
        self.fail_play.store(true, Ordering::SeqCst);
    }

    pub fn token_exchanges(&self) -> usize {
        self.token_exchanges.load(Ordering::SeqCst)
    }

    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }
}

fn unauthorized() -> FetchError {
    FetchError::Status {
        service: "spotify",
        status: 401,
        message: "Invalid access token".to_string(),
    }
}

fn check_token(access_token: &str) -> Result<(), FetchError> {
    if access_token == TEST_ACCESS_TOKEN || access_token == OAUTH_ACCESS_TOKEN {
        Ok(())
    } else {
        Err(unauthorized())
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    fn authorize_url(&self, code_challenge: &str, state: &str) -> String {
        format!(
            "https://accounts.test/authorize?code_challenge={}&state={}",
            code_challenge, state
        )
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<SpotifyTokens, FetchError> {
        self.token_exchanges.fetch_add(1, Ordering::SeqCst);
        if code != "good-code" || code_verifier.is_empty() {
            return Err(FetchError::Status {
                service: "spotify",
                status: 400,
                message: "invalid_grant".to_string(),
            });
        }
        Ok(SpotifyTokens {
            access_token: OAUTH_ACCESS_TOKEN.to_string(),
            refresh_token: Some("oauth-refresh-token".to_string()),
        })
    }

    async fn get_current_user(&self, access_token: &str) -> Result<SpotifyProfile, FetchError> {
        check_token(access_token)?;
        Ok(SpotifyProfile {
            id: OAUTH_USER_ID.to_string(),
            display_name: Some("OAuth User".to_string()),
            email: Some("oauth@example.com".to_string()),
        })
    }

    async fn search_artist(
        &self,
        access_token: &str,
        query: &str,
    ) -> Result<Option<SpotifyArtist>, FetchError> {
        check_token(access_token)?;
        if self.failing_searches.lock().unwrap().contains(query) {
            return Err(FetchError::Status {
                service: "spotify",
                status: 429,
                message: "API rate limit exceeded".to_string(),
            });
        }
        Ok(self.artists.lock().unwrap().get(query).cloned())
    }

    async fn search_tracks(
        &self,
        access_token: &str,
        query: &str,
    ) -> Result<Vec<Value>, FetchError> {
        check_token(access_token)?;
        Ok(vec![json!({
            "id": "search-track",
            "name": query,
            "uri": "spotify:track:search-track"
        })])
    }

    async fn get_artist_top_tracks(
        &self,
        access_token: &str,
        artist_id: &str,
        _market: &str,
    ) -> Result<Vec<SpotifyTrack>, FetchError> {
        check_token(access_token)?;
        Ok(self
            .top_tracks
            .lock()
            .unwrap()
            .get(artist_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn play(&self, access_token: &str, uri: &str) -> Result<(), FetchError> {
        check_token(access_token)?;
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                service: "spotify",
                status: 404,
                message: "Player command failed: No active device found".to_string(),
            });
        }
        self.played.lock().unwrap().push(uri.to_string());
        Ok(())
    }
}

// ============================================================================
// Categorizer
// ============================================================================

#[derive(Default)]
pub struct FakeCategorizer {
    answers: Mutex<HashMap<String, CategoryGenre>>,
    calls: AtomicUsize,
}

impl FakeCategorizer {
    pub fn set(&self, genre: &str, category: CategoryGenre) {
        self.answers
            .lock()
            .unwrap()
            .insert(genre.to_string(), category);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenreCategorizer for FakeCategorizer {
    async fn categorize(
        &self,
        genre_name: &str,
    ) -> Result<Option<CategoryGenre>, CategorizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answers.lock().unwrap().get(genre_name).copied())
    }
}
