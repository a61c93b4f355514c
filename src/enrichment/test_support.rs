//! In-memory fakes for the outbound clients, wired to a temporary store.

use super::EnrichmentPipeline;
use crate::categorizer::{CategorizerError, GenreCategorizer};
use crate::config::EnrichmentSettings;
use crate::server::state::Services;
use crate::spotify::{SpotifyApi, SpotifyArtist, SpotifyProfile, SpotifyTrack};
use crate::taxonomy::{CategoryGenre, SqliteTaxonomyStore};
use crate::upstream::FetchError;
use crate::user::SpotifyTokens;
use crate::wikipedia::{CategoryMember, WikipediaApi, WikipediaPage};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
pub struct FakeWikipedia {
    members: Mutex<Vec<CategoryMember>>,
    pages: Mutex<HashMap<i64, String>>,
    fail_category: AtomicBool,
    page_requests: AtomicUsize,
}

impl FakeWikipedia {
    pub fn set_members(&self, members: Vec<CategoryMember>) {
        *self.members.lock().unwrap() = members;
    }

    pub fn set_page(&self, page_id: i64, content: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(page_id, content.to_string());
    }

    pub fn fail_category(&self) {
        self.fail_category.store(true, Ordering::SeqCst);
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
        if self.fail_category.load(Ordering::SeqCst) {
            return Err(FetchError::Connection("refused".to_string()));
        }
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

#[derive(Default)]
pub struct FakeSpotify {
    artists: Mutex<HashMap<String, SpotifyArtist>>,
    failing: Mutex<HashSet<String>>,
    searches: AtomicUsize,
}

impl FakeSpotify {
    pub fn add_artist(&self, title: &str, id: &str, genres: &[&str]) {
        self.artists.lock().unwrap().insert(
            title.to_string(),
            SpotifyArtist {
                id: id.to_string(),
                name: title.to_string(),
                genres: genres.iter().map(|g| g.to_string()).collect(),
                extra: Default::default(),
            },
        );
    }

    pub fn fail_search_for(&self, title: &str) {
        self.failing.lock().unwrap().insert(title.to_string());
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    fn authorize_url(&self, code_challenge: &str, state: &str) -> String {
        format!("https://accounts.test/authorize?code_challenge={code_challenge}&state={state}")
    }

    async fn exchange_code(
        &self,
        _code: &str,
        _code_verifier: &str,
    ) -> Result<SpotifyTokens, FetchError> {
        Err(FetchError::NotFound("token".to_string()))
    }

    async fn get_current_user(&self, _access_token: &str) -> Result<SpotifyProfile, FetchError> {
        Err(FetchError::NotFound("me".to_string()))
    }

    async fn search_artist(
        &self,
        _access_token: &str,
        query: &str,
    ) -> Result<Option<SpotifyArtist>, FetchError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(query) {
            return Err(FetchError::Status {
                service: "spotify",
                status: 429,
                message: "rate limited".to_string(),
            });
        }
        Ok(self.artists.lock().unwrap().get(query).cloned())
    }

    async fn search_tracks(
        &self,
        _access_token: &str,
        _query: &str,
    ) -> Result<Vec<Value>, FetchError> {
        Ok(vec![])
    }

    async fn get_artist_top_tracks(
        &self,
        _access_token: &str,
        _artist_id: &str,
        _market: &str,
    ) -> Result<Vec<SpotifyTrack>, FetchError> {
        Ok(vec![])
    }

    async fn play(&self, _access_token: &str, _uri: &str) -> Result<(), FetchError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeCategorizer {
    answers: Mutex<HashMap<String, CategoryGenre>>,
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl FakeCategorizer {
    pub fn set(&self, genre: &str, category: CategoryGenre) {
        self.answers
            .lock()
            .unwrap()
            .insert(genre.to_string(), category);
    }

    pub fn fail_for(&self, genre: &str) {
        self.failing.lock().unwrap().insert(genre.to_string());
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
        if self.failing.lock().unwrap().contains(genre_name) {
            return Err(CategorizerError::Timeout);
        }
        Ok(self.answers.lock().unwrap().get(genre_name).copied())
    }
}

pub struct Fixture {
    pub store: Arc<SqliteTaxonomyStore>,
    pub wikipedia: Arc<FakeWikipedia>,
    pub spotify: Arc<FakeSpotify>,
    pub categorizer: Arc<FakeCategorizer>,
    _tmp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let store = SqliteTaxonomyStore::new(tmp.path().join("taxonomy.db")).unwrap();
        Self {
            store: Arc::new(store),
            wikipedia: Arc::new(FakeWikipedia::default()),
            spotify: Arc::new(FakeSpotify::default()),
            categorizer: Arc::new(FakeCategorizer::default()),
            _tmp: tmp,
        }
    }

    pub fn pipeline(&self) -> EnrichmentPipeline {
        EnrichmentPipeline::new(
            self.store.clone(),
            self.wikipedia.clone(),
            self.spotify.clone(),
            self.categorizer.clone(),
            EnrichmentSettings::default(),
        )
    }

    pub fn services(&self) -> Services {
        Services {
            taxonomy_store: self.store.clone(),
            user_store: self.store.clone(),
            wikipedia: self.wikipedia.clone(),
            spotify: self.spotify.clone(),
            categorizer: self.categorizer.clone(),
        }
    }
}
