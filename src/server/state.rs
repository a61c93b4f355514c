use axum::extract::FromRef;

use crate::categorizer::GenreCategorizer;
use crate::config::EnrichmentSettings;
use crate::enrichment::EnrichmentPipeline;
use crate::spotify::{AuthStateStore, SpotifyApi};
use crate::taxonomy::TaxonomyStore;
use crate::user::UserStore;
use crate::wikipedia::WikipediaApi;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedTaxonomyStore = Arc<dyn TaxonomyStore>;
pub type GuardedUserStore = Arc<dyn UserStore>;
pub type GuardedWikipedia = Arc<dyn WikipediaApi>;
pub type GuardedSpotify = Arc<dyn SpotifyApi>;
pub type GuardedEnrichmentPipeline = Arc<EnrichmentPipeline>;
pub type GuardedAuthStateStore = Arc<AuthStateStore>;

/// Storage and outbound clients the routes run against.
pub struct Services {
    pub taxonomy_store: GuardedTaxonomyStore,
    pub user_store: GuardedUserStore,
    pub wikipedia: GuardedWikipedia,
    pub spotify: GuardedSpotify,
    pub categorizer: Arc<dyn GenreCategorizer>,
}

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub taxonomy_store: GuardedTaxonomyStore,
    pub user_store: GuardedUserStore,
    pub wikipedia: GuardedWikipedia,
    pub spotify: GuardedSpotify,
    pub enrichment: GuardedEnrichmentPipeline,
    pub auth_state_store: GuardedAuthStateStore,
}

impl ServerState {
    pub fn new(config: ServerConfig, services: Services, enrichment: EnrichmentSettings) -> Self {
        let pipeline = EnrichmentPipeline::new(
            services.taxonomy_store.clone(),
            services.wikipedia.clone(),
            services.spotify.clone(),
            services.categorizer,
            enrichment,
        );
        ServerState {
            config,
            start_time: Instant::now(),
            hash: env!("GIT_HASH").to_owned(),
            taxonomy_store: services.taxonomy_store,
            user_store: services.user_store,
            wikipedia: services.wikipedia,
            spotify: services.spotify,
            enrichment: Arc::new(pipeline),
            auth_state_store: Arc::new(AuthStateStore::new()),
        }
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedTaxonomyStore {
    fn from_ref(input: &ServerState) -> Self {
        input.taxonomy_store.clone()
    }
}

impl FromRef<ServerState> for GuardedUserStore {
    fn from_ref(input: &ServerState) -> Self {
        input.user_store.clone()
    }
}

impl FromRef<ServerState> for GuardedWikipedia {
    fn from_ref(input: &ServerState) -> Self {
        input.wikipedia.clone()
    }
}

impl FromRef<ServerState> for GuardedSpotify {
    fn from_ref(input: &ServerState) -> Self {
        input.spotify.clone()
    }
}

impl FromRef<ServerState> for GuardedEnrichmentPipeline {
    fn from_ref(input: &ServerState) -> Self {
        input.enrichment.clone()
    }
}

impl FromRef<ServerState> for GuardedAuthStateStore {
    fn from_ref(input: &ServerState) -> Self {
        input.auth_state_store.clone()
    }
}
