//! Enrichment pipeline.
//!
//! Each job pulls rows from the taxonomy store, calls one external service per
//! row and writes the result back:
//!
//! ```text
//! Wikipedia category → artists
//! artists.pageid     → Wikipedia extract → page
//! artists.title      → Spotify search    → spotify_id + raw genres
//! raw genre name     → categorizer       → artist_genre.category_genre_id
//! ```
//!
//! A failure on one row is logged and skipped. Reports only count successes
//! as updated.

mod categories;
mod import;
mod pages;
mod spotify;

#[cfg(test)]
pub(crate) mod test_support;

pub use categories::CategoryMappingReport;
pub use pages::PageSyncReport;
pub use spotify::SpotifyEnrichmentReport;

use crate::categorizer::GenreCategorizer;
use crate::config::EnrichmentSettings;
use crate::spotify::SpotifyApi;
use crate::taxonomy::TaxonomyStore;
use crate::wikipedia::WikipediaApi;
use std::sync::Arc;

pub struct EnrichmentPipeline {
    store: Arc<dyn TaxonomyStore>,
    wikipedia: Arc<dyn WikipediaApi>,
    spotify: Arc<dyn SpotifyApi>,
    categorizer: Arc<dyn GenreCategorizer>,
    settings: EnrichmentSettings,
}

impl EnrichmentPipeline {
    pub fn new(
        store: Arc<dyn TaxonomyStore>,
        wikipedia: Arc<dyn WikipediaApi>,
        spotify: Arc<dyn SpotifyApi>,
        categorizer: Arc<dyn GenreCategorizer>,
        settings: EnrichmentSettings,
    ) -> Self {
        Self {
            store,
            wikipedia,
            spotify,
            categorizer,
            settings,
        }
    }

    pub fn settings(&self) -> &EnrichmentSettings {
        &self.settings
    }
}
