use super::EnrichmentPipeline;
use crate::server::metrics::record_enrichment_updates;
use crate::taxonomy::Artist;
use anyhow::{Context, Result};
use tracing::info;

impl EnrichmentPipeline {
    /// Crawls the configured Wikipedia category and inserts one artist per
    /// member. Existing rows are not checked, so running it twice duplicates
    /// every artist. A failed crawl inserts nothing.
    pub async fn import_category_artists(&self) -> Result<Vec<Artist>> {
        let category = &self.settings.wikipedia_category;
        let members = self
            .wikipedia
            .fetch_category_members(category)
            .await
            .with_context(|| format!("Failed to crawl {}", category))?;

        info!("Importing {} artists from {}", members.len(), category);

        let mut created = Vec::with_capacity(members.len());
        for member in members {
            let artist = self
                .store
                .create_artist(&member.title, &self.settings.location, member.page_id)
                .with_context(|| format!("Failed to insert artist {}", member.title))?;
            created.push(artist);
        }

        record_enrichment_updates("category_import", created.len());
        info!("Category import complete: {} artists created", created.len());
        Ok(created)
    }
}
