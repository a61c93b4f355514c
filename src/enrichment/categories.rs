use super::EnrichmentPipeline;
use crate::server::metrics::record_enrichment_updates;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryMappingReport {
    pub processed: usize,
    pub updated: usize,
    /// Rows the categorizer had no label for. They stay unmapped.
    pub uncategorized: usize,
    /// Rows that got a category from another run while this one was working.
    pub already_mapped: usize,
    pub failed: usize,
}

impl EnrichmentPipeline {
    /// Asks the categorizer for a category for up to `limit` unmapped
    /// artist/genre rows, one call per row.
    pub async fn map_genre_categories(&self, limit: usize) -> Result<CategoryMappingReport> {
        let rows = self
            .store
            .get_unmapped_artist_genres(limit)
            .context("Failed to get unmapped artist genres")?;

        let mut report = CategoryMappingReport {
            processed: rows.len(),
            ..Default::default()
        };
        info!("Mapping categories for {} artist genres", rows.len());

        for row in &rows {
            match self.store.get_artist_genre(row.id) {
                Ok(Some(current)) if current.category_genre_id.is_none() => {}
                Ok(Some(_)) => {
                    debug!("artist_genre {} already mapped, skipping", row.id);
                    report.already_mapped += 1;
                    continue;
                }
                Ok(None) => {
                    debug!("artist_genre {} is gone, skipping", row.id);
                    report.failed += 1;
                    continue;
                }
                Err(e) => {
                    warn!("Failed to reload artist_genre {}: {:#}", row.id, e);
                    report.failed += 1;
                    continue;
                }
            }

            let genre = match self.store.get_genre(row.genre_id) {
                Ok(Some(genre)) => genre,
                Ok(None) => {
                    warn!("Genre {} of artist_genre {} is gone", row.genre_id, row.id);
                    report.failed += 1;
                    continue;
                }
                Err(e) => {
                    warn!("Failed to load genre {}: {:#}", row.genre_id, e);
                    report.failed += 1;
                    continue;
                }
            };

            let category = match self.categorizer.categorize(&genre.name).await {
                Ok(Some(category)) => category,
                Ok(None) => {
                    debug!("No category for genre {}", genre.name);
                    report.uncategorized += 1;
                    continue;
                }
                Err(e) => {
                    warn!("Categorizer failed for {}: {}", genre.name, e);
                    report.failed += 1;
                    continue;
                }
            };

            match self.store.set_artist_genre_category(row.id, category) {
                Ok(Some(category_id)) => {
                    debug!("Mapped {} to {} ({})", genre.name, category, category_id);
                    report.updated += 1;
                }
                Ok(None) => {
                    debug!("artist_genre {} was mapped meanwhile, keeping it", row.id);
                    report.already_mapped += 1;
                }
                Err(e) => {
                    warn!("Failed to set category of artist_genre {}: {:#}", row.id, e);
                    report.failed += 1;
                }
            }
        }

        record_enrichment_updates("genre_categories", report.updated);
        info!(
            "Category mapping complete: {} updated, {} uncategorized, {} already mapped, \
             {} failed",
            report.updated, report.uncategorized, report.already_mapped, report.failed
        );
        Ok(report)
    }
}
