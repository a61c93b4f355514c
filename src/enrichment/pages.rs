use super::EnrichmentPipeline;
use crate::server::metrics::record_enrichment_updates;
use crate::taxonomy::PageType;
use crate::wikipedia::{fetch_pages_in_batches, BatchFetchReport};
use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageSyncReport {
    pub requested: usize,
    /// Requested ids with no artist row.
    pub missing_artists: usize,
    pub pages_created: usize,
    pub fetch: BatchFetchReport,
}

impl EnrichmentPipeline {
    /// Fetches the Wikipedia extract of each artist's source page and stores
    /// it as a `wikipedia` page. Pages are fetched in batches of the configured
    /// size. Every call appends new page rows.
    pub async fn sync_artist_pages(&self, artist_ids: &[i64]) -> Result<PageSyncReport> {
        let mut report = PageSyncReport {
            requested: artist_ids.len(),
            ..Default::default()
        };

        // Duplicate imports share a source page, so one fetch can feed several artists.
        let mut artists_by_page: HashMap<i64, Vec<i64>> = HashMap::new();
        let mut page_ids = Vec::new();
        for &artist_id in artist_ids {
            let Some(artist) = self
                .store
                .get_artist(artist_id)
                .with_context(|| format!("Failed to load artist {}", artist_id))?
            else {
                warn!("Artist {} not found, skipping page sync", artist_id);
                report.missing_artists += 1;
                continue;
            };
            let targets = artists_by_page.entry(artist.page_id).or_default();
            if targets.is_empty() {
                page_ids.push(artist.page_id);
            }
            if !targets.contains(&artist.id) {
                targets.push(artist.id);
            }
        }

        let mut pages_created = 0usize;
        report.fetch = fetch_pages_in_batches(
            self.wikipedia.as_ref(),
            &page_ids,
            self.settings.page_batch_size,
            |page| {
                for artist_id in artists_by_page.get(&page.page_id).into_iter().flatten() {
                    self.store
                        .create_page(*artist_id, PageType::Wikipedia, &page.content)?;
                    pages_created += 1;
                }
                Ok(())
            },
        )
        .await;
        report.pages_created = pages_created;

        record_enrichment_updates("page_sync", report.pages_created);
        info!(
            "Page sync complete: {} pages created, {} missing artists, {} missing pages, {} failures",
            report.pages_created, report.missing_artists, report.fetch.missing, report.fetch.failed
        );
        Ok(report)
    }
}
