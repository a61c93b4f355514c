use super::models::WikipediaPage;
use super::WikipediaApi;
use crate::upstream::FetchError;
use futures::future::join_all;
use tracing::{debug, warn};

pub const DEFAULT_PAGE_BATCH_SIZE: usize = 10;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchFetchReport {
    pub batches: usize,
    pub fetched: usize,
    pub missing: usize,
    pub failed: usize,
}

/// Fetches `page_ids` in concurrent groups of `batch_size`, one group at a
/// time. Pages that are missing or fail are logged and skipped, as are
/// pages rejected by `on_page`.
pub async fn fetch_pages_in_batches<F>(
    api: &dyn WikipediaApi,
    page_ids: &[i64],
    batch_size: usize,
    mut on_page: F,
) -> BatchFetchReport
where
    F: FnMut(WikipediaPage) -> anyhow::Result<()>,
{
    let mut report = BatchFetchReport::default();

    for chunk in page_ids.chunks(batch_size.max(1)) {
        report.batches += 1;
        debug!(batch = report.batches, size = chunk.len(), "Fetching page batch");

        let results = join_all(chunk.iter().map(|id| api.fetch_page(*id))).await;
        for (page_id, result) in chunk.iter().zip(results) {
            match result {
                Ok(page) => match on_page(page) {
                    Ok(()) => report.fetched += 1,
                    Err(e) => {
                        warn!(page_id, error = %e, "Failed to handle fetched page");
                        report.failed += 1;
                    }
                },
                Err(FetchError::NotFound(_)) => {
                    debug!(page_id, "Page has no content, skipping");
                    report.missing += 1;
                }
                Err(e) => {
                    warn!(page_id, error = %e, "Failed to fetch page");
                    report.failed += 1;
                }
            }
        }
    }

    report
}
