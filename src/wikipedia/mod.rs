//! Wikipedia fetchers: category listings and page extracts.

mod batch;
mod client;
mod models;

pub use batch::{fetch_pages_in_batches, BatchFetchReport, DEFAULT_PAGE_BATCH_SIZE};
pub use client::{WikipediaClient, DEFAULT_WIKIPEDIA_API_URL};
pub use models::{CategoryMember, WikipediaPage};

use crate::upstream::FetchError;
use async_trait::async_trait;

#[async_trait]
pub trait WikipediaApi: Send + Sync {
    /// Every page in `category`, following continuation cursors until the
    /// listing is exhausted. Any failed request aborts the whole crawl.
    async fn fetch_category_members(&self, category: &str)
        -> Result<Vec<CategoryMember>, FetchError>;

    /// The plain-text extract of one page. `FetchError::NotFound` when the page
    /// is missing or has no extract.
    async fn fetch_page(&self, page_id: i64) -> Result<WikipediaPage, FetchError>;
}
