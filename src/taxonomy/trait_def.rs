//! TaxonomyStore trait definition.

use super::models::{
    AddGenreOutcome, Artist, ArtistGenre, ArtistWithGenres, CategoryArtist, CategoryGenre, Genre,
    GenreEntry, Page, PageType, TaxonomyStats,
};
use anyhow::Result;

/// Storage for artists, the genre taxonomy and fetched page content.
pub trait TaxonomyStore: Send + Sync {
    // =========================================================================
    // Artists
    // =========================================================================

    /// Insert a new artist. No deduplication: importing the same page twice
    /// yields two rows.
    fn create_artist(&self, title: &str, location: &str, page_id: i64) -> Result<Artist>;

    fn get_artist(&self, id: i64) -> Result<Option<Artist>>;

    /// All artists in id order, each with its raw genres and their categories.
    fn list_artists_with_genres(&self) -> Result<Vec<ArtistWithGenres>>;

    /// Up to `limit` artists whose `spotify_id` is still null, in id order.
    fn get_artists_missing_spotify_id(&self, limit: usize) -> Result<Vec<Artist>>;

    fn set_artist_spotify_id(&self, artist_id: i64, spotify_id: &str) -> Result<()>;

    /// A random artist with at least one genre mapped to `category`.
    /// With `require_spotify_id`, artists without a Spotify id are skipped.
    fn get_random_artist_in_category(
        &self,
        category: &str,
        require_spotify_id: bool,
    ) -> Result<Option<Artist>>;

    /// Artists ordered by title, each with the genres mapped to `category`.
    fn get_artists_in_category(&self, category: &str) -> Result<Vec<CategoryArtist>>;

    // =========================================================================
    // Genres
    // =========================================================================

    fn get_genre(&self, id: i64) -> Result<Option<Genre>>;

    /// Exact, case-sensitive lookup. Returns the oldest row if names repeat.
    fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>>;

    fn list_genres(&self) -> Result<Vec<GenreEntry>>;

    /// Find or create the genre named `genre_name`, then associate it with the
    /// artist unless the pair already exists.
    fn add_genre_to_artist(&self, artist_id: i64, genre_name: &str) -> Result<AddGenreOutcome>;

    // =========================================================================
    // Category mapping
    // =========================================================================

    /// Up to `limit` associations without a category, in id order.
    fn get_unmapped_artist_genres(&self, limit: usize) -> Result<Vec<ArtistGenre>>;

    fn get_artist_genre(&self, id: i64) -> Result<Option<ArtistGenre>>;

    /// Find or create the genre row for `category` and point the association
    /// at it. Returns the category genre id, or `None` when the association
    /// already had a category. An existing category is never replaced.
    fn set_artist_genre_category(
        &self,
        artist_genre_id: i64,
        category: CategoryGenre,
    ) -> Result<Option<i64>>;

    /// Genres referenced as a category by at least one association, ordered by
    /// name, one entry per name.
    fn list_category_genres(&self) -> Result<Vec<Genre>>;

    // =========================================================================
    // Pages
    // =========================================================================

    fn create_page(&self, artist_id: i64, page_type: PageType, content: &str) -> Result<Page>;

    fn get_pages_for_artist(&self, artist_id: i64) -> Result<Vec<Page>>;

    // =========================================================================
    // Statistics
    // =========================================================================

    fn get_stats(&self) -> Result<TaxonomyStats>;
}
