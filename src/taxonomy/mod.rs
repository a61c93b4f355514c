mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{
    AddGenreOutcome, Artist, ArtistGenre, ArtistWithGenres, CategorizedGenre, CategoryArtist,
    CategoryGenre, Genre, GenreEntry, GenreKind, GenreTag, Page, PageType, TaxonomyStats,
};
pub use store::SqliteTaxonomyStore;
pub use trait_def::TaxonomyStore;
