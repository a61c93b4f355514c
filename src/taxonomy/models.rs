//! Data models for the taxonomy database.

use serde::{Deserialize, Serialize};

/// An artist imported from a Wikipedia category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: i64,
    pub title: String,
    pub location: String,
    /// Wikipedia page the artist was imported from.
    #[serde(rename = "pageid")]
    pub page_id: i64,
    pub spotify_id: Option<String>,
}

/// A row of the flat genre namespace. Raw genres and category genres share it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenreKind {
    /// A genre string as returned by the music-metadata provider.
    Raw,
    /// One of the fixed category labels, referenced as `category_genre_id`.
    Category,
}

/// A genre row tagged with the role it plays in the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreEntry {
    pub id: i64,
    pub name: String,
    pub kind: GenreKind,
}

/// Association "artist has raw genre X, mapped to category genre Y".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistGenre {
    pub id: i64,
    pub artist_id: i64,
    pub genre_id: i64,
    pub category_genre_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddGenreOutcome {
    pub genre_id: i64,
    pub genre_created: bool,
    pub association_created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Wikipedia,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Wikipedia => "wikipedia",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "wikipedia" => Some(PageType::Wikipedia),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: i64,
    pub content: String,
    #[serde(rename = "type")]
    pub page_type: PageType,
    pub artist_id: i64,
}

/// A genre as listed under an artist: its name and the category it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreTag {
    pub name: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistWithGenres {
    pub id: i64,
    pub name: String,
    pub genres: Vec<GenreTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedGenre {
    pub id: i64,
    pub name: String,
    pub category_genre_id: Option<i64>,
    pub category_genre_name: Option<String>,
}

/// An artist listed under a category, with every genre that maps into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryArtist {
    pub id: i64,
    pub title: String,
    pub location: String,
    #[serde(rename = "pageid")]
    pub page_id: i64,
    pub spotify_id: Option<String>,
    pub genres: Vec<CategorizedGenre>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxonomyStats {
    pub artists: usize,
    pub genres: usize,
    pub artist_genres: usize,
    pub pages: usize,
}

/// The closed set of coarse labels raw genres get bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryGenre {
    Rock,
    Metal,
    Electronic,
    HipHopAndRap,
    Instrumental,
    Pop,
    FolkAndSingerSongwriter,
    Punk,
    JazzAndBlues,
    Classical,
    Country,
    RnBAndSoul,
    WorldMusic,
    Experimental,
    ChristianAndGospel,
    Traditional,
}

impl CategoryGenre {
    pub const ALL: [CategoryGenre; 16] = [
        CategoryGenre::Rock,
        CategoryGenre::Metal,
        CategoryGenre::Electronic,
        CategoryGenre::HipHopAndRap,
        CategoryGenre::Instrumental,
        CategoryGenre::Pop,
        CategoryGenre::FolkAndSingerSongwriter,
        CategoryGenre::Punk,
        CategoryGenre::JazzAndBlues,
        CategoryGenre::Classical,
        CategoryGenre::Country,
        CategoryGenre::RnBAndSoul,
        CategoryGenre::WorldMusic,
        CategoryGenre::Experimental,
        CategoryGenre::ChristianAndGospel,
        CategoryGenre::Traditional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryGenre::Rock => "Rock",
            CategoryGenre::Metal => "Metal",
            CategoryGenre::Electronic => "Electronic",
            CategoryGenre::HipHopAndRap => "Hip Hop and Rap",
            CategoryGenre::Instrumental => "Instrumental",
            CategoryGenre::Pop => "Pop",
            CategoryGenre::FolkAndSingerSongwriter => "Folk and Singer-Songwriter",
            CategoryGenre::Punk => "Punk",
            CategoryGenre::JazzAndBlues => "Jazz and Blues",
            CategoryGenre::Classical => "Classical",
            CategoryGenre::Country => "Country",
            CategoryGenre::RnBAndSoul => "R&B and Soul",
            CategoryGenre::WorldMusic => "World Music",
            CategoryGenre::Experimental => "Experimental",
            CategoryGenre::ChristianAndGospel => "Christian and Gospel",
            CategoryGenre::Traditional => "Traditional",
        }
    }

    /// Exact, case-sensitive match against the label set.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl std::fmt::Display for CategoryGenre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
