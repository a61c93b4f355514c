use serde::{Deserialize, Serialize};

/// An entry of a Wikipedia category listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMember {
    #[serde(rename = "pageid")]
    pub page_id: i64,
    pub title: String,
}

/// Plain-text extract of a single Wikipedia page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikipediaPage {
    pub page_id: i64,
    pub title: String,
    pub content: String,
}
