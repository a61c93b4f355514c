//! Maps raw genre names onto the closed set of category labels using a
//! local text-generation service.

mod ollama;
mod prompt;

pub use ollama::{OllamaCategorizer, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
pub use prompt::{build_prompt, parse_category, UNCATEGORIZED};

use crate::taxonomy::CategoryGenre;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CategorizerError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

#[async_trait]
pub trait GenreCategorizer: Send + Sync {
    /// The category for `genre_name`, or `None` when the service answers
    /// with anything outside the label set.
    async fn categorize(&self, genre_name: &str)
        -> Result<Option<CategoryGenre>, CategorizerError>;
}
