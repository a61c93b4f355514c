//! Ollama-backed categorizer using the `/api/generate` endpoint.

use super::prompt::{build_prompt, parse_category};
use super::{CategorizerError, GenreCategorizer};
use crate::server::metrics::record_upstream_error;
use crate::taxonomy::CategoryGenre;
use crate::upstream::USER_AGENT;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";

const SERVICE: &str = "ollama";
/// Default per-request timeout. Generation runs well past the 30 s other
/// upstreams get.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaCategorizer {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaCategorizer {
    /// # Arguments
    /// * `base_url` - Base URL of the Ollama server (e.g., "http://localhost:11434").
    /// * `model` - Model to use (e.g., "llama3.1").
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, CategorizerError> {
        Self::with_timeout(base_url, model, GENERATE_TIMEOUT)
    }

    /// Same as [`OllamaCategorizer::new`] with a custom per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CategorizerError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| CategorizerError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: String) -> Result<String, CategorizerError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                record_upstream_error(SERVICE);
                if e.is_timeout() {
                    CategorizerError::Timeout
                } else {
                    CategorizerError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            record_upstream_error(SERVICE);
            let body = response.text().await.unwrap_or_default();
            return Err(CategorizerError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            CategorizerError::InvalidResponse(format!("Failed to parse Ollama response: {}", e))
        })?;
        Ok(body.response)
    }
}

#[async_trait]
impl GenreCategorizer for OllamaCategorizer {
    async fn categorize(
        &self,
        genre_name: &str,
    ) -> Result<Option<CategoryGenre>, CategorizerError> {
        debug!(model = %self.model, genre = genre_name, "Requesting genre category");

        let output = self.generate(build_prompt(genre_name)).await?;
        let category = parse_category(&output);

        debug!(
            genre = genre_name,
            output = output.trim(),
            category = ?category,
            "Received genre category"
        );
        Ok(category)
    }
}
