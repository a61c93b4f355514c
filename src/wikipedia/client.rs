//! reqwest-backed client for the MediaWiki action API.

use super::models::{CategoryMember, WikipediaPage};
use super::WikipediaApi;
use crate::upstream::{build_http_client, send, FetchError};
use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

const SERVICE: &str = "wikipedia";
const CATEGORY_PAGE_LIMIT: &str = "500";

#[derive(Deserialize)]
struct CategoryMembersResponse {
    query: Option<CategoryMembersQuery>,
    #[serde(rename = "continue")]
    continuation: Option<Continuation>,
}

#[derive(Deserialize)]
struct CategoryMembersQuery {
    #[serde(default)]
    categorymembers: Vec<CategoryMember>,
}

#[derive(Deserialize)]
struct Continuation {
    cmcontinue: Option<String>,
}

#[derive(Deserialize)]
struct ExtractsResponse {
    query: Option<ExtractsQuery>,
}

#[derive(Deserialize)]
struct ExtractsQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Deserialize)]
struct ExtractPage {
    title: Option<String>,
    extract: Option<String>,
    missing: Option<IgnoredAny>,
}

pub struct WikipediaClient {
    client: reqwest::Client,
    api_url: String,
}

impl WikipediaClient {
    /// # Arguments
    /// * `api_url` - Full URL of the `api.php` endpoint.
    pub fn new(api_url: impl Into<String>) -> Result<Self, FetchError> {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: build_http_client()?,
            api_url,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl WikipediaApi for WikipediaClient {
    async fn fetch_category_members(
        &self,
        category: &str,
    ) -> Result<Vec<CategoryMember>, FetchError> {
        let mut members = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params = vec![
                ("action", "query"),
                ("list", "categorymembers"),
                ("cmtitle", category),
                ("cmtype", "page"),
                ("cmlimit", CATEGORY_PAGE_LIMIT),
                ("format", "json"),
                ("origin", "*"),
            ];
            if let Some(cursor) = cursor.as_deref() {
                params.push(("cmcontinue", cursor));
            }

            let response = send(SERVICE, self.client.get(&self.api_url).query(&params)).await?;
            let body: CategoryMembersResponse = response.json().await?;

            let page = body
                .query
                .ok_or_else(|| FetchError::InvalidResponse("missing query field".to_string()))?;
            debug!(
                category,
                count = page.categorymembers.len(),
                "Fetched category members page"
            );
            members.extend(page.categorymembers);

            cursor = body.continuation.and_then(|c| c.cmcontinue);
            if cursor.is_none() {
                break;
            }
        }

        Ok(members)
    }

    async fn fetch_page(&self, page_id: i64) -> Result<WikipediaPage, FetchError> {
        let page_id_param = page_id.to_string();
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("prop", "extracts"),
            ("pageids", page_id_param.as_str()),
            ("explaintext", "1"),
            ("exsectionformat", "plain"),
        ];

        let response = send(SERVICE, self.client.get(&self.api_url).query(&params)).await?;
        let body: ExtractsResponse = response.json().await?;

        let page = body
            .query
            .and_then(|mut q| q.pages.remove(&page_id_param))
            .ok_or_else(|| FetchError::NotFound(format!("page {}", page_id)))?;
        if page.missing.is_some() {
            return Err(FetchError::NotFound(format!("page {}", page_id)));
        }

        match page.extract {
            Some(content) if !content.is_empty() => Ok(WikipediaPage {
                page_id,
                title: page.title.unwrap_or_default(),
                content,
            }),
            _ => Err(FetchError::NotFound(format!(
                "page {} has no extract",
                page_id
            ))),
        }
    }
}
