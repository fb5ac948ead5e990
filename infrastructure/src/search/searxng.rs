//! SearXNG search adapter.
//!
//! Queries a self-hosted SearXNG instance through its JSON API:
//! `GET {base}/search?q=...&format=json&categories=...&language=...`.
//! The instance must have the `json` format enabled in its settings.

use async_trait::async_trait;
use council_application::{SearchError, SearchGateway};
use council_domain::{SearchConfig, SearchResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub struct SearxngSearchGateway {
    client: reqwest::Client,
    base_url: String,
}

impl SearxngSearchGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("council/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[derive(Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearxngResult>,
}

#[derive(Deserialize)]
struct SearxngResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default, rename = "publishedDate")]
    published_date: Option<String>,
    #[serde(default)]
    engine: Option<String>,
}

impl From<SearxngResult> for SearchResult {
    fn from(r: SearxngResult) -> Self {
        SearchResult {
            title: r.title,
            url: r.url,
            content: r.content,
            published_date: r.published_date.filter(|d| !d.trim().is_empty()),
            engine: r.engine,
        }
    }
}

#[async_trait]
impl SearchGateway for SearxngSearchGateway {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("categories", config.category.as_str()),
                ("language", config.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SearchError::BadStatus(response.status().as_u16()));
        }

        let body: SearxngResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;
        debug!("SearXNG returned {} results for '{}'", body.results.len(), query);

        Ok(body
            .results
            .into_iter()
            .filter(|r| !r.url.trim().is_empty())
            .take(config.max_results)
            .map(SearchResult::from)
            .collect())
    }
}
