//! Search gateway port
//!
//! Keyword search against an external engine. Merging result lists is a
//! pure domain function ([`council_domain::merge_results`]) and not part
//! of this port.

use async_trait::async_trait;
use council_domain::{SearchConfig, SearchResult};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Search engine returned status {0}")]
    BadStatus(u16),

    #[error("Failed to parse search results: {0}")]
    InvalidResponse(String),

    #[error("Search is not configured")]
    NotConfigured,
}

#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Run `query` and return ranked results, at most `config.max_results`.
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError>;
}

/// Search gateway for runs without a search engine.
pub struct NoSearch;

#[async_trait]
impl SearchGateway for NoSearch {
    async fn search(
        &self,
        _query: &str,
        _config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        Err(SearchError::NotConfigured)
    }
}
