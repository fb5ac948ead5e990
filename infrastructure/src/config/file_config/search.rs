//! Search configuration from TOML (`[search]` section)

use council_domain::{SearchCategory, SearchConfig, SearchTiming};
use serde::{Deserialize, Serialize};

/// Raw search configuration: engine location plus per-run defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchConfig {
    /// SearXNG base URL; search stays disabled without one
    pub searxng_url: Option<String>,
    pub enabled: bool,
    pub max_results: usize,
    pub category: SearchCategory,
    pub language: String,
    pub timing: SearchTiming,
    pub timeout_secs: u64,
}

impl Default for FileSearchConfig {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            searxng_url: None,
            enabled: defaults.enabled,
            max_results: defaults.max_results,
            category: defaults.category,
            language: defaults.language,
            timing: defaults.timing,
            timeout_secs: 15,
        }
    }
}

impl FileSearchConfig {
    /// Per-run search settings; enabled only when an engine is configured.
    pub fn to_search_config(&self) -> SearchConfig {
        SearchConfig {
            enabled: self.enabled && self.searxng_url.is_some(),
            max_results: self.max_results,
            category: self.category,
            language: self.language.clone(),
            timing: self.timing,
        }
    }
}
