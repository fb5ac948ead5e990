//! Search entities

use serde::{Deserialize, Serialize};

/// A single ranked search hit. Identity key is `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            engine: None,
            published_date: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchCategory {
    #[default]
    General,
    News,
    Science,
    It,
}

impl SearchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchCategory::General => "general",
            SearchCategory::News => "news",
            SearchCategory::Science => "science",
            SearchCategory::It => "it",
        }
    }
}

impl std::str::FromStr for SearchCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" => Ok(SearchCategory::General),
            "news" => Ok(SearchCategory::News),
            "science" => Ok(SearchCategory::Science),
            "it" => Ok(SearchCategory::It),
            other => Err(format!("unknown search category: {}", other)),
        }
    }
}

/// When searches run. The three flags are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchTiming {
    /// Search the topic once before the first round
    pub at_start: bool,
    /// Search the topic at the start of every round
    pub each_round: bool,
    /// Let models request searches with inline markers
    pub on_demand: bool,
}

impl Default for SearchTiming {
    fn default() -> Self {
        Self {
            at_start: true,
            each_round: false,
            on_demand: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub enabled: bool,
    pub max_results: usize,
    pub category: SearchCategory,
    /// Language code passed to the engine (`"auto"` lets it decide)
    pub language: String,
    pub timing: SearchTiming,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_results: 5,
            category: SearchCategory::General,
            language: "auto".to_string(),
            timing: SearchTiming::default(),
        }
    }
}

impl SearchConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    pub fn with_timing(mut self, timing: SearchTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn searches_at_start(&self) -> bool {
        self.enabled && self.timing.at_start
    }

    pub fn searches_each_round(&self) -> bool {
        self.enabled && self.timing.each_round
    }

    pub fn searches_on_demand(&self) -> bool {
        self.enabled && self.timing.on_demand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_never_searches() {
        let config = SearchConfig {
            timing: SearchTiming {
                at_start: true,
                each_round: true,
                on_demand: true,
            },
            ..Default::default()
        };
        assert!(!config.searches_at_start());
        assert!(!config.searches_each_round());
        assert!(!config.searches_on_demand());
    }

    #[test]
    fn test_enabled_defaults() {
        let config = SearchConfig::enabled();
        assert!(config.searches_at_start());
        assert!(!config.searches_each_round());
        assert_eq!(config.max_results, 5);
    }

    #[test]
    fn test_result_deserializes_without_optional_fields() {
        let r: SearchResult =
            serde_json::from_str(r#"{"title":"t","url":"https://x"}"#).unwrap();
        assert_eq!(r.content, "");
        assert!(r.engine.is_none());
    }
}
