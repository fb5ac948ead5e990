//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod discussion;
mod logging;
mod output;
mod providers;
mod search;

pub use discussion::{FileDiscussionConfig, FileParticipantConfig};
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use providers::{
    FileAnthropicConfig, FileCustomProviderConfig, FileOllamaConfig, FileOpenAiConfig,
    FileProvidersConfig,
};
pub use search::FileSearchConfig;

use council_domain::ProviderKind;
use serde::{Deserialize, Serialize};

/// A problem found while validating a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending key, e.g. `discussion.termination`
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Participants and per-run defaults
    pub discussion: FileDiscussionConfig,
    /// Model provider endpoints and credentials
    pub providers: FileProvidersConfig,
    /// Search engine settings
    pub search: FileSearchConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic and transcript logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.discussion.rounds == 0 {
            issues.push(ConfigIssue::new(
                "discussion.rounds",
                "must be at least 1",
            ));
        }
        if let Err(e) = self.discussion.termination.validate() {
            issues.push(ConfigIssue::new("discussion.termination", e.to_string()));
        }

        for (index, entry) in self.discussion.participants.iter().enumerate() {
            let field = format!("discussion.participants[{}]", index);
            match entry.to_participant() {
                Ok(participant) => {
                    if let ProviderKind::Custom(name) = &participant.backend.provider
                        && !self.providers.custom.contains_key(name)
                    {
                        issues.push(ConfigIssue::new(
                            field,
                            format!("provider '{}' is not defined under [providers.custom]", name),
                        ));
                    }
                }
                Err(e) => issues.push(ConfigIssue::new(field, e)),
            }
        }
        if !self.discussion.participants.is_empty()
            && let Err(e) = self.discussion.roster()
        {
            issues.push(ConfigIssue::new("discussion.participants", e));
        }

        if self.search.enabled && self.search.searxng_url.is_none() {
            issues.push(ConfigIssue::new(
                "search.searxng_url",
                "search is enabled but no engine URL is set",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{DiscussionMode, TerminationCondition};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[discussion]
rounds = 2
mode = "debate"

[discussion.termination]
condition = "consensus"
consensus_threshold = 0.6

[[discussion.participants]]
id = "optimist"
backend = "openai/gpt-4o"
role = "optimist"

[[discussion.participants]]
id = "local"
backend = "ollama/llama3.1"
name = "Llama"
color = "cyan"

[providers.ollama]
base_url = "http://gpu-box:11434/v1"

[search]
searxng_url = "http://localhost:8888"
enabled = true

[output]
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.discussion.rounds, 2);
        assert_eq!(config.discussion.mode, Some(DiscussionMode::Debate));
        assert_eq!(
            config.discussion.termination.condition,
            TerminationCondition::Consensus
        );
        // Unset keys keep their defaults
        assert_eq!(config.discussion.termination.max_rounds, 10);
        assert_eq!(config.discussion.participants.len(), 2);
        assert_eq!(config.providers.ollama.base_url, "http://gpu-box:11434/v1");
        assert!(config.search.to_search_config().enabled);
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.discussion.rounds, 3);
        assert!(config.discussion.participants.is_empty());
        assert!(config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let toml_str = r#"
[discussion]
rounds = 0

[discussion.termination]
consensus_threshold = 2.0

[[discussion.participants]]
id = "a"
backend = "lab/mixtral"

[search]
enabled = true
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let fields: Vec<_> = config
            .validate()
            .into_iter()
            .map(|issue| issue.field)
            .collect();
        assert_eq!(
            fields,
            vec![
                "discussion.rounds",
                "discussion.termination",
                "discussion.participants[0]",
                "search.searxng_url",
            ]
        );
    }
}
