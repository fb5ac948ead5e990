//! Backend selector value object
//!
//! A participant is answered by one `(provider, model)` pair. The provider
//! decides which adapter handles the call; the model name is passed through
//! to that adapter untouched.

use serde::{Deserialize, Serialize};

/// Known model providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    /// OpenAI or any OpenAI-compatible chat-completions endpoint
    #[default]
    OpenAi,
    /// Anthropic Messages API
    Anthropic,
    /// Local Ollama server (OpenAI-compatible endpoint)
    Ollama,
    /// Provider registered under a custom name
    Custom(String),
}

impl ProviderKind {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "openai" => ProviderKind::OpenAi,
            "anthropic" => ProviderKind::Anthropic,
            "ollama" => ProviderKind::Ollama,
            _ => ProviderKind::Custom(s.to_string()),
        })
    }
}

impl Serialize for ProviderKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

/// Provider + model name pair (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackendSelector {
    pub provider: ProviderKind,
    pub model: String,
}

impl BackendSelector {
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

impl std::fmt::Display for BackendSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

impl std::str::FromStr for BackendSelector {
    type Err = String;

    /// Parse `provider/model`; a bare model name defaults to the OpenAI provider.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("backend selector cannot be empty".to_string());
        }
        match s.split_once('/') {
            Some((provider, model)) if !model.is_empty() => Ok(Self::new(
                provider.parse().unwrap_or_default(),
                model.to_string(),
            )),
            Some(_) => Err(format!("missing model name in '{}'", s)),
            None => Ok(Self::new(ProviderKind::OpenAi, s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_and_model() {
        let sel: BackendSelector = "anthropic/claude-sonnet-4-5".parse().unwrap();
        assert_eq!(sel.provider, ProviderKind::Anthropic);
        assert_eq!(sel.model, "claude-sonnet-4-5");
        assert_eq!(sel.to_string(), "anthropic/claude-sonnet-4-5");
    }

    #[test]
    fn test_bare_model_defaults_to_openai() {
        let sel: BackendSelector = "gpt-4.1".parse().unwrap();
        assert_eq!(sel.provider, ProviderKind::OpenAi);
    }

    #[test]
    fn test_custom_provider_keeps_name() {
        let sel: BackendSelector = "groq/llama-3.3-70b".parse().unwrap();
        assert_eq!(sel.provider, ProviderKind::Custom("groq".to_string()));
    }

    #[test]
    fn test_missing_model_rejected() {
        assert!("ollama/".parse::<BackendSelector>().is_err());
        assert!("".parse::<BackendSelector>().is_err());
    }
}
