//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn resolve_key(api_key: &Option<String>, api_key_env: Option<&str>) -> Option<String> {
    api_key
        .clone()
        .or_else(|| api_key_env.and_then(|name| std::env::var(name).ok()))
        .filter(|key| !key.trim().is_empty())
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL including the version prefix.
    pub base_url: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
    pub streaming: bool,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: None,
            temperature: None,
            timeout_secs: 120,
            streaming: true,
        }
    }
}

impl FileOpenAiConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(&self.api_key, Some(&self.api_key_env))
    }
}

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
    /// Max tokens per response (required by the API).
    pub max_tokens: u32,
    /// Anthropic API version header.
    pub api_version: String,
    pub timeout_secs: u64,
    pub streaming: bool,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            api_version: "2023-06-01".to_string(),
            timeout_secs: 120,
            streaming: true,
        }
    }
}

impl FileAnthropicConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(&self.api_key, Some(&self.api_key_env))
    }
}

/// Local Ollama server (OpenAI-compatible endpoint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    pub base_url: String,
    pub temperature: Option<f32>,
    /// Local models can be slow to load
    pub timeout_secs: u64,
    pub streaming: bool,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            temperature: None,
            timeout_secs: 300,
            streaming: true,
        }
    }
}

/// Any other OpenAI-compatible server, addressed as `<name>/<model>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCustomProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default = "default_custom_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub streaming: bool,
}

fn default_custom_timeout() -> u64 {
    120
}

impl FileCustomProviderConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(&self.api_key, self.api_key_env.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub openai: FileOpenAiConfig,
    pub anthropic: FileAnthropicConfig,
    pub ollama: FileOllamaConfig,
    /// Custom providers keyed by the name used in backend selectors.
    pub custom: HashMap<String, FileCustomProviderConfig>,
}
