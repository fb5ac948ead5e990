//! Provider routing
//!
//! [`RoutingGateway`] implements the [`LlmGateway`] port by dispatching on
//! the provider named in each [`BackendSelector`]. Participants on
//! different providers can share one discussion.

use super::anthropic::{AnthropicEndpoint, AnthropicProvider};
use super::openai::{OpenAiCompatibleProvider, OpenAiEndpoint};
use super::ProviderAdapter;
use crate::config::FileProvidersConfig;
use async_trait::async_trait;
use council_application::{GatewayError, LlmGateway, LlmSession};
use council_domain::{BackendSelector, ProviderKind};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct RoutingGateway {
    providers: Vec<Arc<dyn ProviderAdapter>>,
}

impl RoutingGateway {
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { providers }
    }

    /// Build every provider described by the `[providers]` config section.
    ///
    /// OpenAI, Anthropic and Ollama are always registered; an adapter whose
    /// key is missing simply reports itself unavailable.
    pub fn from_config(config: &FileProvidersConfig) -> Result<Self, GatewayError> {
        let mut providers: Vec<Arc<dyn ProviderAdapter>> = Vec::new();

        let openai = &config.openai;
        providers.push(Arc::new(OpenAiCompatibleProvider::new(
            ProviderKind::OpenAi,
            OpenAiEndpoint {
                base_url: openai.base_url.clone(),
                api_key: openai.resolve_api_key(),
                requires_key: true,
                max_tokens: openai.max_tokens,
                temperature: openai.temperature,
                timeout: Duration::from_secs(openai.timeout_secs),
                streaming: openai.streaming,
            },
        )?));

        let anthropic = &config.anthropic;
        providers.push(Arc::new(AnthropicProvider::new(AnthropicEndpoint {
            base_url: anthropic.base_url.clone(),
            api_key: anthropic.resolve_api_key(),
            api_version: anthropic.api_version.clone(),
            max_tokens: anthropic.max_tokens,
            timeout: Duration::from_secs(anthropic.timeout_secs),
            streaming: anthropic.streaming,
        })?));

        let ollama = &config.ollama;
        providers.push(Arc::new(OpenAiCompatibleProvider::new(
            ProviderKind::Ollama,
            OpenAiEndpoint {
                temperature: ollama.temperature,
                timeout: Duration::from_secs(ollama.timeout_secs),
                streaming: ollama.streaming,
                ..OpenAiEndpoint::new(&ollama.base_url)
            },
        )?));

        for (name, custom) in &config.custom {
            providers.push(Arc::new(OpenAiCompatibleProvider::new(
                ProviderKind::Custom(name.clone()),
                OpenAiEndpoint {
                    api_key: custom.resolve_api_key(),
                    max_tokens: custom.max_tokens,
                    temperature: custom.temperature,
                    timeout: Duration::from_secs(custom.timeout_secs),
                    streaming: custom.streaming,
                    ..OpenAiEndpoint::new(&custom.base_url)
                },
            )?));
        }

        Ok(Self::new(providers))
    }

    fn resolve_provider(&self, kind: &ProviderKind) -> Result<&dyn ProviderAdapter, GatewayError> {
        self.providers
            .iter()
            .find(|p| p.kind() == *kind)
            .map(|p| p.as_ref())
            .ok_or_else(|| {
                GatewayError::ModelNotAvailable(format!("no provider configured for '{}'", kind))
            })
    }
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn is_available(&self, backend: &BackendSelector) -> bool {
        match self.resolve_provider(&backend.provider) {
            Ok(provider) => provider.is_available(&backend.model).await,
            Err(e) => {
                debug!("{}", e);
                false
            }
        }
    }

    async fn create_session(
        &self,
        backend: &BackendSelector,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.resolve_provider(&backend.provider)?
            .create_session(backend)
            .await
    }
}
