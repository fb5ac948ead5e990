//! Anthropic Messages API provider.

use super::sse::{SseAction, stream_handle};
use super::{ProviderAdapter, check_status, map_reqwest_error};
use async_trait::async_trait;
use council_application::{GatewayError, LlmSession, StreamHandle};
use council_domain::{BackendSelector, ProviderKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AnthropicEndpoint {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_version: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub streaming: bool,
}

impl AnthropicEndpoint {
    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url.trim_end_matches('/'), path)
    }
}

pub struct AnthropicProvider {
    client: reqwest::Client,
    endpoint: Arc<AnthropicEndpoint>,
}

impl AnthropicProvider {
    pub fn new(endpoint: AnthropicEndpoint) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Other(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: Arc::new(endpoint),
        })
    }
}

fn authorized(
    endpoint: &AnthropicEndpoint,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::RequestBuilder, GatewayError> {
    let key = endpoint.api_key.as_deref().ok_or_else(|| {
        GatewayError::ModelNotAvailable("Anthropic API key is not configured".to_string())
    })?;
    Ok(request
        .header("x-api-key", key)
        .header("anthropic-version", &endpoint.api_version))
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn is_available(&self, model: &str) -> bool {
        let Ok(request) = authorized(&self.endpoint, self.client.get(self.endpoint.url("models")))
        else {
            debug!("anthropic has no API key configured");
            return false;
        };
        match request.timeout(Duration::from_secs(10)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("anthropic is unreachable for {}: {}", model, e);
                false
            }
        }
    }

    async fn create_session(
        &self,
        backend: &BackendSelector,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(AnthropicSession {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            backend: backend.clone(),
        }))
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [RequestMessage<'a>; 1],
    stream: bool,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamPayload {
    ContentBlockDelta { delta: BlockDelta },
    MessageStop,
    Error { error: PayloadError },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct BlockDelta {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct PayloadError {
    message: String,
}

pub(crate) fn parse_event(data: &str) -> SseAction {
    match serde_json::from_str::<StreamPayload>(data) {
        Ok(StreamPayload::ContentBlockDelta { delta }) => {
            delta.text.map_or(SseAction::Skip, SseAction::Delta)
        }
        Ok(StreamPayload::MessageStop) => SseAction::Done,
        Ok(StreamPayload::Error { error }) => SseAction::Error(error.message),
        Ok(StreamPayload::Other) | Err(_) => SseAction::Skip,
    }
}

pub struct AnthropicSession {
    client: reqwest::Client,
    endpoint: Arc<AnthropicEndpoint>,
    backend: BackendSelector,
}

impl AnthropicSession {
    fn request(&self, prompt: &str, stream: bool) -> Result<reqwest::RequestBuilder, GatewayError> {
        let body = MessagesRequest {
            model: &self.backend.model,
            max_tokens: self.endpoint.max_tokens,
            messages: [RequestMessage {
                role: "user",
                content: prompt,
            }],
            stream,
        };
        Ok(authorized(&self.endpoint, self.client.post(self.endpoint.url("messages")))?.json(&body))
    }
}

#[async_trait]
impl LlmSession for AnthropicSession {
    fn backend(&self) -> &BackendSelector {
        &self.backend
    }

    async fn send(&self, prompt: &str) -> Result<String, GatewayError> {
        let response = self
            .request(prompt, false)?
            .timeout(self.endpoint.timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("invalid response body: {}", e)))?;

        let text: String = body
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text)
            .collect();
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse(self.backend.to_string()));
        }
        Ok(text)
    }

    fn supports_streaming(&self) -> bool {
        self.endpoint.streaming
    }

    async fn send_streaming(&self, prompt: &str) -> Result<StreamHandle, GatewayError> {
        let response = self
            .request(prompt, true)?
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        Ok(stream_handle(response, parse_event))
    }
}
