//! OpenAI-compatible chat completions provider.
//!
//! Serves OpenAI itself, Ollama's `/v1` endpoint and any custom server that
//! speaks the same protocol. Streaming uses server-sent events terminated by
//! `data: [DONE]`.

use super::sse::{SseAction, stream_handle};
use super::{ProviderAdapter, check_status, map_reqwest_error};
use async_trait::async_trait;
use council_application::{GatewayError, LlmSession, StreamHandle};
use council_domain::{BackendSelector, ProviderKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Connection settings for one OpenAI-compatible server.
#[derive(Debug, Clone)]
pub struct OpenAiEndpoint {
    /// Base URL including the version prefix, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub api_key: Option<String>,
    /// Whether requests without a key are pointless (hosted APIs)
    pub requires_key: bool,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout: Duration,
    pub streaming: bool,
}

impl OpenAiEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            requires_key: false,
            max_tokens: None,
            temperature: None,
            timeout: Duration::from_secs(120),
            streaming: true,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

pub struct OpenAiCompatibleProvider {
    kind: ProviderKind,
    client: reqwest::Client,
    endpoint: Arc<OpenAiEndpoint>,
}

impl OpenAiCompatibleProvider {
    pub fn new(kind: ProviderKind, endpoint: OpenAiEndpoint) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Other(e.to_string()))?;
        Ok(Self {
            kind,
            client,
            endpoint: Arc::new(endpoint),
        })
    }
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

/// Ollama lists `llama3.1:latest` for a request of `llama3.1`.
fn model_listed(models: &[ModelEntry], model: &str) -> bool {
    models.is_empty()
        || models.iter().any(|m| {
            m.id == model
                || m.id
                    .strip_prefix(model)
                    .is_some_and(|tag| tag.starts_with(':'))
        })
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatibleProvider {
    fn kind(&self) -> ProviderKind {
        self.kind.clone()
    }

    async fn is_available(&self, model: &str) -> bool {
        if self.endpoint.requires_key && self.endpoint.api_key.is_none() {
            debug!("{} has no API key configured", self.kind);
            return false;
        }
        let request = self
            .endpoint
            .authorize(self.client.get(self.endpoint.url("models")))
            .timeout(Duration::from_secs(10));
        let response = match request.send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!("{} model list returned {}", self.kind, response.status());
                return false;
            }
            Err(e) => {
                debug!("{} is unreachable: {}", self.kind, e);
                return false;
            }
        };
        match response.json::<ModelList>().await {
            Ok(list) => model_listed(&list.data, model),
            // Reachable but the listing is non-standard
            Err(_) => true,
        }
    }

    async fn create_session(
        &self,
        backend: &BackendSelector,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiSession {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            backend: backend.clone(),
        }))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

pub(crate) fn parse_chunk(data: &str) -> SseAction {
    if data == "[DONE]" {
        return SseAction::Done;
    }
    match serde_json::from_str::<ChatChunk>(data) {
        Ok(ChatChunk {
            error: Some(error), ..
        }) => SseAction::Error(error.message),
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .map_or(SseAction::Skip, SseAction::Delta),
        Err(_) => SseAction::Skip,
    }
}

pub struct OpenAiSession {
    client: reqwest::Client,
    endpoint: Arc<OpenAiEndpoint>,
    backend: BackendSelector,
}

impl OpenAiSession {
    fn request(&self, prompt: &str, stream: bool) -> reqwest::RequestBuilder {
        let body = ChatRequest {
            model: &self.backend.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.endpoint.max_tokens,
            temperature: self.endpoint.temperature,
            stream,
        };
        self.endpoint
            .authorize(self.client.post(self.endpoint.url("chat/completions")))
            .json(&body)
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn backend(&self) -> &BackendSelector {
        &self.backend
    }

    async fn send(&self, prompt: &str) -> Result<String, GatewayError> {
        let response = self
            .request(prompt, false)
            .timeout(self.endpoint.timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("invalid response body: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GatewayError::EmptyResponse(self.backend.to_string()))
    }

    fn supports_streaming(&self) -> bool {
        self.endpoint.streaming
    }

    async fn send_streaming(&self, prompt: &str) -> Result<StreamHandle, GatewayError> {
        let response = self
            .request(prompt, true)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        Ok(stream_handle(response, parse_chunk))
    }
}
