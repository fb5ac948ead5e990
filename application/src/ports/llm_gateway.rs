//! LLM Gateway port
//!
//! Defines the interface for communicating with model backends.

use async_trait::async_trait;
use council_domain::{BackendSelector, StreamEvent};
use futures::stream::{BoxStream, StreamExt};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("Stream ended before the response completed")]
    StreamTruncated,

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for LLM communication
///
/// This port defines how the application layer reaches model backends.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Whether the backend behind `backend` can currently take requests.
    async fn is_available(&self, backend: &BackendSelector) -> bool;

    /// Create a single-use completion session for `backend`.
    async fn create_session(
        &self,
        backend: &BackendSelector,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// Handle for pulling streaming events from an LLM session.
///
/// Wraps a boxed stream so chunks are produced only as the consumer pulls
/// them; nothing runs in the background once the handle is dropped.
pub struct StreamHandle {
    inner: BoxStream<'static, StreamEvent>,
}

impl StreamHandle {
    pub fn new(stream: BoxStream<'static, StreamEvent>) -> Self {
        Self { inner: stream }
    }

    /// A handle that yields a single `Completed` event.
    pub fn completed(text: String) -> Self {
        Self::new(futures::stream::iter([StreamEvent::Completed(text)]).boxed())
    }

    /// Pull the next event, or `None` once the stream is exhausted.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.inner.next().await
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.next_event().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e));
                }
            }
        }
        // Ended without Completed: partial text is kept, nothing at all is an error
        if full_text.is_empty() {
            return Err(GatewayError::StreamTruncated);
        }
        Ok(full_text)
    }
}

/// A single-turn completion session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the backend used by this session
    fn backend(&self) -> &BackendSelector;

    /// Send a prompt and get the full response
    async fn send(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Whether [`send_streaming`](Self::send_streaming) yields real incremental output
    fn supports_streaming(&self) -> bool {
        false
    }

    /// Send a prompt and get a streaming response.
    ///
    /// Default implementation calls `send()` and wraps the result in a single
    /// `Completed` event, so non-streaming adapters work without changes.
    async fn send_streaming(&self, prompt: &str) -> Result<StreamHandle, GatewayError> {
        let result = self.send(prompt).await?;
        Ok(StreamHandle::completed(result))
    }
}
