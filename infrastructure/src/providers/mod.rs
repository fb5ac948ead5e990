//! Model provider adapters
//!
//! Each [`ProviderAdapter`] serves one [`ProviderKind`]; the
//! [`RoutingGateway`](routing::RoutingGateway) picks the adapter named by a
//! participant's backend selector.

pub mod anthropic;
pub mod openai;
pub mod routing;
mod sse;

use async_trait::async_trait;
use council_application::{GatewayError, LlmSession};
use council_domain::core::string::truncate;
use council_domain::{BackendSelector, ProviderKind};

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;
    async fn is_available(&self, model: &str) -> bool;
    async fn create_session(
        &self,
        backend: &BackendSelector,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

pub(crate) fn map_reqwest_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else if error.is_connect() {
        GatewayError::ConnectionError(error.to_string())
    } else {
        GatewayError::RequestFailed(error.to_string())
    }
}

/// Turn a non-2xx response into a `RequestFailed` carrying the body excerpt.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::RequestFailed(format!(
        "HTTP {}: {}",
        status,
        truncate(body.trim(), 300)
    )))
}
