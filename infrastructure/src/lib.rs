//! Infrastructure layer for council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod search;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileDiscussionConfig, FileLoggingConfig,
    FileOutputConfig, FileParticipantConfig, FileProvidersConfig,
    FileSearchConfig,
};
pub use logging::JsonlTranscriptLogger;
pub use providers::{
    ProviderAdapter,
    anthropic::AnthropicProvider,
    openai::OpenAiCompatibleProvider,
    routing::RoutingGateway,
};
pub use search::SearxngSearchGateway;
