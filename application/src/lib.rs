//! Application layer for council
//!
//! This crate contains the discussion use case and the port definitions
//! its adapters implement. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    llm_gateway::{GatewayError, LlmGateway, LlmSession, StreamHandle},
    search_gateway::{NoSearch, SearchError, SearchGateway},
    transcript_logger::{NoTranscriptLogger, TranscriptLogger},
};
pub use use_cases::run_discussion::{
    DiscussionRequest, DiscussionStream, RunDiscussionError, RunDiscussionUseCase,
};
