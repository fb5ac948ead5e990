//! LLM session domain.
//!
//! - [`stream::StreamEvent`]: incremental output of a streaming completion

pub mod stream;
