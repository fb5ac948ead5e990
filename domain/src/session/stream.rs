//! Incremental model output.
//!
//! Adapters decode provider streams (e.g. SSE from an OpenAI-compatible
//! endpoint) into [`StreamEvent`]s. The orchestrator turns each delta into a
//! `message_chunk` progress event and the terminal event into the message.

/// One step of a streaming completion.
///
/// A well-formed stream is zero or more `Delta`s followed by exactly one
/// `Completed` or `Error`. A stream that simply ends is treated as completed
/// with the deltas received so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Newly generated text
    Delta(String),
    /// Full response text
    Completed(String),
    /// Backend failure mid-stream
    Error(String),
}
