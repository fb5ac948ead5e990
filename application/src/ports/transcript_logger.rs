//! Port for structured transcript logging.
//!
//! Every [`ProgressEvent`] a discussion emits is also handed to a
//! [`TranscriptLogger`]. This is separate from `tracing`-based operation
//! logs: tracing handles human-readable diagnostics, while this port
//! captures the full event record in a machine-readable format (JSONL).

use council_domain::ProgressEvent;

/// Implementations write each event as a single record (e.g. one JSONL line).
/// `log` is synchronous and non-fallible; logging failures are swallowed.
pub trait TranscriptLogger: Send + Sync {
    fn log(&self, event: &ProgressEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoTranscriptLogger;

impl TranscriptLogger for NoTranscriptLogger {
    fn log(&self, _event: &ProgressEvent) {}
}
