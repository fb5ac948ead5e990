//! Transcript logging: the JSONL implementation of
//! [`TranscriptLogger`](council_application::TranscriptLogger).

mod jsonl_logger;

pub use jsonl_logger::JsonlTranscriptLogger;
