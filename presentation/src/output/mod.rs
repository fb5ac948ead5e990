//! Event output: human-readable console text or one JSON object per line

pub mod console;
pub mod jsonl;
