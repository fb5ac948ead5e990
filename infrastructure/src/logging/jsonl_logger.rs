//! JSONL transcript of a discussion run
//!
//! Every [`ProgressEvent`] becomes one line: the event's own JSON (with its
//! `type` tag) plus a `timestamp` in RFC 3339 with milliseconds.

use council_application::TranscriptLogger;
use council_domain::ProgressEvent;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Transcript writer shared between the engine and the caller.
///
/// Lines are flushed as they are written, so an interrupted run still leaves
/// a readable transcript behind.
pub struct JsonlTranscriptLogger {
    out: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTranscriptLogger {
    /// Create (or truncate) `path`, creating missing parent directories.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = File::create(&path)?;
        Ok(Self {
            out: Mutex::new(BufWriter::new(file)),
            path,
        })
    }

    /// Transcript named after the local start time, e.g.
    /// `discussion-20260101-120000.jsonl`.
    pub fn in_dir(dir: impl AsRef<Path>) -> io::Result<Self> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        Self::create(dir.as_ref().join(format!("discussion-{}.jsonl", stamp)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: &ProgressEvent) -> serde_json::Result<String> {
        let mut value = serde_json::to_value(event)?;
        if let Value::Object(fields) = &mut value {
            let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
            fields.insert("timestamp".to_string(), Value::String(now));
        }
        serde_json::to_string(&value)
    }
}

impl TranscriptLogger for JsonlTranscriptLogger {
    fn log(&self, event: &ProgressEvent) {
        let line = match Self::record(event) {
            Ok(line) => line,
            Err(e) => {
                warn!("Skipping {} event in transcript: {}", event.kind(), e);
                return;
            }
        };
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!("Transcript write to {} failed: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{BackendSelector, Message, Participant, ProviderKind};

    fn lines(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_each_event_is_one_timestamped_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");
        let logger = JsonlTranscriptLogger::create(&path).unwrap();
        let participant =
            Participant::new("a", BackendSelector::new(ProviderKind::OpenAi, "gpt-4o"));

        logger.log(&ProgressEvent::Searching {
            query: "rust".to_string(),
        });
        logger.log(&ProgressEvent::Message {
            message: Message::new(1, &participant, "Spaces.", "prompt"),
        });
        logger.log(&ProgressEvent::Complete);

        let records = lines(&path);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r["timestamp"].is_string()));
        assert_eq!(records[0]["type"], "searching");
        assert_eq!(records[0]["query"], "rust");
        assert_eq!(records[1]["type"], "message");
        assert_eq!(records[1]["message"]["id"], "r1-a");
        assert_eq!(records[2]["type"], "complete");
    }

    #[test]
    fn test_in_dir_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("transcripts").join("today");

        let logger = JsonlTranscriptLogger::in_dir(&nested).unwrap();
        assert!(logger.path().starts_with(&nested));
        assert!(logger.path().exists());
    }

    #[test]
    fn test_create_fails_on_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlTranscriptLogger::create(dir.path()).is_err());
    }
}
