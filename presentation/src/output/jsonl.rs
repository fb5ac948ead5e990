//! Line-delimited JSON encoding of progress events
//!
//! One event per line, tagged with its wire `type`, so any consumer can
//! follow a run by reading stdout line by line.

use council_domain::ProgressEvent;

pub struct JsonlEncoder;

impl JsonlEncoder {
    /// Encode one event as a single line (without the trailing newline).
    pub fn encode(event: &ProgressEvent) -> Result<String, serde_json::Error> {
        serde_json::to_string(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{BackendSelector, Message, Participant, ProviderKind};

    #[test]
    fn test_encode_is_single_tagged_line() {
        let participant =
            Participant::new("a", BackendSelector::new(ProviderKind::OpenAi, "gpt-4o"));
        let message = Message::new(1, &participant, "line one\nline two", "prompt");

        let line = JsonlEncoder::encode(&ProgressEvent::Message { message }).unwrap();
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "message");
        assert_eq!(value["message"]["content"], "line one\nline two");
    }

    #[test]
    fn test_encode_error_event() {
        let line = JsonlEncoder::encode(&ProgressEvent::fatal("boom")).unwrap();
        let decoded: ProgressEvent = serde_json::from_str(&line).unwrap();
        assert!(decoded.is_fatal());
    }
}
