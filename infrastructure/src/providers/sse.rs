//! Server-sent events decoding for streaming completions.
//!
//! [`SseDecoder`] splits raw body bytes into `data:` payloads. [`SseEvents`]
//! pulls bytes from the response only when the consumer asks for the next
//! [`StreamEvent`], so an abandoned stream stops reading the socket.

use council_application::StreamHandle;
use council_domain::StreamEvent;
use futures::stream::{Stream, StreamExt};
use std::collections::VecDeque;

/// What a provider-specific parser made of one `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SseAction {
    Delta(String),
    Done,
    Error(String),
    Skip,
}

/// Incremental line splitter for `text/event-stream` bodies.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    /// Feed raw bytes and return every complete `data:` payload.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            if let Some(data) = data_payload(&line) {
                payloads.push(data);
            }
        }
        payloads
    }

    /// Payload of a trailing line that never got its newline.
    pub(crate) fn flush(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.buffer);
        data_payload(&line)
    }
}

fn data_payload(line: &str) -> Option<String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let rest = line.strip_prefix("data:")?;
    let data = rest.strip_prefix(' ').unwrap_or(rest).trim();
    (!data.is_empty()).then(|| data.to_string())
}

/// Pull-driven state of one streaming response.
pub(crate) struct SseEvents<S> {
    bytes: S,
    decoder: SseDecoder,
    parse: fn(&str) -> SseAction,
    queue: VecDeque<StreamEvent>,
    text: String,
    finished: bool,
}

impl<S, B> SseEvents<S>
where
    S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    pub(crate) fn new(bytes: S, parse: fn(&str) -> SseAction) -> Self {
        Self {
            bytes,
            decoder: SseDecoder::default(),
            parse,
            queue: VecDeque::new(),
            text: String::new(),
            finished: false,
        }
    }

    pub(crate) async fn next_event(&mut self) -> Option<StreamEvent> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Some(event);
            }
            if self.finished {
                return None;
            }
            match self.bytes.next().await {
                Some(Ok(chunk)) => {
                    for data in self.decoder.feed(chunk.as_ref()) {
                        self.apply(&data);
                    }
                }
                Some(Err(e)) => {
                    self.queue.push_back(StreamEvent::Error(e.to_string()));
                    self.finished = true;
                }
                None => {
                    if let Some(data) = self.decoder.flush() {
                        self.apply(&data);
                    }
                    if !self.finished {
                        // Body ended without an explicit terminator
                        self.queue
                            .push_back(StreamEvent::Completed(std::mem::take(&mut self.text)));
                        self.finished = true;
                    }
                }
            }
        }
    }

    fn apply(&mut self, data: &str) {
        if self.finished {
            return;
        }
        match (self.parse)(data) {
            SseAction::Delta(delta) if !delta.is_empty() => {
                self.text.push_str(&delta);
                self.queue.push_back(StreamEvent::Delta(delta));
            }
            SseAction::Done => {
                self.queue
                    .push_back(StreamEvent::Completed(std::mem::take(&mut self.text)));
                self.finished = true;
            }
            SseAction::Error(message) => {
                self.queue.push_back(StreamEvent::Error(message));
                self.finished = true;
            }
            SseAction::Delta(_) | SseAction::Skip => {}
        }
    }
}

/// Wrap a streaming HTTP response in a [`StreamHandle`].
pub(crate) fn stream_handle(response: reqwest::Response, parse: fn(&str) -> SseAction) -> StreamHandle {
    let events = SseEvents::new(response.bytes_stream().boxed(), parse);
    let stream = futures::stream::unfold(events, |mut events| async move {
        events.next_event().await.map(|event| (event, events))
    });
    StreamHandle::new(stream.boxed())
}
