//! Discussion presenter
//!
//! Pulls events from a discussion stream, renders them in the chosen output
//! format and feeds them to a [`SnapshotRecorder`]. An interrupt future
//! (Ctrl-C in the binary) stops the run between two events; dropping the
//! stream then cancels any in-flight backend call.

use crate::output::console::ConsoleRenderer;
use crate::output::jsonl::JsonlEncoder;
use crate::progress::reporter::ProgressReporter;
use council_domain::{OutputFormat, ProgressEvent, SnapshotRecorder};
use futures::{Stream, StreamExt};
use std::future::Future;
use std::io::{self, Write};
use tracing::debug;

/// How a presented run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresentOutcome {
    /// Stopped by the interrupt future before `complete`
    pub interrupted: bool,
    /// A fatal `error` event was seen
    pub fatal: bool,
    /// Number of events presented
    pub events: usize,
}

pub struct DiscussionPresenter<W: Write> {
    out: W,
    format: OutputFormat,
    renderer: ConsoleRenderer,
    progress: Option<ProgressReporter>,
}

impl<W: Write> DiscussionPresenter<W> {
    pub fn new(out: W, format: OutputFormat, renderer: ConsoleRenderer) -> Self {
        Self {
            out,
            format,
            renderer,
            progress: None,
        }
    }

    /// Show a spinner between events (text output only).
    pub fn with_progress(mut self, reporter: ProgressReporter) -> Self {
        if self.format == OutputFormat::Text {
            self.progress = Some(reporter);
        }
        self
    }

    /// Write raw text (e.g. the banner) in text mode.
    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        if self.format == OutputFormat::Text {
            self.out.write_all(text.as_bytes())?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Drive `stream` to the end or until `interrupt` resolves.
    pub async fn present<S, F>(
        &mut self,
        stream: S,
        recorder: &mut SnapshotRecorder,
        interrupt: F,
    ) -> io::Result<PresentOutcome>
    where
        S: Stream<Item = ProgressEvent> + Unpin,
        F: Future<Output = ()>,
    {
        let mut stream = stream;
        let mut outcome = PresentOutcome::default();
        tokio::pin!(interrupt);

        loop {
            // Pending events drain before the interrupt is honoured
            let event = tokio::select! {
                biased;
                event = stream.next() => event,
                _ = &mut interrupt => {
                    debug!("Discussion interrupted after {} events", outcome.events);
                    outcome.interrupted = true;
                    break;
                }
            };
            let Some(event) = event else {
                break;
            };

            outcome.events += 1;
            outcome.fatal |= event.is_fatal();
            recorder.observe(&event);
            self.emit(&event)?;
        }

        if let Some(progress) = &self.progress {
            progress.clear();
        }
        self.out.flush()?;
        Ok(outcome)
    }

    fn emit(&mut self, event: &ProgressEvent) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                if let Some(progress) = &self.progress {
                    progress.clear();
                }
                let text = self.renderer.render(event);
                self.out.write_all(text.as_bytes())?;
                self.out.flush()?;
                if let Some(progress) = &self.progress {
                    progress.observe(event);
                }
            }
            OutputFormat::Jsonl => {
                let line = JsonlEncoder::encode(event).map_err(io::Error::other)?;
                writeln!(self.out, "{}", line)?;
                self.out.flush()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{
        BackendSelector, Message, Participant, ParticipantRoster, ProviderKind,
    };

    fn roster() -> ParticipantRoster {
        ParticipantRoster::new(vec![
            Participant::new("a", BackendSelector::new(ProviderKind::OpenAi, "gpt-4o")),
            Participant::new("b", BackendSelector::new(ProviderKind::OpenAi, "gpt-4o-mini")),
        ])
        .unwrap()
    }

    fn progress(roster: &ParticipantRoster, index: usize) -> ProgressEvent {
        ProgressEvent::Progress {
            round: 1,
            total_rounds: 1,
            participant_index: index,
            total_participants: roster.len(),
            participant: roster.get(index).unwrap().into(),
        }
    }

    fn message(roster: &ParticipantRoster, index: usize, text: &str) -> ProgressEvent {
        ProgressEvent::Message {
            message: Message::new(1, roster.get(index).unwrap(), text, "prompt"),
        }
    }

    #[tokio::test]
    async fn test_present_jsonl_writes_one_line_per_event() {
        let roster = roster();
        let events = vec![
            progress(&roster, 0),
            message(&roster, 0, "Tabs."),
            ProgressEvent::Complete,
        ];
        let mut presenter =
            DiscussionPresenter::new(Vec::new(), OutputFormat::Jsonl, ConsoleRenderer::new(&roster));
        let mut recorder = SnapshotRecorder::new(roster.len(), 1);

        let outcome = presenter
            .present(
                futures::stream::iter(events),
                &mut recorder,
                futures::future::pending(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.events, 3);
        assert!(!outcome.interrupted);
        assert!(!outcome.fatal);

        let written = String::from_utf8(presenter.out).unwrap();
        let kinds: Vec<String> = written
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["type"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(kinds, vec!["progress", "message", "complete"]);
    }

    #[tokio::test]
    async fn test_present_records_snapshot_until_interrupted() {
        let roster = roster();
        let events = futures::stream::iter(vec![progress(&roster, 0), message(&roster, 0, "Tabs.")])
            .chain(futures::stream::pending());
        let mut presenter =
            DiscussionPresenter::new(Vec::new(), OutputFormat::Text, ConsoleRenderer::new(&roster));
        let mut recorder = SnapshotRecorder::new(roster.len(), 1);

        let interrupt = async {
            tokio::task::yield_now().await;
        };
        let outcome = presenter
            .present(Box::pin(events), &mut recorder, interrupt)
            .await
            .unwrap();

        assert!(outcome.interrupted);
        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.participant_index, 1);
    }

    #[tokio::test]
    async fn test_present_flags_fatal_error() {
        let roster = roster();
        let events = vec![
            ProgressEvent::fatal("No participant produced a message"),
            ProgressEvent::Complete,
        ];
        let mut presenter =
            DiscussionPresenter::new(Vec::new(), OutputFormat::Text, ConsoleRenderer::new(&roster));
        let mut recorder = SnapshotRecorder::new(roster.len(), 1);

        let outcome = presenter
            .present(
                futures::stream::iter(events),
                &mut recorder,
                futures::future::pending(),
            )
            .await
            .unwrap();

        assert!(outcome.fatal);
        let written = String::from_utf8(presenter.out).unwrap();
        assert!(written.contains("No participant produced a message"));
    }
}
