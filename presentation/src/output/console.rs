//! Console renderer for discussion events

use colored::{Color, ColoredString, Colorize};
use council_domain::{
    ErrorEvent, FollowUpCategory, FollowUpQuestion, Message, ParticipantRoster, ProgressEvent,
    SearchResult, Topic,
};
use std::collections::HashMap;

/// Speaker details looked up by participant id
#[derive(Debug, Clone)]
struct Speaker {
    name: String,
    role: Option<String>,
    color: Option<Color>,
}

/// Turns progress events into terminal text.
///
/// Stateful: it remembers which message is currently being streamed so the
/// final `message` event does not repeat the streamed text.
pub struct ConsoleRenderer {
    speakers: HashMap<String, Speaker>,
    show_followups: bool,
    current_round: usize,
    streaming: Option<String>,
}

impl ConsoleRenderer {
    pub fn new(roster: &ParticipantRoster) -> Self {
        let speakers = roster
            .iter()
            .map(|p| {
                (
                    p.id.clone(),
                    Speaker {
                        name: p.name().to_string(),
                        role: p.role_name().map(str::to_string),
                        color: p.display.color.as_deref().and_then(parse_color),
                    },
                )
            })
            .collect();

        Self {
            speakers,
            show_followups: true,
            current_round: 0,
            streaming: None,
        }
    }

    pub fn with_followups(mut self, show: bool) -> Self {
        self.show_followups = show;
        self
    }

    /// Banner printed before the first event
    pub fn header(&self, topic: &Topic, roster: &ParticipantRoster) -> String {
        let line = "=".repeat(60);
        let mut output = format!("{}\n", line.cyan());
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), topic));
        for participant in roster.iter() {
            let role = participant
                .role_name()
                .map(|r| format!(" ({})", r))
                .unwrap_or_default();
            output.push_str(&format!(
                "  {} {}{} {}\n",
                "*".dimmed(),
                self.speaker_label(&participant.id, participant.name()),
                role,
                format!("[{}]", participant.backend).dimmed()
            ));
        }
        output.push_str(&format!("{}\n", line.cyan()));
        output
    }

    /// Text for one event; empty when the event has nothing to show.
    pub fn render(&mut self, event: &ProgressEvent) -> String {
        let mut output = String::new();

        let continues_stream = match event {
            ProgressEvent::MessageChunk { message_id, .. } => {
                self.streaming.as_deref() == Some(message_id.as_str())
            }
            ProgressEvent::Message { message } => {
                self.streaming.as_deref() == Some(message.id.as_str())
            }
            _ => false,
        };
        if self.streaming.is_some() && !continues_stream {
            // Partial output of a turn that never finished
            self.streaming = None;
            output.push_str("\n\n");
        }

        match event {
            ProgressEvent::Progress {
                round, total_rounds, ..
            } => {
                if *round != self.current_round {
                    self.current_round = *round;
                    output.push_str(&Self::section_header(&format!(
                        "Round {}/{}",
                        round, total_rounds
                    )));
                }
            }
            ProgressEvent::MessageChunk {
                message_id,
                participant_id,
                delta,
                ..
            } => {
                if !continues_stream {
                    self.streaming = Some(message_id.clone());
                    output.push_str(&self.turn_header(participant_id));
                }
                output.push_str(delta);
            }
            ProgressEvent::Message { message } => {
                if continues_stream {
                    self.streaming = None;
                    output.push_str("\n\n");
                } else {
                    output.push_str(&self.format_message(message));
                }
            }
            ProgressEvent::Searching { query } => {
                output.push_str(&format!("{} {}\n", "Searching:".blue().bold(), query));
            }
            ProgressEvent::SearchResults { results, .. } => {
                output.push_str(&Self::format_results(results));
            }
            ProgressEvent::Terminated { round, reason } => {
                output.push_str(&format!(
                    "{} {}\n",
                    format!("Discussion ended after round {}:", round).green().bold(),
                    reason
                ));
            }
            ProgressEvent::Summary {
                participant_id,
                content,
                ..
            } => {
                output.push_str(&Self::section_header("Summary"));
                output.push_str(&format!(
                    "{}\n\n{}\n",
                    format!("Written by {}", self.speaker_name(participant_id)).dimmed(),
                    content
                ));
            }
            ProgressEvent::Followups { questions } => {
                if self.show_followups {
                    output.push_str(&Self::format_followups(questions));
                }
            }
            ProgressEvent::Error(error) => {
                output.push_str(&Self::format_error(error));
            }
            ProgressEvent::ReadyForSummary { messages } => {
                output.push_str(&format!(
                    "\n{}\n",
                    format!("{} messages ready for summary.", messages.len()).dimmed()
                ));
            }
            ProgressEvent::Complete => {
                output.push_str(&format!("\n{}\n", "=".repeat(60).cyan()));
            }
        }

        output
    }

    fn format_message(&self, message: &Message) -> String {
        let mut output = if self.speakers.contains_key(&message.participant_id) {
            self.turn_header(&message.participant_id)
        } else {
            // Resumed message whose speaker left the roster
            format!("{}\n", message.presentation.display_name.as_str().yellow().bold())
        };
        output.push_str(message.content.trim_end());
        output.push_str("\n\n");
        output
    }

    fn turn_header(&self, participant_id: &str) -> String {
        let name = self.speaker_name(participant_id);
        let label = self.speaker_label(participant_id, name);
        match self.speakers.get(participant_id).and_then(|s| s.role.as_deref()) {
            Some(role) => format!("{} {}\n", label, format!("({})", role).dimmed()),
            None => format!("{}\n", label),
        }
    }

    fn speaker_name<'a>(&'a self, participant_id: &'a str) -> &'a str {
        self.speakers
            .get(participant_id)
            .map(|s| s.name.as_str())
            .unwrap_or(participant_id)
    }

    fn speaker_label(&self, participant_id: &str, name: &str) -> ColoredString {
        let color = self
            .speakers
            .get(participant_id)
            .and_then(|s| s.color)
            .unwrap_or(Color::Yellow);
        name.color(color).bold()
    }

    fn format_results(results: &[SearchResult]) -> String {
        let mut output = format!(
            "{}\n",
            format!("{} sources collected", results.len()).blue()
        );
        for (index, result) in results.iter().enumerate() {
            output.push_str(&format!(
                "  [{}] {} {}\n",
                index + 1,
                result.title,
                result.url.dimmed()
            ));
        }
        output
    }

    fn format_followups(questions: &[FollowUpQuestion]) -> String {
        let mut output = format!("\n{}\n", "Follow-up questions:".cyan().bold());
        for question in questions {
            let label = match question.category {
                FollowUpCategory::Clarification => "clarify",
                FollowUpCategory::Expansion => "expand",
                FollowUpCategory::Example => "example",
                FollowUpCategory::Alternative => "alternative",
            };
            output.push_str(&format!(
                "  {} {}\n",
                format!("[{}]", label).dimmed(),
                question.question
            ));
        }
        output
    }

    fn format_error(error: &ErrorEvent) -> String {
        if error.fatal {
            format!("{} {}\n", "Error:".red().bold(), error.message)
        } else {
            format!("{} {}\n", "Warning:".yellow().bold(), error.message)
        }
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }
}

fn parse_color(name: &str) -> Option<Color> {
    name.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{BackendSelector, Participant, ParticipantRole, ProviderKind, RolePreset};

    fn roster() -> ParticipantRoster {
        ParticipantRoster::new(vec![
            Participant::new("a", BackendSelector::new(ProviderKind::OpenAi, "gpt-4o"))
                .with_name("Ada")
                .with_role(ParticipantRole::preset(RolePreset::Critic)),
            Participant::new("b", BackendSelector::new(ProviderKind::Ollama, "llama3.1"))
                .with_name("Bo")
                .with_color("cyan"),
        ])
        .unwrap()
    }

    fn renderer() -> ConsoleRenderer {
        colored::control::set_override(false);
        ConsoleRenderer::new(&roster())
    }

    fn chunk(delta: &str, content: &str) -> ProgressEvent {
        ProgressEvent::MessageChunk {
            message_id: "r1-a".to_string(),
            participant_id: "a".to_string(),
            delta: delta.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_header_lists_roster() {
        let renderer = renderer();
        let topic = Topic::try_new("Tabs or spaces?").unwrap();
        let header = renderer.header(&topic, &roster());

        assert!(header.contains("Tabs or spaces?"));
        assert!(header.contains("Ada (Critic)"));
        assert!(header.contains("[ollama/llama3.1]"));
    }

    #[test]
    fn test_round_header_printed_once_per_round() {
        let mut renderer = renderer();
        let roster = roster();
        let progress = |index: usize| ProgressEvent::Progress {
            round: 1,
            total_rounds: 2,
            participant_index: index,
            total_participants: 2,
            participant: roster.get(index).unwrap().into(),
        };

        assert!(renderer.render(&progress(0)).contains("Round 1/2"));
        assert_eq!(renderer.render(&progress(1)), "");
    }

    #[test]
    fn test_streamed_message_is_not_repeated() {
        let mut renderer = renderer();
        let participant = roster().get(0).unwrap().clone();

        let first = renderer.render(&chunk("Tabs ", "Tabs "));
        assert!(first.starts_with("Ada"));
        assert!(first.ends_with("Tabs "));
        assert_eq!(renderer.render(&chunk("win.", "Tabs win.")), "win.");

        let message = Message::new(1, &participant, "Tabs win.", "prompt");
        assert_eq!(renderer.render(&ProgressEvent::Message { message }), "\n\n");
    }

    #[test]
    fn test_interrupted_stream_is_closed_before_error() {
        let mut renderer = renderer();
        renderer.render(&chunk("Tabs ", "Tabs "));

        let participant = roster().get(0).unwrap().clone();
        let output = renderer.render(&ProgressEvent::error(
            Some(&participant),
            "Ada failed: connection reset",
        ));
        assert!(output.starts_with("\n\n"));
        assert!(output.contains("Warning: Ada failed: connection reset"));
    }

    #[test]
    fn test_unstreamed_message_prints_content() {
        let mut renderer = renderer();
        let participant = roster().get(1).unwrap().clone();
        let message = Message::new(2, &participant, "Spaces.\n", "prompt");

        let output = renderer.render(&ProgressEvent::Message { message });
        assert_eq!(output, "Bo\nSpaces.\n\n");
    }

    #[test]
    fn test_summary_and_fatal_error() {
        let mut renderer = renderer();

        let summary = renderer.render(&ProgressEvent::Summary {
            participant_id: "b".to_string(),
            content: "Use spaces.".to_string(),
            prompt: "p".to_string(),
        });
        assert!(summary.contains("Written by Bo"));
        assert!(summary.contains("Use spaces."));

        let fatal = renderer.render(&ProgressEvent::fatal("No participant produced a message"));
        assert!(fatal.starts_with("Error: No participant"));
    }

    #[test]
    fn test_followups_can_be_hidden() {
        let mut renderer = renderer().with_followups(false);
        let event = ProgressEvent::Followups {
            questions: vec![FollowUpQuestion {
                category: FollowUpCategory::Example,
                question: "What about Go?".to_string(),
            }],
        };
        assert_eq!(renderer.render(&event), "");

        let mut renderer = renderer.with_followups(true);
        assert!(renderer.render(&event).contains("[example] What about Go?"));
    }
}
