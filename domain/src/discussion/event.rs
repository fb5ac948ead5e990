//! Progress events
//!
//! [`ProgressEvent`] is the only observable output of a discussion run.
//! Events are produced in a strict order and never mutated after emission.
//! The serde representation (`{"type": "...", ...}`) is what line-delimited
//! transports write, one event per line.

use super::message::Message;
use crate::participant::Participant;
use crate::prompt::followup::FollowUpQuestion;
use crate::search::SearchResult;
use serde::{Deserialize, Serialize};

/// Lightweight reference to a participant inside an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRef {
    pub id: String,
    pub name: String,
}

impl From<&Participant> for ParticipantRef {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id.clone(),
            name: p.display.name.clone(),
        }
    }
}

/// An error surfaced to the caller.
///
/// Non-fatal errors never stop the run. A fatal error is emitted at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<ParticipantRef>,
    pub fatal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Heartbeat emitted before a participant's turn starts
    Progress {
        round: usize,
        total_rounds: usize,
        participant_index: usize,
        total_participants: usize,
        participant: ParticipantRef,
    },
    Message {
        message: Message,
    },
    MessageChunk {
        message_id: String,
        participant_id: String,
        delta: String,
        /// Cumulative text so far
        content: String,
    },
    Searching {
        query: String,
    },
    SearchResults {
        query: String,
        /// The full accumulated result list after merging
        results: Vec<SearchResult>,
    },
    Terminated {
        round: usize,
        reason: String,
    },
    Summary {
        participant_id: String,
        content: String,
        prompt: String,
    },
    Followups {
        questions: Vec<FollowUpQuestion>,
    },
    Error(ErrorEvent),
    ReadyForSummary {
        messages: Vec<Message>,
    },
    Complete,
}

impl ProgressEvent {
    pub fn error(participant: Option<&Participant>, message: impl Into<String>) -> Self {
        ProgressEvent::Error(ErrorEvent {
            message: message.into(),
            participant: participant.map(ParticipantRef::from),
            fatal: false,
        })
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        ProgressEvent::Error(ErrorEvent {
            message: message.into(),
            participant: None,
            fatal: true,
        })
    }

    /// Event type tag as written on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::Progress { .. } => "progress",
            ProgressEvent::Message { .. } => "message",
            ProgressEvent::MessageChunk { .. } => "message_chunk",
            ProgressEvent::Searching { .. } => "searching",
            ProgressEvent::SearchResults { .. } => "search_results",
            ProgressEvent::Terminated { .. } => "terminated",
            ProgressEvent::Summary { .. } => "summary",
            ProgressEvent::Followups { .. } => "followups",
            ProgressEvent::Error(_) => "error",
            ProgressEvent::ReadyForSummary { .. } => "ready_for_summary",
            ProgressEvent::Complete => "complete",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ProgressEvent::Error(ErrorEvent { fatal: true, .. }))
    }
}
