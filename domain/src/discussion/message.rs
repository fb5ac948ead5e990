//! Discussion messages

use crate::participant::Participant;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Deterministic message id for a `(round, participant)` pair.
///
/// A participant produces at most one message per round, so the pair is a
/// unique key. Being deterministic keeps ids stable across resumed runs.
pub fn message_id(round: usize, participant_id: &str) -> String {
    format!("r{}-{}", round, participant_id)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Presentation data captured when the message was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePresentation {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl MessagePresentation {
    pub fn capture(participant: &Participant) -> Self {
        Self {
            display_name: participant.display.name.clone(),
            role_name: participant.role_name().map(str::to_string),
            color: participant.display.color.clone(),
        }
    }
}

/// One successful turn (Entity, immutable once created)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub round: usize,
    pub participant_id: String,
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
    /// The exact prompt sent to the backend
    pub prompt: String,
    pub presentation: MessagePresentation,
}

impl Message {
    pub fn new(
        round: usize,
        participant: &Participant,
        content: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: message_id(round, &participant.id),
            round,
            participant_id: participant.id.clone(),
            content: content.into(),
            created_at: now_millis(),
            prompt: prompt.into(),
            presentation: MessagePresentation::capture(participant),
        }
    }

    /// Speaker label used in prompts.
    pub fn speaker(&self) -> &str {
        &self.presentation.display_name
    }

    pub fn to_transcript_entry(&self) -> TranscriptEntry<'_> {
        TranscriptEntry {
            round: self.round,
            speaker: &self.presentation.display_name,
            role: self.presentation.role_name.as_deref(),
            content: &self.content,
        }
    }
}

/// `(speaker, content, role)` view of a message for prompt building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptEntry<'a> {
    pub round: usize,
    pub speaker: &'a str,
    pub role: Option<&'a str>,
    pub content: &'a str,
}
