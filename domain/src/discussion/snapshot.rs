//! Resume snapshots
//!
//! A [`ResumeSnapshot`] is everything needed to continue an interrupted
//! discussion: the messages so far plus the `(round, participant_index)`
//! coordinate of the next turn to attempt. The engine never persists it;
//! callers build one with [`SnapshotRecorder`] from the events they observed.

use super::event::ProgressEvent;
use super::message::Message;
use crate::core::error::DomainError;
use crate::search::SearchResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSnapshot {
    pub messages: Vec<Message>,
    /// 1-indexed round to resume at
    pub round: usize,
    /// 0-indexed participant to resume at (only honoured within `round`)
    pub participant_index: usize,
    pub total_rounds: usize,
}

impl ResumeSnapshot {
    /// Check the coordinates against the roster size.
    pub fn validate(&self, participant_count: usize) -> Result<(), DomainError> {
        if self.round == 0 {
            return Err(DomainError::InvalidSnapshot(
                "round is 1-indexed and cannot be 0".to_string(),
            ));
        }
        if self.participant_index >= participant_count {
            return Err(DomainError::InvalidSnapshot(format!(
                "participant index {} out of range for {} participants",
                self.participant_index, participant_count
            )));
        }
        Ok(())
    }

    /// True when the run stopped partway through `round`.
    pub fn is_mid_round(&self) -> bool {
        self.participant_index > 0
    }
}

/// Rebuilds a [`ResumeSnapshot`] from an observed event stream.
///
/// - `progress` records the coordinate of the turn being attempted
/// - `message` appends and moves past that turn
/// - a participant `error` moves past that turn (failed turns are forfeited)
/// - `search_results` replaces the accumulated results
#[derive(Debug, Clone)]
pub struct SnapshotRecorder {
    participant_count: usize,
    total_rounds: usize,
    messages: Vec<Message>,
    search_results: Option<Vec<SearchResult>>,
    round: usize,
    participant_index: usize,
    finished: bool,
}

impl SnapshotRecorder {
    pub fn new(participant_count: usize, total_rounds: usize) -> Self {
        Self {
            participant_count,
            total_rounds,
            messages: Vec::new(),
            search_results: None,
            round: 1,
            participant_index: 0,
            finished: false,
        }
    }

    /// Continue recording on top of a snapshot that is being resumed.
    pub fn from_snapshot(snapshot: &ResumeSnapshot, participant_count: usize) -> Self {
        Self {
            participant_count,
            total_rounds: snapshot.total_rounds,
            messages: snapshot.messages.clone(),
            search_results: None,
            round: snapshot.round,
            participant_index: snapshot.participant_index,
            finished: false,
        }
    }

    pub fn observe(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Progress {
                round,
                participant_index,
                total_rounds,
                ..
            } => {
                self.round = *round;
                self.participant_index = *participant_index;
                self.total_rounds = *total_rounds;
            }
            ProgressEvent::Message { message } => {
                self.messages.push(message.clone());
                self.advance();
            }
            ProgressEvent::SearchResults { results, .. } => {
                self.search_results = Some(results.clone());
            }
            ProgressEvent::Error(err) if err.participant.is_some() && !self.finished => {
                self.advance();
            }
            ProgressEvent::Terminated { .. }
            | ProgressEvent::ReadyForSummary { .. }
            | ProgressEvent::Summary { .. }
            | ProgressEvent::Complete => {
                self.finished = true;
            }
            _ => {}
        }
    }

    /// True once the round loop is over; a snapshot taken then has nothing to resume.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Results accumulated by the run so far; `None` if no search completed.
    ///
    /// Each `search_results` event carries the full merged set, so the
    /// latest one is what later prompts see.
    pub fn search_results(&self) -> Option<&[SearchResult]> {
        self.search_results.as_deref()
    }

    pub fn snapshot(&self) -> ResumeSnapshot {
        ResumeSnapshot {
            messages: self.messages.clone(),
            round: self.round,
            participant_index: self.participant_index,
            total_rounds: self.total_rounds,
        }
    }

    fn advance(&mut self) {
        self.participant_index += 1;
        if self.participant_index >= self.participant_count {
            self.participant_index = 0;
            self.round += 1;
            if self.round > self.total_rounds {
                self.finished = true;
            }
        }
    }
}
