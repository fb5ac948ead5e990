//! Input and error types for the discussion use case.

use council_domain::{
    DirectionGuide, DiscussionDepth, DiscussionMode, DomainError, ParticipantRoster,
    PreviousTurn, ResumeSnapshot, SearchConfig, SearchResult, SnapshotRecorder,
    TerminationConfig, Topic, UserProfile, UserVote,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that reject a run before any event is produced.
#[derive(Error, Debug)]
pub enum RunDiscussionError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    #[error("Round count must be at least 1")]
    ZeroRounds,
}

/// Everything one discussion run needs.
///
/// Serializable so callers can hand the engine a JSON request document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionRequest {
    pub topic: Topic,
    pub participants: ParticipantRoster,
    /// Requested round budget, capped by `termination.max_rounds`
    pub rounds: usize,
    #[serde(default)]
    pub previous_turns: Vec<PreviousTurn>,
    /// Results gathered before the run (e.g. by an earlier turn)
    #[serde(default)]
    pub search_results: Vec<SearchResult>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub mode: Option<DiscussionMode>,
    #[serde(default)]
    pub depth: Option<DiscussionDepth>,
    #[serde(default)]
    pub direction: Option<DirectionGuide>,
    #[serde(default)]
    pub termination: TerminationConfig,
    #[serde(default)]
    pub resume: Option<ResumeSnapshot>,
    #[serde(default)]
    pub votes: Vec<UserVote>,
    /// Stop after the rounds with `ready_for_summary` instead of summarizing
    #[serde(default)]
    pub skip_summary: bool,
    /// Emit `message_chunk` events for backends that stream
    #[serde(default)]
    pub stream_chunks: bool,
}

impl DiscussionRequest {
    pub fn new(topic: Topic, participants: ParticipantRoster, rounds: usize) -> Self {
        Self {
            topic,
            participants,
            rounds,
            previous_turns: Vec::new(),
            search_results: Vec::new(),
            search: SearchConfig::default(),
            profile: None,
            mode: None,
            depth: None,
            direction: None,
            termination: TerminationConfig::default(),
            resume: None,
            votes: Vec::new(),
            skip_summary: false,
            stream_chunks: false,
        }
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_search_results(mut self, results: Vec<SearchResult>) -> Self {
        self.search_results = results;
        self
    }

    pub fn with_previous_turns(mut self, turns: Vec<PreviousTurn>) -> Self {
        self.previous_turns = turns;
        self
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_mode(mut self, mode: DiscussionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_depth(mut self, depth: DiscussionDepth) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_direction(mut self, direction: DirectionGuide) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_termination(mut self, termination: TerminationConfig) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_resume(mut self, snapshot: ResumeSnapshot) -> Self {
        self.resume = Some(snapshot);
        self
    }

    pub fn with_votes(mut self, votes: Vec<UserVote>) -> Self {
        self.votes = votes;
        self
    }

    pub fn skip_summary(mut self) -> Self {
        self.skip_summary = true;
        self
    }

    pub fn stream_chunks(mut self) -> Self {
        self.stream_chunks = true;
        self
    }

    /// This request continuing where `recorder` stopped.
    ///
    /// A resumed run skips the initial search, so results gathered before
    /// the interruption are carried over as the request's search results.
    pub fn resumed(&self, recorder: &SnapshotRecorder) -> Self {
        let mut resumed = self.clone();
        if let Some(results) = recorder.search_results() {
            resumed.search_results = results.to_vec();
        }
        resumed.resume = Some(recorder.snapshot());
        resumed
    }

    /// The round budget before capping: the snapshot's when resuming.
    pub fn requested_rounds(&self) -> usize {
        self.resume
            .as_ref()
            .map_or(self.rounds, |snapshot| snapshot.total_rounds)
    }

    /// Round budget after applying the termination cap.
    pub fn total_rounds(&self) -> usize {
        self.termination.effective_rounds(self.requested_rounds())
    }

    /// Reject requests that cannot start.
    pub fn validate(&self) -> Result<(), RunDiscussionError> {
        if self.participants.is_empty() {
            return Err(DomainError::NoParticipants.into());
        }
        if self.requested_rounds() == 0 {
            return Err(RunDiscussionError::ZeroRounds);
        }
        self.termination.validate()?;
        if let Some(snapshot) = &self.resume {
            snapshot.validate(self.participants.len())?;
        }
        Ok(())
    }
}
