//! Domain layer for council
//!
//! This crate contains the core entities, value objects and pure policies
//! of a multi-round, multi-participant AI discussion. It has no
//! dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Discussion
//!
//! Several participants, each backed by a model, take turns round-robin on
//! a topic. Every successful turn becomes an immutable [`Message`]. The run
//! is observed solely through an ordered stream of [`ProgressEvent`]s.
//!
//! ## Policies
//!
//! - **Termination**: [`termination::evaluate`] decides after each round
//!   whether to stop early (`rounds` / `consensus` / `keyword` / `manual`)
//! - **Search**: [`search::merge_results`] grows the shared result list;
//!   inline `[[SEARCH: ...]]` markers request searches mid-turn
//! - **Prompts**: [`prompt::compose_turn_prompt`] concatenates optional
//!   fragments in a fixed order

pub mod config;
pub mod core;
pub mod discussion;
pub mod participant;
pub mod prompt;
pub mod search;
pub mod session;
pub mod termination;

// Re-export commonly used types
pub use config::OutputFormat;
pub use self::core::{
    backend::{BackendSelector, ProviderKind},
    error::DomainError,
    topic::Topic,
};
pub use discussion::{
    DirectionGuide, DiscussionDepth, DiscussionMode, ErrorEvent, Message, MessagePresentation,
    ParticipantRef, PreviousTurn, ProgressEvent, ResumeSnapshot, SnapshotRecorder,
    TechnicalLevel, TranscriptEntry, UserProfile, UserVote, VoteKind, VoteTally,
};
pub use participant::{
    CustomRole, DisplayAttributes, Participant, ParticipantRole, ParticipantRoster, RolePreset,
};
pub use prompt::{
    FollowUpCategory, FollowUpQuestion, PromptTemplate, SummaryPromptContext, TurnPromptContext,
    compose_followup_prompt, compose_summary_prompt, compose_turn_prompt,
    parse_followup_questions,
};
pub use search::{
    SearchCategory, SearchConfig, SearchResult, SearchTiming, extract_search_requests,
    merge_results, strip_search_markers,
};
pub use session::stream::StreamEvent;
pub use termination::{TerminationCondition, TerminationConfig, TerminationDecision};
