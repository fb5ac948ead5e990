//! Discussion domain
//!
//! Messages, user-supplied settings, the event stream contract and the
//! resume snapshot of a multi-round, multi-participant discussion.
//!
//! ```text
//! round 1: [A] -> [B] -> [C] -> termination check
//! round 2: [A] -> [B] -> [C] -> termination check
//! ...
//! summary cascade (A, then B, then C until one succeeds) -> follow-ups -> complete
//! ```

pub mod event;
pub mod message;
pub mod settings;
pub mod snapshot;
pub mod vote;

pub use event::{ErrorEvent, ParticipantRef, ProgressEvent};
pub use message::{Message, MessagePresentation, TranscriptEntry, message_id};
pub use settings::{
    DirectionGuide, DiscussionDepth, DiscussionMode, PreviousTurn, TechnicalLevel, UserProfile,
};
pub use snapshot::{ResumeSnapshot, SnapshotRecorder};
pub use vote::{UserVote, VoteKind, VoteTally};
