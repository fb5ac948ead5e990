//! Participants of a discussion and the roles they play.

pub mod entities;
pub mod role;

pub use entities::{DisplayAttributes, Participant, ParticipantRoster};
pub use role::{CustomRole, ParticipantRole, RolePreset};
