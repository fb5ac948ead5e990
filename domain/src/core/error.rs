//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No participants configured for the discussion")]
    NoParticipants,

    #[error("Duplicate participant id: {0}")]
    DuplicateParticipant(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid termination config: {0}")]
    InvalidTermination(String),

    #[error("Invalid resume snapshot: {0}")]
    InvalidSnapshot(String),
}

impl DomainError {
    /// Check if this error comes from a malformed resume snapshot
    pub fn is_snapshot_error(&self) -> bool {
        matches!(self, DomainError::InvalidSnapshot(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_participant_display() {
        let error = DomainError::DuplicateParticipant("gpt".to_string());
        assert_eq!(error.to_string(), "Duplicate participant id: gpt");
    }

    #[test]
    fn test_is_snapshot_error() {
        assert!(DomainError::InvalidSnapshot("round 0".to_string()).is_snapshot_error());
        assert!(!DomainError::NoParticipants.is_snapshot_error());
    }
}
