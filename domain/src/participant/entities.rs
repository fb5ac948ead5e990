//! Participant entities

use super::role::{ParticipantRole, ResolvedRole};
use crate::core::backend::BackendSelector;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a participant is presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayAttributes {
    pub name: String,
    /// Free-form color token (e.g. `"cyan"` or `"#4f8cff"`), interpreted by the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One configured `(backend, model, role)` contributing turns to a discussion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub backend: BackendSelector,
    pub display: DisplayAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ParticipantRole>,
}

impl Participant {
    pub fn new(id: impl Into<String>, backend: BackendSelector) -> Self {
        let id = id.into();
        Self {
            display: DisplayAttributes {
                name: id.clone(),
                color: None,
            },
            id,
            backend,
            role: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display.name = name.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.display.color = Some(color.into());
        self
    }

    pub fn with_role(mut self, role: ParticipantRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn name(&self) -> &str {
        &self.display.name
    }

    /// The role, if it resolves to non-empty instruction text.
    pub fn resolved_role(&self) -> Option<ResolvedRole<'_>> {
        self.role.as_ref().and_then(|r| r.resolve())
    }

    pub fn role_name(&self) -> Option<&str> {
        self.resolved_role().map(|r| r.name)
    }
}

/// Ordered, validated participant list for one discussion.
///
/// Roster order is the turn order within every round and the cascade
/// order for summarization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Participant>", into = "Vec<Participant>")]
pub struct ParticipantRoster {
    participants: Vec<Participant>,
}

impl ParticipantRoster {
    pub fn new(participants: Vec<Participant>) -> Result<Self, DomainError> {
        if participants.is_empty() {
            return Err(DomainError::NoParticipants);
        }
        let mut seen = HashSet::new();
        for p in &participants {
            if !seen.insert(p.id.as_str()) {
                return Err(DomainError::DuplicateParticipant(p.id.clone()));
            }
        }
        Ok(Self { participants })
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Participant> {
        self.participants.iter()
    }

    pub fn as_slice(&self) -> &[Participant] {
        &self.participants
    }
}

impl TryFrom<Vec<Participant>> for ParticipantRoster {
    type Error = DomainError;

    fn try_from(participants: Vec<Participant>) -> Result<Self, Self::Error> {
        ParticipantRoster::new(participants)
    }
}

impl From<ParticipantRoster> for Vec<Participant> {
    fn from(roster: ParticipantRoster) -> Self {
        roster.participants
    }
}

impl<'a> IntoIterator for &'a ParticipantRoster {
    type Item = &'a Participant;
    type IntoIter = std::slice::Iter<'a, Participant>;

    fn into_iter(self) -> Self::IntoIter {
        self.participants.iter()
    }
}
