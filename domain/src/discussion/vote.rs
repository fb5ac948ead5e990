//! User votes on individual messages
//!
//! Votes are cast by the user (not by models) between runs, typically while
//! summarization is deferred. They are fed back into prompts as a
//! breakdown of what the user agrees and disagrees with.

use super::message::Message;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Agree,
    Disagree,
    Neutral,
}

impl VoteKind {
    pub fn label(&self) -> &'static str {
        match self {
            VoteKind::Agree => "agrees with",
            VoteKind::Disagree => "disagrees with",
            VoteKind::Neutral => "is neutral about",
        }
    }
}

/// A single user vote on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserVote {
    pub message_id: String,
    pub kind: VoteKind,
}

impl UserVote {
    pub fn new(message_id: impl Into<String>, kind: VoteKind) -> Self {
        Self {
            message_id: message_id.into(),
            kind,
        }
    }
}

/// Votes grouped by kind, each resolved to the message it refers to.
///
/// Votes pointing at unknown message ids are dropped.
#[derive(Debug, Clone, Default)]
pub struct VoteTally<'a> {
    pub agree: Vec<&'a Message>,
    pub disagree: Vec<&'a Message>,
    pub neutral: Vec<&'a Message>,
}

impl<'a> VoteTally<'a> {
    pub fn from_votes(votes: &[UserVote], messages: &'a [Message]) -> Self {
        let mut tally = VoteTally::default();
        for vote in votes {
            let Some(message) = messages.iter().find(|m| m.id == vote.message_id) else {
                continue;
            };
            match vote.kind {
                VoteKind::Agree => tally.agree.push(message),
                VoteKind::Disagree => tally.disagree.push(message),
                VoteKind::Neutral => tally.neutral.push(message),
            }
        }
        tally
    }

    pub fn is_empty(&self) -> bool {
        self.agree.is_empty() && self.disagree.is_empty() && self.neutral.is_empty()
    }

    /// Iterate groups in fixed order: agree, disagree, neutral.
    pub fn groups(&self) -> [(VoteKind, &[&'a Message]); 3] {
        [
            (VoteKind::Agree, self.agree.as_slice()),
            (VoteKind::Disagree, self.disagree.as_slice()),
            (VoteKind::Neutral, self.neutral.as_slice()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::BackendSelector;
    use crate::participant::Participant;

    fn msg(round: usize, id: &str) -> Message {
        let p = Participant::new(id, "gpt-4.1".parse::<BackendSelector>().unwrap());
        Message::new(round, &p, format!("content of {}", id), "")
    }

    #[test]
    fn test_tally_groups_votes() {
        let messages = vec![msg(1, "a"), msg(1, "b"), msg(1, "c")];
        let votes = vec![
            UserVote::new("r1-a", VoteKind::Agree),
            UserVote::new("r1-b", VoteKind::Disagree),
            UserVote::new("r1-c", VoteKind::Agree),
            UserVote::new("r9-missing", VoteKind::Neutral),
        ];
        let tally = VoteTally::from_votes(&votes, &messages);
        assert_eq!(tally.agree.len(), 2);
        assert_eq!(tally.disagree.len(), 1);
        assert!(tally.neutral.is_empty());
    }

    #[test]
    fn test_empty_tally() {
        let tally = VoteTally::from_votes(&[], &[]);
        assert!(tally.is_empty());
    }
}
