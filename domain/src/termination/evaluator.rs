//! Termination evaluation (pure)
//!
//! The consensus check is a substring match on fixed agreement phrases. It
//! cannot tell "I agree" from "I don't agree"; that limitation is kept as is.

use super::config::{TerminationCondition, TerminationConfig};
use crate::core::string::contains_ignore_case;
use crate::discussion::message::Message;

/// Phrases that count as agreement for the consensus condition.
pub const AGREEMENT_PHRASES: &[&str] = &[
    "i agree",
    "agreed",
    "we agree",
    "consensus",
    "in agreement",
    "same conclusion",
    "i concur",
    "well said",
    "you're right",
    "good point",
    "exactly right",
];

#[derive(Debug, Clone, PartialEq)]
pub enum TerminationDecision {
    Continue,
    Terminate { reason: String },
}

impl TerminationDecision {
    pub fn should_terminate(&self) -> bool {
        matches!(self, TerminationDecision::Terminate { .. })
    }
}

/// Decide whether to stop after the round that produced `last`.
pub fn evaluate(
    messages: &[Message],
    last: &Message,
    config: &TerminationConfig,
) -> TerminationDecision {
    match config.condition {
        TerminationCondition::Rounds | TerminationCondition::Manual => {
            TerminationDecision::Continue
        }
        TerminationCondition::Consensus => {
            let Some(ratio) = round_agreement_ratio(messages, last.round) else {
                return TerminationDecision::Continue;
            };
            // Ratios are compared at one-decimal precision, so 2 of 3 meets 0.7
            if round_to_tenth(ratio) >= round_to_tenth(config.consensus_threshold) {
                TerminationDecision::Terminate {
                    reason: format!(
                        "Consensus reached in round {} ({:.0}% of participants agree, threshold {:.0}%)",
                        last.round,
                        ratio * 100.0,
                        config.consensus_threshold * 100.0
                    ),
                }
            } else {
                TerminationDecision::Continue
            }
        }
        TerminationCondition::Keyword => config
            .keywords
            .iter()
            .find(|k| contains_ignore_case(&last.content, k.trim()))
            .map(|k| TerminationDecision::Terminate {
                reason: format!(
                    "Termination keyword \"{}\" found in {}'s message",
                    k.trim(),
                    last.speaker()
                ),
            })
            .unwrap_or(TerminationDecision::Continue),
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Share of messages in `round` containing an agreement phrase.
///
/// `None` when the round has fewer than two messages.
pub fn round_agreement_ratio(messages: &[Message], round: usize) -> Option<f64> {
    let in_round: Vec<_> = messages.iter().filter(|m| m.round == round).collect();
    if in_round.len() < 2 {
        return None;
    }
    let agreeing = in_round
        .iter()
        .filter(|m| {
            AGREEMENT_PHRASES
                .iter()
                .any(|phrase| contains_ignore_case(&m.content, phrase))
        })
        .count();
    Some(agreeing as f64 / in_round.len() as f64)
}
