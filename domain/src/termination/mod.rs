//! Termination policies
//!
//! After every completed round the orchestrator asks the evaluator whether
//! to stop early. The hard `max_rounds` cap in [`TerminationConfig`] always
//! applies on top of whatever condition is selected.
//!
//! | Condition | Stops early when |
//! |-----------|------------------|
//! | `rounds` | never |
//! | `consensus` | share of last-round messages with an agreement phrase >= threshold |
//! | `keyword` | the just-produced message contains a configured keyword |
//! | `manual` | never (`max_rounds` is the manual cutoff) |

pub mod config;
pub mod evaluator;

pub use config::{TerminationCondition, TerminationConfig};
pub use evaluator::{AGREEMENT_PHRASES, TerminationDecision, evaluate, round_agreement_ratio};
