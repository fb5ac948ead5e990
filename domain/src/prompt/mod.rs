//! Prompt domain
//!
//! Prompt assembly for discussion turns, the final summary and follow-up
//! question generation. Everything here is pure string building.

pub mod composer;
pub mod followup;
pub mod summary;
mod template;

pub use composer::{TurnPromptContext, compose_turn_prompt};
pub use followup::{
    FollowUpCategory, FollowUpQuestion, compose_followup_prompt, parse_followup_questions,
};
pub use summary::{SummaryPromptContext, compose_summary_prompt};
pub use template::PromptTemplate;
