//! Follow-up question generation and parsing
//!
//! The model is asked for four lines of the form `CATEGORY: question`. The
//! response is accepted only if every category is present; anything else
//! is treated as a parse failure and the follow-ups are skipped.

use super::template::PromptTemplate;
use crate::discussion::settings::TechnicalLevel;
use crate::core::string::clip;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Summary bytes embedded in the follow-up prompt
const SUMMARY_EXCERPT_LEN: usize = 1500;

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:[-*]|\d+[.)])?\s*\**(clarification|expansion|example|alternative)\**\s*[:：]\s*(.+?)\s*$",
    )
    .expect("valid follow-up line regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpCategory {
    Clarification,
    Expansion,
    Example,
    Alternative,
}

impl FollowUpCategory {
    pub const ALL: [FollowUpCategory; 4] = [
        FollowUpCategory::Clarification,
        FollowUpCategory::Expansion,
        FollowUpCategory::Example,
        FollowUpCategory::Alternative,
    ];

    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "clarification" => Some(FollowUpCategory::Clarification),
            "expansion" => Some(FollowUpCategory::Expansion),
            "example" => Some(FollowUpCategory::Example),
            "alternative" => Some(FollowUpCategory::Alternative),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpQuestion {
    pub category: FollowUpCategory,
    pub question: String,
}

/// Build the follow-up prompt from the topic and the final summary.
pub fn compose_followup_prompt(
    topic: &str,
    summary: &str,
    technical_level: Option<TechnicalLevel>,
) -> String {
    let excerpt = clip(summary, SUMMARY_EXCERPT_LEN);
    let ellipsis = if excerpt.len() < summary.len() { "..." } else { "" };
    let mut prompt = format!(
        "## Topic\n{}\n\n## Answer given to the user\n{}{}",
        topic, excerpt, ellipsis
    );
    if let Some(level) = technical_level {
        prompt.push_str(&format!("\n\n## Audience\n{}", level.hint()));
    }
    prompt.push_str("\n\n");
    prompt.push_str(PromptTemplate::followup_task());
    prompt
}

/// Parse the four-category question list, or `None` if any category is missing.
pub fn parse_followup_questions(response: &str) -> Option<Vec<FollowUpQuestion>> {
    let mut found: [Option<String>; 4] = Default::default();
    for line in response.lines() {
        let Some(caps) = LINE_RE.captures(line) else {
            continue;
        };
        let Some(category) = FollowUpCategory::from_label(&caps[1]) else {
            continue;
        };
        let slot = &mut found[category as usize];
        let question = caps[2].trim().trim_matches('*').trim();
        if slot.is_none() && !question.is_empty() {
            *slot = Some(question.to_string());
        }
    }

    FollowUpCategory::ALL
        .iter()
        .zip(found)
        .map(|(category, question)| {
            question.map(|question| FollowUpQuestion {
                category: *category,
                question,
            })
        })
        .collect()
}
