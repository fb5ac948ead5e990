//! Turn prompt composition
//!
//! A turn prompt is the concatenation of independent fragments, each built
//! by a pure function that returns an empty string when its input is absent.
//! [`FRAGMENTS`] is the single source of truth for their order.

use super::template::PromptTemplate;
use crate::core::string::{single_line, truncate};
use crate::discussion::message::TranscriptEntry;
use crate::discussion::settings::{
    DirectionGuide, DiscussionDepth, DiscussionMode, PreviousTurn, UserProfile,
};
use crate::discussion::vote::VoteTally;
use crate::participant::Participant;
use crate::search::SearchResult;

/// Byte length of message previews in the vote breakdown
pub(crate) const VOTE_PREVIEW_LEN: usize = 100;

/// Everything a turn prompt can draw on.
#[derive(Debug, Clone)]
pub struct TurnPromptContext<'a> {
    pub topic: &'a str,
    pub participant: &'a Participant,
    pub roster: &'a [Participant],
    pub round: usize,
    pub total_rounds: usize,
    pub history: &'a [TranscriptEntry<'a>],
    pub search_results: &'a [SearchResult],
    pub previous_turns: &'a [PreviousTurn],
    pub profile: Option<&'a UserProfile>,
    pub mode: Option<DiscussionMode>,
    pub depth: Option<DiscussionDepth>,
    pub direction: Option<&'a DirectionGuide>,
    pub votes: Option<&'a VoteTally<'a>>,
    pub on_demand_search: bool,
}

type Fragment = fn(&TurnPromptContext<'_>) -> String;

const FRAGMENTS: &[Fragment] = &[
    role_fragment,
    mode_fragment,
    depth_fragment,
    profile_fragment,
    previous_turns_fragment,
    topic_fragment,
    search_fragment,
    roster_fragment,
    history_fragment,
    votes_fragment,
    direction_fragment,
    task_fragment,
    on_demand_search_fragment,
];

/// Build the prompt for one participant's turn.
pub fn compose_turn_prompt(ctx: &TurnPromptContext<'_>) -> String {
    join_fragments(FRAGMENTS.iter().map(|build| build(ctx)))
}

pub(crate) fn join_fragments(fragments: impl Iterator<Item = String>) -> String {
    fragments
        .filter(|f| !f.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn role_fragment(ctx: &TurnPromptContext<'_>) -> String {
    let name = ctx.participant.name();
    match ctx.participant.resolved_role() {
        Some(role) => format!(
            "You are {}, taking part in a multi-participant discussion as the {}.\n{}",
            name, role.name, role.instruction
        ),
        None => format!(
            "You are {}, taking part in a multi-participant discussion.",
            name
        ),
    }
}

fn mode_fragment(ctx: &TurnPromptContext<'_>) -> String {
    ctx.mode
        .map(|m| format!("## Discussion style\n{}", m.guidance()))
        .unwrap_or_default()
}

fn depth_fragment(ctx: &TurnPromptContext<'_>) -> String {
    ctx.depth
        .map(|d| format!("## Level of detail\n{}", d.guidance()))
        .unwrap_or_default()
}

pub(crate) fn profile_fragment_for(profile: Option<&UserProfile>) -> String {
    let Some(profile) = profile.filter(|p| !p.is_empty()) else {
        return String::new();
    };
    let mut lines = vec!["## About the user".to_string()];
    if let Some(name) = &profile.name {
        lines.push(format!("- Name: {}", name));
    }
    if let Some(level) = profile.technical_level {
        lines.push(format!("- {}", level.hint()));
    }
    if !profile.interests.is_empty() {
        lines.push(format!("- Interests: {}", profile.interests.join(", ")));
    }
    if let Some(language) = &profile.language {
        lines.push(format!("- Reply in {}", language));
    }
    lines.join("\n")
}

fn profile_fragment(ctx: &TurnPromptContext<'_>) -> String {
    profile_fragment_for(ctx.profile)
}

pub(crate) fn previous_turns_fragment_for(previous: &[PreviousTurn]) -> String {
    if previous.is_empty() {
        return String::new();
    }
    let mut out = String::from("## Earlier in this conversation");
    for turn in previous {
        out.push_str(&format!(
            "\n- Topic: {}\n  Conclusion: {}",
            turn.topic,
            single_line(&turn.summary)
        ));
    }
    out
}

fn previous_turns_fragment(ctx: &TurnPromptContext<'_>) -> String {
    previous_turns_fragment_for(ctx.previous_turns)
}

fn topic_fragment(ctx: &TurnPromptContext<'_>) -> String {
    format!("## Topic\n{}", ctx.topic)
}

pub(crate) fn search_fragment_for(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return String::new();
    }
    let mut out = String::from("## Web search results");
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!("\n[{}] {} ({})", i + 1, result.title, result.url));
        if let Some(date) = &result.published_date {
            out.push_str(&format!(" - {}", date));
        }
        if !result.content.trim().is_empty() {
            out.push_str(&format!("\n    {}", single_line(&result.content)));
        }
    }
    out.push_str("\nCite results by their number when you rely on them.");
    out
}

fn search_fragment(ctx: &TurnPromptContext<'_>) -> String {
    search_fragment_for(ctx.search_results)
}

fn roster_fragment(ctx: &TurnPromptContext<'_>) -> String {
    let others: Vec<String> = ctx
        .roster
        .iter()
        .filter(|p| p.id != ctx.participant.id)
        .map(|p| match p.role_name() {
            Some(role) => format!("- {} ({})", p.name(), role),
            None => format!("- {}", p.name()),
        })
        .collect();
    if others.is_empty() {
        return String::new();
    }
    format!("## Other participants\n{}", others.join("\n"))
}

pub(crate) fn format_entry(entry: &TranscriptEntry<'_>) -> String {
    match entry.role {
        Some(role) => format!(
            "[Round {}] {} ({}):\n{}",
            entry.round, entry.speaker, role, entry.content
        ),
        None => format!("[Round {}] {}:\n{}", entry.round, entry.speaker, entry.content),
    }
}

fn history_fragment(ctx: &TurnPromptContext<'_>) -> String {
    if ctx.history.is_empty() {
        return String::new();
    }
    let body = ctx
        .history
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("## Discussion so far\n{}", body)
}

pub(crate) fn votes_fragment_for(votes: Option<&VoteTally<'_>>) -> String {
    let Some(tally) = votes.filter(|t| !t.is_empty()) else {
        return String::new();
    };
    let mut out = String::from("## User feedback on earlier messages");
    for (kind, messages) in tally.groups() {
        for message in messages {
            out.push_str(&format!(
                "\n- The user {} {} (round {}): \"{}\"",
                kind.label(),
                message.speaker(),
                message.round,
                truncate(&single_line(&message.content), VOTE_PREVIEW_LEN)
            ));
        }
    }
    out
}

fn votes_fragment(ctx: &TurnPromptContext<'_>) -> String {
    votes_fragment_for(ctx.votes)
}

fn direction_fragment(ctx: &TurnPromptContext<'_>) -> String {
    let Some(guide) = ctx.direction.filter(|g| !g.is_empty()) else {
        return String::new();
    };
    let mut lines = vec!["## Direction from the user".to_string()];
    if !guide.focus.is_empty() {
        lines.push(format!("- Focus on: {}", guide.focus.join(", ")));
    }
    if !guide.avoid.is_empty() {
        lines.push(format!("- Avoid: {}", guide.avoid.join(", ")));
    }
    if let Some(note) = guide.note.as_deref().filter(|n| !n.trim().is_empty()) {
        lines.push(format!("- Note: {}", note.trim()));
    }
    lines.join("\n")
}

fn task_fragment(ctx: &TurnPromptContext<'_>) -> String {
    if ctx.history.is_empty() {
        PromptTemplate::opening_task().to_string()
    } else {
        PromptTemplate::response_task(ctx.round, ctx.total_rounds)
    }
}

fn on_demand_search_fragment(ctx: &TurnPromptContext<'_>) -> String {
    if ctx.on_demand_search {
        PromptTemplate::on_demand_search()
    } else {
        String::new()
    }
}
