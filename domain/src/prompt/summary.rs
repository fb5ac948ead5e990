//! Summary prompt composition

use super::composer::{
    format_entry, join_fragments, previous_turns_fragment_for, profile_fragment_for,
    search_fragment_for, votes_fragment_for,
};
use super::template::PromptTemplate;
use crate::discussion::message::Message;
use crate::discussion::settings::{PreviousTurn, UserProfile};
use crate::discussion::vote::VoteTally;
use crate::search::SearchResult;

#[derive(Debug, Clone)]
pub struct SummaryPromptContext<'a> {
    pub topic: &'a str,
    pub messages: &'a [Message],
    pub search_results: &'a [SearchResult],
    pub previous_turns: &'a [PreviousTurn],
    pub profile: Option<&'a UserProfile>,
    pub votes: Option<&'a VoteTally<'a>>,
}

/// Build the prompt asking one participant to synthesize the final answer.
pub fn compose_summary_prompt(ctx: &SummaryPromptContext<'_>) -> String {
    let transcript = ctx
        .messages
        .iter()
        .map(|m| format_entry(&m.to_transcript_entry()))
        .collect::<Vec<_>>()
        .join("\n\n");

    join_fragments(
        [
            "You are the moderator of a multi-participant discussion. Synthesize it into one final answer for the user.".to_string(),
            profile_fragment_for(ctx.profile),
            previous_turns_fragment_for(ctx.previous_turns),
            format!("## Topic\n{}", ctx.topic),
            search_fragment_for(ctx.search_results),
            format!("## Full discussion\n{}", transcript),
            votes_fragment_for(ctx.votes),
            PromptTemplate::summary_task().to_string(),
        ]
        .into_iter(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::BackendSelector;
    use crate::discussion::vote::{UserVote, VoteKind};
    use crate::participant::{Participant, ParticipantRole, RolePreset};

    #[test]
    fn test_summary_prompt_contains_role_labels_and_votes() {
        let a = Participant::new("a", "gpt-4.1".parse::<BackendSelector>().unwrap())
            .with_name("Alice")
            .with_role(ParticipantRole::preset(RolePreset::Optimist));
        let b = Participant::new("b", "gpt-4.1".parse::<BackendSelector>().unwrap())
            .with_name("Bob");
        let messages = vec![
            Message::new(1, &a, "Yes, because speed.", ""),
            Message::new(1, &b, "No, because cost.", ""),
        ];
        let votes = vec![UserVote::new("r1-b", VoteKind::Agree)];
        let tally = VoteTally::from_votes(&votes, &messages);

        let prompt = compose_summary_prompt(&SummaryPromptContext {
            topic: "Rewrite?",
            messages: &messages,
            search_results: &[],
            previous_turns: &[],
            profile: None,
            votes: Some(&tally),
        });

        assert!(prompt.contains("[Round 1] Alice (Optimist):\nYes, because speed."));
        assert!(prompt.contains("[Round 1] Bob:\nNo, because cost."));
        assert!(prompt.contains("The user agrees with Bob"));
        assert!(prompt.contains("## Topic\nRewrite?"));
        assert!(!prompt.contains("## Web search results"));
    }
}
