//! Summary cascade and follow-up generation.
//!
//! Contributors are tried as summarizer in roster order until one returns
//! non-empty text. Follow-ups are asked of the first contributor only and
//! are dropped silently on any failure.

use super::run::{DiscussionRun, Stage};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::search_gateway::SearchGateway;
use council_domain::{
    Participant, ProgressEvent, SummaryPromptContext, VoteTally, compose_followup_prompt,
    compose_summary_prompt, parse_followup_questions,
};
use tracing::{debug, info, warn};

impl<G, S> DiscussionRun<G, S>
where
    G: LlmGateway + ?Sized,
    S: SearchGateway + ?Sized,
{
    /// Roster indices of participants with at least one message.
    pub(super) fn summary_candidates(&self) -> Vec<usize> {
        self.request
            .participants
            .iter()
            .enumerate()
            .filter(|(_, p)| self.messages.iter().any(|m| m.participant_id == p.id))
            .map(|(index, _)| index)
            .collect()
    }

    fn summary_prompt(&self) -> String {
        let tally = VoteTally::from_votes(&self.request.votes, &self.messages);
        compose_summary_prompt(&SummaryPromptContext {
            topic: self.request.topic.content(),
            messages: &self.messages,
            search_results: &self.search_results,
            previous_turns: &self.request.previous_turns,
            profile: self.request.profile.as_ref(),
            votes: (!tally.is_empty()).then_some(&tally),
        })
    }

    pub(super) async fn try_summary(&mut self, candidates: Vec<usize>, next: usize) -> Stage {
        let Some(participant) = candidates
            .get(next)
            .and_then(|&index| self.request.participants.get(index))
            .cloned()
        else {
            warn!("Summary generation failed for every contributing participant");
            self.pending.push_back(ProgressEvent::fatal(
                "Summary generation failed for every contributing participant",
            ));
            return Stage::Finish;
        };

        let prompt = self.summary_prompt();
        match complete_once(self.gateway.as_ref(), &participant, &prompt).await {
            Ok(content) => {
                info!("Summary written by {}", participant.name());
                let asker = candidates[0];
                self.pending.push_back(ProgressEvent::Summary {
                    participant_id: participant.id.clone(),
                    content: content.clone(),
                    prompt,
                });
                Stage::Followups {
                    summary: content,
                    asker,
                }
            }
            Err(e) => {
                warn!("Summary by {} failed: {}", participant.name(), e);
                self.pending.push_back(ProgressEvent::error(
                    Some(&participant),
                    format!("Summary by {} failed: {}", participant.name(), e),
                ));
                Stage::Summary {
                    candidates,
                    next: next + 1,
                }
            }
        }
    }

    pub(super) async fn generate_followups(&mut self, summary: String, asker: usize) -> Stage {
        let Some(participant) = self.request.participants.get(asker).cloned() else {
            return Stage::Finish;
        };
        let level = self
            .request
            .profile
            .as_ref()
            .and_then(|profile| profile.technical_level);
        let prompt = compose_followup_prompt(self.request.topic.content(), &summary, level);

        match complete_once(self.gateway.as_ref(), &participant, &prompt).await {
            Ok(response) => match parse_followup_questions(&response) {
                Some(questions) => {
                    self.pending
                        .push_back(ProgressEvent::Followups { questions });
                }
                None => debug!("Follow-up response did not cover every category, skipping"),
            },
            Err(e) => debug!("Follow-up generation failed, skipping: {}", e),
        }
        Stage::Finish
    }
}

/// One non-streaming call that must return non-empty text.
async fn complete_once<G: LlmGateway + ?Sized>(
    gateway: &G,
    participant: &Participant,
    prompt: &str,
) -> Result<String, GatewayError> {
    let session = gateway.create_session(&participant.backend).await?;
    let text = session.send(prompt).await?;
    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse(participant.backend.to_string()));
    }
    Ok(text)
}
