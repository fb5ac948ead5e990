//! Discussion state machine.
//!
//! [`DiscussionRun`] owns all state of one run and advances one [`Stage`]
//! per step. Every step either queues events or performs exactly one slow
//! call (availability check, backend call, search, stream pull), so the
//! consumer decides how much work happens: pulling nothing does nothing.

use super::types::DiscussionRequest;
use crate::ports::llm_gateway::{GatewayError, LlmGateway, StreamHandle};
use crate::ports::search_gateway::SearchGateway;
use crate::ports::transcript_logger::TranscriptLogger;
use council_domain::termination::evaluate;
use council_domain::{
    Message, Participant, ProgressEvent, SearchResult, StreamEvent, TerminationDecision,
    TranscriptEntry, TurnPromptContext, VoteTally, compose_turn_prompt, extract_search_requests,
    merge_results, strip_search_markers,
};
use council_domain::discussion::message_id;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub(super) enum Stage {
    Start,
    RoundStart,
    /// Emit `searching` for the next query, then run it
    Search {
        queries: VecDeque<String>,
        then: Box<Stage>,
    },
    RunSearch {
        query: String,
        rest: VecDeque<String>,
        then: Box<Stage>,
    },
    Announce,
    Turn,
    Streaming(Box<StreamingTurn>),
    Deliver(Message),
    RoundEnd,
    AfterRounds,
    /// Try `candidates[next]` as summarizer
    Summary {
        candidates: Vec<usize>,
        next: usize,
    },
    Followups {
        summary: String,
        asker: usize,
    },
    Finish,
    Done,
}

pub(super) struct StreamingTurn {
    participant: Participant,
    prompt: String,
    handle: StreamHandle,
    content: String,
}

pub(super) struct DiscussionRun<G: ?Sized, S: ?Sized> {
    pub(super) gateway: Arc<G>,
    pub(super) search: Arc<S>,
    pub(super) logger: Arc<dyn TranscriptLogger>,
    pub(super) request: DiscussionRequest,
    pub(super) total_rounds: usize,
    pub(super) messages: Vec<Message>,
    pub(super) search_results: Vec<SearchResult>,
    round: usize,
    participant_index: usize,
    is_resume: bool,
    resumed_mid_round: bool,
    initial_search_ran: bool,
    /// Every participant whose turn was attempted, in first-attempt order
    attempted: Vec<Participant>,
    pub(super) pending: VecDeque<ProgressEvent>,
    stage: Stage,
}

impl<G, S> DiscussionRun<G, S>
where
    G: LlmGateway + ?Sized,
    S: SearchGateway + ?Sized,
{
    pub(super) fn new(
        gateway: Arc<G>,
        search: Arc<S>,
        logger: Arc<dyn TranscriptLogger>,
        mut request: DiscussionRequest,
    ) -> Self {
        let total_rounds = request.total_rounds();
        let resume = request.resume.take();
        let is_resume = resume.is_some();
        let (messages, round, participant_index) = match resume {
            Some(snapshot) => (snapshot.messages, snapshot.round, snapshot.participant_index),
            None => (Vec::new(), 1, 0),
        };
        let search_results = std::mem::take(&mut request.search_results);

        Self {
            gateway,
            search,
            logger,
            total_rounds,
            messages,
            search_results,
            round,
            participant_index,
            is_resume,
            resumed_mid_round: participant_index > 0,
            initial_search_ran: false,
            attempted: Vec::new(),
            pending: VecDeque::new(),
            stage: Stage::Start,
            request,
        }
    }

    /// Pull the next event, doing only the work needed to produce it.
    pub(super) async fn next_event(&mut self) -> Option<ProgressEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                self.logger.log(&event);
                return Some(event);
            }
            let stage = std::mem::replace(&mut self.stage, Stage::Done);
            if matches!(stage, Stage::Done) {
                return None;
            }
            self.stage = self.step(stage).await;
        }
    }

    async fn step(&mut self, stage: Stage) -> Stage {
        match stage {
            Stage::Start => self.start(),
            Stage::RoundStart => self.start_round(),
            Stage::Search { mut queries, then } => match queries.pop_front() {
                Some(query) => {
                    self.pending.push_back(ProgressEvent::Searching {
                        query: query.clone(),
                    });
                    Stage::RunSearch {
                        query,
                        rest: queries,
                        then,
                    }
                }
                None => *then,
            },
            Stage::RunSearch { query, rest, then } => {
                self.run_search(query).await;
                Stage::Search {
                    queries: rest,
                    then,
                }
            }
            Stage::Announce => self.announce(),
            Stage::Turn => self.take_turn().await,
            Stage::Streaming(turn) => self.pull_chunk(*turn).await,
            Stage::Deliver(message) => self.deliver(message),
            Stage::RoundEnd => self.end_round(),
            Stage::AfterRounds => self.after_rounds(),
            Stage::Summary { candidates, next } => self.try_summary(candidates, next).await,
            Stage::Followups { summary, asker } => self.generate_followups(summary, asker).await,
            Stage::Finish => {
                info!("Discussion complete with {} messages", self.messages.len());
                self.pending.push_back(ProgressEvent::Complete);
                Stage::Done
            }
            Stage::Done => Stage::Done,
        }
    }

    fn start(&mut self) -> Stage {
        info!(
            "Starting discussion with {} participants over {} rounds",
            self.request.participants.len(),
            self.total_rounds
        );
        if self.is_resume {
            // The initial search belongs to the interrupted run
            debug!(
                "Resuming at round {}, participant {}",
                self.round, self.participant_index
            );
        } else if self.request.search.searches_at_start() {
            self.initial_search_ran = true;
            return self.search_topic_then(Stage::RoundStart);
        }
        Stage::RoundStart
    }

    fn start_round(&mut self) -> Stage {
        if self.round > self.total_rounds {
            return Stage::AfterRounds;
        }
        debug!("Round {}/{}", self.round, self.total_rounds);

        let mid_round = std::mem::take(&mut self.resumed_mid_round);
        // Round 1 already searched the topic when the initial search ran
        let just_searched = self.round == 1 && self.initial_search_ran;
        if self.request.search.searches_each_round() && !mid_round && !just_searched {
            return self.search_topic_then(Stage::Announce);
        }
        Stage::Announce
    }

    fn search_topic_then(&self, then: Stage) -> Stage {
        Stage::Search {
            queries: VecDeque::from([self.request.topic.content().to_string()]),
            then: Box::new(then),
        }
    }

    async fn run_search(&mut self, query: String) {
        match self.search.search(&query, &self.request.search).await {
            Ok(found) => {
                debug!("Search '{}' returned {} results", query, found.len());
                self.search_results = merge_results(&self.search_results, &found);
                self.pending.push_back(ProgressEvent::SearchResults {
                    query,
                    results: self.search_results.clone(),
                });
            }
            Err(e) => {
                warn!("Search '{}' failed: {}", query, e);
                self.pending.push_back(ProgressEvent::error(
                    None,
                    format!("Search failed for \"{}\": {}", query, e),
                ));
            }
        }
    }

    fn current_participant(&self) -> Option<&Participant> {
        self.request.participants.get(self.participant_index)
    }

    fn announce(&mut self) -> Stage {
        let Some(participant) = self.current_participant() else {
            return Stage::RoundEnd;
        };
        let event = ProgressEvent::Progress {
            round: self.round,
            total_rounds: self.total_rounds,
            participant_index: self.participant_index,
            total_participants: self.request.participants.len(),
            participant: participant.into(),
        };
        self.pending.push_back(event);
        Stage::Turn
    }

    async fn take_turn(&mut self) -> Stage {
        let Some(participant) = self.current_participant().cloned() else {
            return Stage::RoundEnd;
        };
        if !self.attempted.iter().any(|p| p.id == participant.id) {
            self.attempted.push(participant.clone());
        }

        if !self.gateway.is_available(&participant.backend).await {
            warn!("{} ({}) is unavailable", participant.name(), participant.backend);
            self.pending.push_back(ProgressEvent::error(
                Some(&participant),
                format!(
                    "{} is unavailable ({})",
                    participant.name(),
                    participant.backend
                ),
            ));
            return self.advance();
        }

        let prompt = self.turn_prompt(&participant);
        let session = match self.gateway.create_session(&participant.backend).await {
            Ok(session) => session,
            Err(e) => return self.turn_failed(&participant, e),
        };

        if self.request.stream_chunks && session.supports_streaming() {
            return match session.send_streaming(&prompt).await {
                Ok(handle) => Stage::Streaming(Box::new(StreamingTurn {
                    participant,
                    prompt,
                    handle,
                    content: String::new(),
                })),
                Err(e) => self.turn_failed(&participant, e),
            };
        }

        match session.send(&prompt).await {
            Ok(text) => self.finish_turn(participant, prompt, text),
            Err(e) => self.turn_failed(&participant, e),
        }
    }

    fn turn_prompt(&self, participant: &Participant) -> String {
        let history: Vec<TranscriptEntry<'_>> = self
            .messages
            .iter()
            .map(Message::to_transcript_entry)
            .collect();
        let tally = VoteTally::from_votes(&self.request.votes, &self.messages);
        let ctx = TurnPromptContext {
            topic: self.request.topic.content(),
            participant,
            roster: self.request.participants.as_slice(),
            round: self.round,
            total_rounds: self.total_rounds,
            history: &history,
            search_results: &self.search_results,
            previous_turns: &self.request.previous_turns,
            profile: self.request.profile.as_ref(),
            mode: self.request.mode,
            depth: self.request.depth,
            direction: self.request.direction.as_ref(),
            votes: (!tally.is_empty()).then_some(&tally),
            on_demand_search: self.request.search.searches_on_demand(),
        };
        compose_turn_prompt(&ctx)
    }

    async fn pull_chunk(&mut self, mut turn: StreamingTurn) -> Stage {
        match turn.handle.next_event().await {
            Some(StreamEvent::Delta(delta)) => {
                if !delta.is_empty() {
                    turn.content.push_str(&delta);
                    self.pending.push_back(ProgressEvent::MessageChunk {
                        message_id: message_id(self.round, &turn.participant.id),
                        participant_id: turn.participant.id.clone(),
                        delta,
                        content: turn.content.clone(),
                    });
                }
                Stage::Streaming(Box::new(turn))
            }
            Some(StreamEvent::Completed(full)) => {
                let text = if turn.content.is_empty() {
                    full
                } else {
                    turn.content
                };
                self.finish_turn(turn.participant, turn.prompt, text)
            }
            Some(StreamEvent::Error(e)) => {
                self.turn_failed(&turn.participant, GatewayError::RequestFailed(e))
            }
            None if turn.content.is_empty() => {
                self.turn_failed(&turn.participant, GatewayError::StreamTruncated)
            }
            None => {
                warn!(
                    "{}'s stream ended before completion; keeping {} bytes",
                    turn.participant.name(),
                    turn.content.len()
                );
                self.finish_turn(turn.participant, turn.prompt, turn.content)
            }
        }
    }

    fn finish_turn(&mut self, participant: Participant, prompt: String, text: String) -> Stage {
        let (content, queries) = if self.request.search.searches_on_demand() {
            (strip_search_markers(&text), extract_search_requests(&text))
        } else {
            (text, Vec::new())
        };
        if content.trim().is_empty() {
            let backend = participant.backend.to_string();
            return self.turn_failed(&participant, GatewayError::EmptyResponse(backend));
        }

        let message = Message::new(self.round, &participant, content, prompt);
        if queries.is_empty() {
            Stage::Deliver(message)
        } else {
            info!("{} requested {} searches", participant.name(), queries.len());
            Stage::Search {
                queries: queries.into(),
                then: Box::new(Stage::Deliver(message)),
            }
        }
    }

    fn turn_failed(&mut self, participant: &Participant, error: GatewayError) -> Stage {
        warn!("{} failed in round {}: {}", participant.name(), self.round, error);
        self.pending.push_back(ProgressEvent::error(
            Some(participant),
            format!("{} failed: {}", participant.name(), error),
        ));
        self.advance()
    }

    fn deliver(&mut self, message: Message) -> Stage {
        self.messages.push(message.clone());
        self.pending.push_back(ProgressEvent::Message { message });
        self.advance()
    }

    fn advance(&mut self) -> Stage {
        self.participant_index += 1;
        if self.participant_index >= self.request.participants.len() {
            Stage::RoundEnd
        } else {
            Stage::Announce
        }
    }

    /// Termination runs only when the round's last participant just spoke.
    fn end_round(&mut self) -> Stage {
        let last_id = self
            .request
            .participants
            .as_slice()
            .last()
            .map(|p| p.id.as_str());
        let closing = self
            .messages
            .last()
            .filter(|m| m.round == self.round && Some(m.participant_id.as_str()) == last_id);

        let decision = closing.map(|last| evaluate(&self.messages, last, &self.request.termination));
        if let Some(TerminationDecision::Terminate { reason }) = decision {
            info!("Terminating after round {}: {}", self.round, reason);
            self.pending.push_back(ProgressEvent::Terminated {
                round: self.round,
                reason,
            });
            return Stage::AfterRounds;
        }

        self.round += 1;
        self.participant_index = 0;
        Stage::RoundStart
    }

    fn after_rounds(&mut self) -> Stage {
        if self.messages.is_empty() {
            let message = if self.attempted.is_empty() {
                "No participant produced a message".to_string()
            } else {
                let names: Vec<&str> = self.attempted.iter().map(Participant::name).collect();
                format!(
                    "No participant produced a message (attempted: {})",
                    names.join(", ")
                )
            };
            warn!("{}", message);
            self.pending.push_back(ProgressEvent::fatal(message));
            return Stage::Done;
        }

        if self.request.skip_summary {
            self.pending.push_back(ProgressEvent::ReadyForSummary {
                messages: self.messages.clone(),
            });
            return Stage::Done;
        }

        let candidates = self.summary_candidates();
        Stage::Summary {
            candidates,
            next: 0,
        }
    }
}
