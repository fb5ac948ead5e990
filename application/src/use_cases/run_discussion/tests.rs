use super::*;
use crate::ports::llm_gateway::{GatewayError, LlmSession, StreamHandle};
use crate::ports::search_gateway::SearchError;
use async_trait::async_trait;
use council_domain::{
    BackendSelector, Message, Participant, ParticipantRoster, ProviderKind, ResumeSnapshot,
    SearchConfig, SearchResult, SearchTiming, SnapshotRecorder, StreamEvent, TerminationConfig,
    Topic,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

// ==================== Test doubles ====================

#[derive(Default)]
struct Script {
    responses: HashMap<String, VecDeque<Result<String, String>>>,
    calls: Vec<(String, String)>,
}

#[derive(Default)]
struct ScriptedGateway {
    script: Arc<Mutex<Script>>,
    unavailable: HashSet<String>,
    streaming: bool,
    truncated: bool,
}

impl ScriptedGateway {
    fn new() -> Self {
        Self::default()
    }

    fn respond(self, model: &str, responses: &[Result<&str, &str>]) -> Self {
        self.script.lock().unwrap().responses.insert(
            model.to_string(),
            responses
                .iter()
                .copied()
                .map(|r| r.map(str::to_string).map_err(str::to_string))
                .collect(),
        );
        self
    }

    fn unavailable(mut self, model: &str) -> Self {
        self.unavailable.insert(model.to_string());
        self
    }

    fn streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    /// Streams end after the deltas, without `Completed`.
    fn truncated(mut self) -> Self {
        self.streaming = true;
        self.truncated = true;
        self
    }

    fn prompts_for(&self, model: &str) -> Vec<String> {
        self.script
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(m, _)| m == model)
            .map(|(_, prompt)| prompt.clone())
            .collect()
    }

    fn calls_for(&self, model: &str) -> usize {
        self.script
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(m, _)| m == model)
            .count()
    }

    fn total_calls(&self) -> usize {
        self.script.lock().unwrap().calls.len()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn is_available(&self, backend: &BackendSelector) -> bool {
        !self.unavailable.contains(&backend.model)
    }

    async fn create_session(
        &self,
        backend: &BackendSelector,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(ScriptedSession {
            backend: backend.clone(),
            script: self.script.clone(),
            streaming: self.streaming,
            truncated: self.truncated,
        }))
    }
}

struct ScriptedSession {
    backend: BackendSelector,
    script: Arc<Mutex<Script>>,
    streaming: bool,
    truncated: bool,
}

#[async_trait]
impl LlmSession for ScriptedSession {
    fn backend(&self) -> &BackendSelector {
        &self.backend
    }

    async fn send(&self, prompt: &str) -> Result<String, GatewayError> {
        let mut script = self.script.lock().unwrap();
        script
            .calls
            .push((self.backend.model.clone(), prompt.to_string()));
        script
            .responses
            .get_mut(&self.backend.model)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err("no scripted response".to_string()))
            .map_err(GatewayError::RequestFailed)
    }

    fn supports_streaming(&self) -> bool {
        self.streaming
    }

    async fn send_streaming(&self, prompt: &str) -> Result<StreamHandle, GatewayError> {
        let text = self.send(prompt).await?;
        let mut events: Vec<StreamEvent> = text
            .split_inclusive(' ')
            .map(|word| StreamEvent::Delta(word.to_string()))
            .collect();
        if !self.truncated {
            events.push(StreamEvent::Completed(text));
        }
        Ok(StreamHandle::new(futures::stream::iter(events).boxed()))
    }
}

struct FixedSearch(Vec<SearchResult>);

#[async_trait]
impl SearchGateway for FixedSearch {
    async fn search(
        &self,
        _query: &str,
        _config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct RecordingLogger(Mutex<Vec<&'static str>>);

impl TranscriptLogger for RecordingLogger {
    fn log(&self, event: &ProgressEvent) {
        self.0.lock().unwrap().push(event.kind());
    }
}

// ==================== Helpers ====================

fn participant(id: &str) -> Participant {
    Participant::new(id, BackendSelector::new(ProviderKind::OpenAi, id))
}

fn request(ids: &[&str], rounds: usize) -> DiscussionRequest {
    let roster = ParticipantRoster::new(ids.iter().map(|id| participant(id)).collect()).unwrap();
    DiscussionRequest::new(Topic::try_new("Tabs or spaces?").unwrap(), roster, rounds)
}

async fn run(
    gateway: ScriptedGateway,
    request: DiscussionRequest,
) -> (Vec<ProgressEvent>, Arc<ScriptedGateway>) {
    let gateway = Arc::new(gateway);
    let use_case = RunDiscussionUseCase::new(gateway.clone());
    let events: Vec<ProgressEvent> = use_case.execute(request).unwrap().collect().await;
    (events, gateway)
}

async fn run_with_search(
    gateway: Arc<ScriptedGateway>,
    request: DiscussionRequest,
) -> Vec<ProgressEvent> {
    let search = Arc::new(FixedSearch(vec![SearchResult::new(
        "Style guide",
        "https://example.com/style",
        "Use spaces",
    )]));
    RunDiscussionUseCase::with_search(gateway, search)
        .execute(request)
        .unwrap()
        .collect()
        .await
}

fn each_round_only() -> SearchConfig {
    SearchConfig::enabled().with_timing(SearchTiming {
        at_start: false,
        each_round: true,
        on_demand: false,
    })
}

fn kinds(events: &[ProgressEvent]) -> Vec<&'static str> {
    events.iter().map(ProgressEvent::kind).collect()
}

fn message_contents(events: &[ProgressEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::Message { message } => Some(message.content.clone()),
            _ => None,
        })
        .collect()
}

const FOLLOWUPS: &str = "CLARIFICATION: What team size?\n\
    EXPANSION: How do editors handle it?\n\
    EXAMPLE: Which projects use tabs?\n\
    ALTERNATIVE: Would a formatter settle it?";

// ==================== Tests ====================

#[tokio::test]
async fn test_full_run_event_order() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("a1"), Ok("a2"), Ok("final answer"), Ok(FOLLOWUPS)])
        .respond("b", &[Ok("b1"), Ok("b2")]);

    let (events, _) = run(gateway, request(&["a", "b"], 2)).await;

    assert_eq!(
        kinds(&events),
        vec![
            "progress", "message", "progress", "message", "progress", "message", "progress",
            "message", "summary", "followups", "complete",
        ]
    );
    assert_eq!(message_contents(&events), vec!["a1", "b1", "a2", "b2"]);
    match &events[8] {
        ProgressEvent::Summary {
            participant_id,
            content,
            prompt,
        } => {
            assert_eq!(participant_id, "a");
            assert_eq!(content, "final answer");
            assert!(prompt.contains("b2"));
        }
        other => panic!("expected summary, got {:?}", other),
    }
}

#[tokio::test]
async fn test_progress_carries_coordinates() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("a1")])
        .respond("b", &[Ok("b1")]);

    let (events, _) = run(gateway, request(&["a", "b"], 1).skip_summary()).await;

    match &events[2] {
        ProgressEvent::Progress {
            round,
            total_rounds,
            participant_index,
            total_participants,
            participant,
        } => {
            assert_eq!(
                (*round, *total_rounds, *participant_index, *total_participants),
                (1, 1, 1, 2)
            );
            assert_eq!(participant.id, "b");
        }
        other => panic!("expected progress, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unavailable_participant_is_skipped() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("a1")])
        .unavailable("b");

    let (events, gateway) = run(gateway, request(&["a", "b"], 1).skip_summary()).await;

    assert_eq!(
        kinds(&events),
        vec!["progress", "message", "progress", "error", "ready_for_summary"]
    );
    match &events[3] {
        ProgressEvent::Error(err) => {
            assert!(!err.fatal);
            assert_eq!(err.participant.as_ref().unwrap().id, "b");
        }
        other => panic!("expected error, got {:?}", other),
    }
    assert_eq!(gateway.calls_for("b"), 0);
}

#[tokio::test]
async fn test_no_messages_emits_single_fatal_and_stops() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Err("down"), Err("down")])
        .respond("b", &[Err("down"), Err("down")]);

    let (events, _) = run(gateway, request(&["a", "b"], 2)).await;

    let fatal: Vec<_> = events.iter().filter(|e| e.is_fatal()).collect();
    assert_eq!(fatal.len(), 1);
    assert!(events.last().unwrap().is_fatal());
    match events.last().unwrap() {
        ProgressEvent::Error(err) => {
            assert!(err.message.contains("a, b"));
        }
        other => panic!("expected error, got {:?}", other),
    }
    assert!(!kinds(&events).contains(&"complete"));
    assert!(!kinds(&events).contains(&"summary"));
}

#[tokio::test]
async fn test_fatal_lists_participants_sharing_a_name() {
    let roster = ParticipantRoster::new(vec![
        participant("a").with_name("Model"),
        participant("b").with_name("Model"),
    ])
    .unwrap();
    let request = DiscussionRequest::new(Topic::try_new("Tabs or spaces?").unwrap(), roster, 1);
    let gateway = ScriptedGateway::new().unavailable("a").unavailable("b");

    let (events, _) = run(gateway, request).await;

    match events.last().unwrap() {
        ProgressEvent::Error(err) => {
            assert!(err.fatal);
            assert!(err.message.contains("attempted: Model, Model"));
        }
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_summary_cascade_stops_at_first_success() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("a1"), Err("overloaded")])
        .respond("b", &[Ok("b1"), Ok("summary from b")])
        .respond("c", &[Ok("c1"), Ok("summary from c")]);

    let (events, gateway) = run(gateway, request(&["a", "b", "c"], 1)).await;

    let summary = events.iter().find_map(|e| match e {
        ProgressEvent::Summary {
            participant_id,
            content,
            ..
        } => Some((participant_id.clone(), content.clone())),
        _ => None,
    });
    assert_eq!(
        summary,
        Some(("b".to_string(), "summary from b".to_string()))
    );
    // C only took its turn
    assert_eq!(gateway.calls_for("c"), 1);
    // A's summary failure is reported, its follow-up failure is not
    let errors: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::Error(_)))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(events.last(), Some(&ProgressEvent::Complete));
}

#[tokio::test]
async fn test_summary_exhaustion_still_completes() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("a1"), Err("down")])
        .respond("b", &[Ok("b1"), Ok("   ")]);

    let (events, _) = run(gateway, request(&["a", "b"], 1)).await;

    let tail = &kinds(&events)[4..];
    assert_eq!(tail, ["error", "error", "error", "complete"]);
    assert!(events[6].is_fatal());
}

#[tokio::test]
async fn test_round_cap_applies() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("a1"), Ok("a2"), Ok("a3")])
        .respond("b", &[Ok("b1"), Ok("b2"), Ok("b3")]);
    let request = request(&["a", "b"], 5)
        .with_termination(TerminationConfig::default().with_max_rounds(2))
        .skip_summary();

    let (events, _) = run(gateway, request).await;

    assert_eq!(message_contents(&events), vec!["a1", "b1", "a2", "b2"]);
    assert!(events.iter().all(|e| match e {
        ProgressEvent::Progress {
            round,
            total_rounds,
            ..
        } => *round <= 2 && *total_rounds == 2,
        _ => true,
    }));
}

#[tokio::test]
async fn test_consensus_terminates_after_round() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("I agree with the plan"), Ok("a2")])
        .respond("b", &[Ok("Good point, let's go"), Ok("b2")]);
    let request = request(&["a", "b"], 3)
        .with_termination(TerminationConfig::consensus(0.5))
        .skip_summary();

    let (events, gateway) = run(gateway, request).await;

    assert_eq!(
        kinds(&events),
        vec!["progress", "message", "progress", "message", "terminated", "ready_for_summary"]
    );
    assert!(matches!(events[4], ProgressEvent::Terminated { round: 1, .. }));
    assert_eq!(gateway.total_calls(), 2);
}

#[tokio::test]
async fn test_termination_waits_for_last_participant() {
    // A says the keyword but B closes the round without it
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("DONE here"), Ok("a2")])
        .respond("b", &[Ok("b1"), Ok("b2")]);
    let request = request(&["a", "b"], 2)
        .with_termination(TerminationConfig::keywords(["done"]))
        .skip_summary();

    let (events, _) = run(gateway, request).await;

    assert!(!kinds(&events).contains(&"terminated"));
    assert_eq!(message_contents(&events).len(), 4);
}

#[tokio::test]
async fn test_resume_matches_uninterrupted_run() {
    let full = ScriptedGateway::new()
        .respond("a", &[Ok("a1"), Ok("a2")])
        .respond("b", &[Ok("b1"), Ok("b2")]);
    let (uninterrupted, _) = run(full, request(&["a", "b"], 2).skip_summary()).await;

    // Interrupt after the third message
    let first = Arc::new(
        ScriptedGateway::new()
            .respond("a", &[Ok("a1"), Ok("a2")])
            .respond("b", &[Ok("b1")]),
    );
    let mut stream = RunDiscussionUseCase::new(first)
        .execute(request(&["a", "b"], 2).skip_summary())
        .unwrap();
    let mut recorder = SnapshotRecorder::new(2, 2);
    let mut seen = 0;
    while let Some(event) = stream.next().await {
        recorder.observe(&event);
        if matches!(event, ProgressEvent::Message { .. }) {
            seen += 1;
            if seen == 3 {
                break;
            }
        }
    }
    drop(stream);
    let snapshot = recorder.snapshot();
    assert_eq!((snapshot.round, snapshot.participant_index), (2, 1));

    let rest = ScriptedGateway::new().respond("b", &[Ok("b2")]);
    let (resumed, _) = run(rest, request(&["a", "b"], 2).with_resume(snapshot).skip_summary()).await;

    let messages = |events: &[ProgressEvent]| match events.last() {
        Some(ProgressEvent::ReadyForSummary { messages }) => messages
            .iter()
            .map(|m| (m.id.clone(), m.content.clone()))
            .collect::<Vec<_>>(),
        other => panic!("expected ready_for_summary, got {:?}", other),
    };
    assert_eq!(messages(&resumed), messages(&uninterrupted));
    // Only B's round-2 turn was replayed
    assert_eq!(kinds(&resumed), vec!["progress", "message", "ready_for_summary"]);
}

#[tokio::test]
async fn test_resume_keeps_initial_search_context() {
    let searched = || {
        request(&["a", "b"], 2)
            .with_search(SearchConfig::enabled())
            .skip_summary()
    };
    let full = Arc::new(
        ScriptedGateway::new()
            .respond("a", &[Ok("a1"), Ok("a2")])
            .respond("b", &[Ok("b1"), Ok("b2")]),
    );
    run_with_search(full.clone(), searched()).await;

    // Interrupt once round 1 is done
    let first = Arc::new(
        ScriptedGateway::new()
            .respond("a", &[Ok("a1")])
            .respond("b", &[Ok("b1")]),
    );
    let search = Arc::new(FixedSearch(vec![SearchResult::new(
        "Style guide",
        "https://example.com/style",
        "Use spaces",
    )]));
    let mut stream = RunDiscussionUseCase::with_search(first, search)
        .execute(searched())
        .unwrap();
    let mut recorder = SnapshotRecorder::new(2, 2);
    let mut seen = 0;
    while let Some(event) = stream.next().await {
        recorder.observe(&event);
        if matches!(event, ProgressEvent::Message { .. }) {
            seen += 1;
            if seen == 2 {
                break;
            }
        }
    }
    drop(stream);

    let rest = Arc::new(
        ScriptedGateway::new()
            .respond("a", &[Ok("a2")])
            .respond("b", &[Ok("b2")]),
    );
    let resumed = run_with_search(rest.clone(), searched().resumed(&recorder)).await;

    // No second search, yet round 2 sees the same context
    assert!(!kinds(&resumed).contains(&"searching"));
    assert_eq!(rest.prompts_for("a"), full.prompts_for("a")[1..].to_vec());
    assert_eq!(rest.prompts_for("b"), full.prompts_for("b")[1..].to_vec());
    assert!(rest.prompts_for("a")[0].contains("https://example.com/style"));
}

#[tokio::test]
async fn test_each_round_search_precedes_each_round() {
    let gateway = Arc::new(ScriptedGateway::new().respond("a", &[Ok("a1"), Ok("a2")]));

    let events = run_with_search(
        gateway,
        request(&["a"], 2).with_search(each_round_only()).skip_summary(),
    )
    .await;

    assert_eq!(
        kinds(&events),
        vec![
            "searching",
            "search_results",
            "progress",
            "message",
            "searching",
            "search_results",
            "progress",
            "message",
            "ready_for_summary",
        ]
    );
}

#[tokio::test]
async fn test_each_round_search_skips_round_one_after_initial_search() {
    let gateway = Arc::new(ScriptedGateway::new().respond("a", &[Ok("a1"), Ok("a2")]));
    let config = SearchConfig::enabled().with_timing(SearchTiming {
        at_start: true,
        each_round: true,
        on_demand: false,
    });

    let events = run_with_search(gateway, request(&["a"], 2).with_search(config).skip_summary())
        .await;

    let first_progress = kinds(&events)
        .iter()
        .position(|kind| *kind == "progress")
        .unwrap();
    assert_eq!(&kinds(&events)[..first_progress], ["searching", "search_results"]);
    // Round 2 still searches
    assert_eq!(kinds(&events).iter().filter(|k| **k == "searching").count(), 2);
}

#[tokio::test]
async fn test_each_round_search_skipped_on_mid_round_resume() {
    let a = participant("a");
    let snapshot = ResumeSnapshot {
        messages: vec![Message::new(1, &a, "a1", "prompt")],
        round: 1,
        participant_index: 1,
        total_rounds: 2,
    };
    let gateway = Arc::new(
        ScriptedGateway::new()
            .respond("a", &[Ok("a2")])
            .respond("b", &[Ok("b1"), Ok("b2")]),
    );

    let events = run_with_search(
        gateway,
        request(&["a", "b"], 2)
            .with_search(each_round_only())
            .with_resume(snapshot)
            .skip_summary(),
    )
    .await;

    // B finishes round 1 without a search; round 2 searches first
    assert_eq!(
        kinds(&events),
        vec![
            "progress",
            "message",
            "searching",
            "search_results",
            "progress",
            "message",
            "progress",
            "message",
            "ready_for_summary",
        ]
    );
}

#[tokio::test]
async fn test_streaming_emits_cumulative_chunks() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("hello big world")])
        .streaming();

    let (events, _) = run(gateway, request(&["a"], 1).stream_chunks().skip_summary()).await;

    let chunks: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::MessageChunk {
                message_id,
                delta,
                content,
                ..
            } => Some((message_id.as_str(), delta.as_str(), content.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        chunks,
        vec![
            ("r1-a", "hello ", "hello "),
            ("r1-a", "big ", "hello big "),
            ("r1-a", "world", "hello big world"),
        ]
    );
    match &events[4] {
        ProgressEvent::Message { message } => {
            assert_eq!(message.id, "r1-a");
            assert_eq!(message.content, "hello big world");
        }
        other => panic!("expected message, got {:?}", other),
    }
}

#[tokio::test]
async fn test_streaming_not_requested_uses_single_call() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("hello world")])
        .streaming();

    let (events, _) = run(gateway, request(&["a"], 1).skip_summary()).await;

    assert!(!kinds(&events).contains(&"message_chunk"));
}

#[tokio::test]
async fn test_truncated_stream_keeps_partial_text() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("hello world")])
        .truncated();

    let (events, _) = run(gateway, request(&["a"], 1).stream_chunks().skip_summary()).await;

    assert_eq!(message_contents(&events), vec!["hello world"]);
}

#[tokio::test]
async fn test_truncated_stream_without_text_fails_the_turn() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("")])
        .respond("b", &[Ok("b1")])
        .truncated();

    let (events, _) = run(gateway, request(&["a", "b"], 1).stream_chunks().skip_summary()).await;

    assert_eq!(
        kinds(&events),
        vec![
            "progress",
            "error",
            "progress",
            "message_chunk",
            "message",
            "ready_for_summary",
        ]
    );
    match &events[1] {
        ProgressEvent::Error(err) => {
            assert!(!err.fatal);
            assert!(err.message.contains("ended before the response completed"));
        }
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_on_demand_search_runs_before_message() {
    let gateway = ScriptedGateway::new()
        .respond("a", &[Ok("Let me check.\n[[SEARCH: rust editions]]\nEditions are opt-in.")]);
    let search = Arc::new(FixedSearch(vec![SearchResult::new(
        "Editions",
        "https://example.com/editions",
        "guide",
    )]));
    let config = SearchConfig::enabled().with_timing(SearchTiming {
        at_start: false,
        each_round: false,
        on_demand: true,
    });

    let use_case = RunDiscussionUseCase::with_search(Arc::new(gateway), search);
    let events: Vec<_> = use_case
        .execute(request(&["a"], 1).with_search(config).skip_summary())
        .unwrap()
        .collect()
        .await;

    assert_eq!(
        kinds(&events),
        vec!["progress", "searching", "search_results", "message", "ready_for_summary"]
    );
    assert!(matches!(&events[1], ProgressEvent::Searching { query } if query == "rust editions"));
    match &events[3] {
        ProgressEvent::Message { message } => {
            assert!(!message.content.contains("[[SEARCH"));
            assert!(message.content.contains("Editions are opt-in."));
            assert!(message.prompt.contains("[[SEARCH:"));
        }
        other => panic!("expected message, got {:?}", other),
    }
}

#[tokio::test]
async fn test_initial_search_feeds_prompts() {
    let gateway = Arc::new(ScriptedGateway::new().respond("a", &[Ok("a1")]));
    let search = Arc::new(FixedSearch(vec![SearchResult::new(
        "Style guide",
        "https://example.com/style",
        "Use spaces",
    )]));

    let use_case = RunDiscussionUseCase::with_search(gateway.clone(), search);
    let events: Vec<_> = use_case
        .execute(request(&["a"], 1).with_search(SearchConfig::enabled()).skip_summary())
        .unwrap()
        .collect()
        .await;

    assert_eq!(&kinds(&events)[..3], ["searching", "search_results", "progress"]);
    let script = gateway.script.lock().unwrap();
    assert!(script.calls[0].1.contains("https://example.com/style"));
}

#[tokio::test]
async fn test_search_failure_is_not_fatal() {
    let gateway = ScriptedGateway::new().respond("a", &[Ok("a1")]);
    let request = request(&["a"], 1)
        .with_search(SearchConfig::enabled())
        .skip_summary();

    let (events, _) = run(gateway, request).await;

    assert_eq!(
        kinds(&events),
        vec!["searching", "error", "progress", "message", "ready_for_summary"]
    );
    match &events[1] {
        ProgressEvent::Error(err) => {
            assert!(err.participant.is_none());
            assert!(!err.fatal);
        }
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_nothing_runs_until_polled() {
    let gateway = Arc::new(ScriptedGateway::new().respond("a", &[Ok("a1")]));
    let use_case = RunDiscussionUseCase::new(gateway.clone());

    let mut stream = use_case.execute(request(&["a"], 1)).unwrap();
    assert_eq!(gateway.total_calls(), 0);

    // The heartbeat comes before the backend call
    let first = stream.next().await.unwrap();
    assert_eq!(first.kind(), "progress");
    assert_eq!(gateway.total_calls(), 0);

    drop(stream);
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn test_every_event_is_logged() {
    let gateway = Arc::new(ScriptedGateway::new().respond("a", &[Ok("a1")]));
    let logger = Arc::new(RecordingLogger::default());
    let use_case = RunDiscussionUseCase::new(gateway).with_logger(logger.clone());

    let events: Vec<_> = use_case
        .execute(request(&["a"], 1).skip_summary())
        .unwrap()
        .collect()
        .await;

    assert_eq!(*logger.0.lock().unwrap(), kinds(&events));
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let use_case = RunDiscussionUseCase::new(Arc::new(ScriptedGateway::new()));

    assert!(matches!(
        use_case.execute(request(&["a"], 0)),
        Err(RunDiscussionError::ZeroRounds)
    ));
    let bad_threshold = request(&["a"], 1).with_termination(TerminationConfig::consensus(1.5));
    assert!(matches!(
        use_case.execute(bad_threshold),
        Err(RunDiscussionError::InvalidRequest(_))
    ));
}
