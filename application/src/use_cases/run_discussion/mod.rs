//! Run Discussion use case
//!
//! Drives a multi-round, round-robin discussion and exposes it as a lazy
//! [`Stream`] of [`ProgressEvent`]s:
//!
//! | Stage              | Events                                         |
//! |--------------------|------------------------------------------------|
//! | Initial search     | `searching`, `search_results` / `error`        |
//! | Each turn          | `progress`, then `message_chunk`* and `message` or `error` |
//! | Round end          | `terminated` when the termination policy fires |
//! | After rounds       | fatal `error` / `ready_for_summary` / continue |
//! | Summary cascade    | `error`* then `summary` (or one fatal `error`) |
//! | Follow-ups         | `followups` (optional)                         |
//! | End                | `complete`                                     |
//!
//! Nothing runs until the stream is polled and no task is spawned, so
//! dropping the stream cancels the run.

mod run;
mod summary;
mod types;

pub use types::{DiscussionRequest, RunDiscussionError};

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::search_gateway::{NoSearch, SearchGateway};
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptLogger};
use council_domain::ProgressEvent;
use futures::stream::{BoxStream, Stream, StreamExt};
use run::DiscussionRun;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Ordered, finite event sequence of one discussion run.
pub struct DiscussionStream {
    inner: BoxStream<'static, ProgressEvent>,
}

impl Stream for DiscussionStream {
    type Item = ProgressEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Use case for running a discussion
pub struct RunDiscussionUseCase<G, S = NoSearch>
where
    G: LlmGateway + ?Sized + 'static,
    S: SearchGateway + ?Sized + 'static,
{
    gateway: Arc<G>,
    search: Arc<S>,
    logger: Arc<dyn TranscriptLogger>,
}

impl<G> RunDiscussionUseCase<G, NoSearch>
where
    G: LlmGateway + ?Sized + 'static,
{
    /// Use case without a search engine.
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_search(gateway, Arc::new(NoSearch))
    }
}

impl<G, S> RunDiscussionUseCase<G, S>
where
    G: LlmGateway + ?Sized + 'static,
    S: SearchGateway + ?Sized + 'static,
{
    pub fn with_search(gateway: Arc<G>, search: Arc<S>) -> Self {
        Self {
            gateway,
            search,
            logger: Arc::new(NoTranscriptLogger),
        }
    }

    /// Every emitted event is also written to `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Validate `request` and return its event stream.
    ///
    /// Invalid requests are rejected here; once a stream is returned every
    /// failure is reported as an `error` event instead.
    pub fn execute(&self, request: DiscussionRequest) -> Result<DiscussionStream, RunDiscussionError> {
        request.validate()?;

        let run = DiscussionRun::new(
            self.gateway.clone(),
            self.search.clone(),
            self.logger.clone(),
            request,
        );
        let inner = futures::stream::unfold(run, |mut run| async move {
            run.next_event().await.map(|event| (event, run))
        })
        .boxed();

        Ok(DiscussionStream { inner })
    }
}

#[cfg(test)]
mod tests;
