//! Pagination engine
//!
//! Orchestrates request building, the transport call and response parsing,
//! buffering one page of rows at a time.

use super::types::{EnginePhase, EngineState, EngineStats};
use crate::decode::{ResponseParser, XmlResponseParser};
use crate::error::Result;
use crate::http::Transport;
use crate::projection::Projection;
use crate::query::{QueryDescriptor, RequestBuilder};
use futures::stream::{self, Stream};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An engine shared between tasks; lock it for each consumption call
pub type SharedEngine<P> = Arc<tokio::sync::Mutex<PaginationEngine<P>>>;

/// Lazily materialized, forward-only listing
///
/// Failure policy:
/// - a transport failure (or a non-server parse failure) fails the current
///   call only; the stored token is untouched, so calling again re-issues the
///   identical request
/// - a [`Server`](crate::Error::Server) error is returned once and the engine
///   becomes `Exhausted`
/// - nothing is retried automatically
///
/// A continuation token the engine has already sent ends the listing, so a
/// server cycling through tokens cannot make iteration loop.
pub struct PaginationEngine<P: Projection> {
    descriptor: Arc<QueryDescriptor>,
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
    parser: Box<dyn ResponseParser>,
    projection: P,
    state: EngineState,
    stats: EngineStats,
    used_tokens: HashSet<String>,
}

impl<P: Projection> PaginationEngine<P> {
    /// Create an engine in the `AwaitingFetch` phase
    ///
    /// Uses the XML parser matching the descriptor's listing kind.
    pub fn new(
        descriptor: impl Into<Arc<QueryDescriptor>>,
        transport: Arc<dyn Transport>,
        projection: P,
    ) -> Self {
        let descriptor = descriptor.into();
        let parser = XmlResponseParser::new(descriptor.kind());

        let mut state = EngineState::new();
        state.start();

        Self {
            descriptor,
            builder: RequestBuilder::default(),
            transport,
            parser: Box::new(parser),
            projection,
            state,
            stats: EngineStats::default(),
            used_tokens: HashSet::new(),
        }
    }

    /// Replace the response parser
    #[must_use]
    pub fn with_parser(mut self, parser: impl ResponseParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Replace the request builder
    #[must_use]
    pub fn with_request_builder(mut self, builder: RequestBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Wrap the engine for use from several tasks
    pub fn into_shared(self) -> SharedEngine<P> {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    /// The listing being iterated
    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    /// Current phase
    pub fn phase(&self) -> EnginePhase {
        self.state.phase
    }

    /// Current cursor state
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Iteration counters
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Number of rows available without a fetch
    pub fn buffered(&self) -> usize {
        self.state.buffer.len()
    }

    /// Check if the listing has ended
    pub fn is_exhausted(&self) -> bool {
        self.state.phase.is_exhausted()
    }

    /// Make sure at least one item is buffered, fetching pages as needed
    ///
    /// Returns `Ok(false)` once the listing is exhausted. This is the only
    /// method that performs I/O.
    pub async fn ensure_buffered(&mut self) -> Result<bool> {
        loop {
            if !self.state.buffer.is_empty() {
                return Ok(true);
            }
            match self.state.phase {
                EnginePhase::Exhausted => return Ok(false),
                EnginePhase::Uninitialized => self.state.start(),
                // Page came back empty but carried a token
                EnginePhase::Buffered => self.state.settle_empty(),
                EnginePhase::AwaitingFetch => self.fetch_page().await?,
            }
        }
    }

    /// Look at the next buffered item without consuming it; never fetches
    pub fn peek(&self) -> Option<P::Output> {
        self.state
            .buffer
            .front()
            .map(|record| self.projection.project(record))
    }

    /// Consume the next buffered item; never fetches
    pub fn take_buffered(&mut self) -> Option<P::Output> {
        let record = self.state.pop_front()?;
        self.stats.items_yielded += 1;
        Some(self.projection.project(&record))
    }

    /// Check if another item exists, fetching if the buffer is empty
    pub async fn has_more(&mut self) -> Result<bool> {
        self.ensure_buffered().await
    }

    /// Take the next item, fetching if the buffer is empty
    ///
    /// Returns `Ok(None)` at end of sequence, repeatedly and without I/O.
    pub async fn take_next(&mut self) -> Result<Option<P::Output>> {
        if self.ensure_buffered().await? {
            Ok(self.take_buffered())
        } else {
            Ok(None)
        }
    }

    /// Drain the whole listing, stopping at the first error
    pub async fn collect_all(mut self) -> Result<Vec<P::Output>> {
        let mut items = Vec::new();
        while let Some(item) = self.take_next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Expose the listing as a stream
    ///
    /// Errors are yielded in place; polling again after a transport error
    /// retries the same request, and a server error ends the stream.
    ///
    /// The stream never gives up on transport errors by itself. A consumer
    /// that discards errors (for example `filter_map(Result::ok)`) against a
    /// transport that stays down will retry forever; stop on the first error
    /// or bound the number of retries instead.
    pub fn into_stream(self) -> impl Stream<Item = Result<P::Output>> {
        stream::unfold(self, |mut engine| async move {
            match engine.take_next().await {
                Ok(Some(item)) => Some((Ok(item), engine)),
                Ok(None) => None,
                Err(e) => Some((Err(e), engine)),
            }
        })
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let request = match self.state.token.as_deref() {
            Some(token) => self.builder.build_continuation(&self.descriptor, token)?,
            None => self.builder.build_first(&self.descriptor)?,
        };

        self.stats.requests += 1;
        debug!(
            kind = %self.descriptor.kind(),
            subject = %self.descriptor.subject_name(),
            continuation = self.state.token.is_some(),
            "Fetching page {}",
            self.stats.pages + 1
        );

        let body = self.transport.execute(&request).await.map_err(|e| {
            warn!("Fetch failed, token kept for retry: {e}");
            e
        })?;

        let mut page = match self.parser.parse(&body) {
            Ok(page) => page,
            Err(e) => {
                if e.is_server() {
                    warn!("Server rejected listing, giving up: {e}");
                    self.state.exhaust();
                } else {
                    warn!("Failed to parse page, token kept for retry: {e}");
                }
                return Err(e);
            }
        };

        self.stats.pages += 1;
        self.stats.records_skipped += page.skipped as u64;

        if let Some(token) = &self.state.token {
            self.used_tokens.insert(token.clone());
        }
        if let Some(next) = page.next_token.as_deref() {
            if self.used_tokens.contains(next) {
                warn!(
                    token = %next,
                    "Server returned an already consumed continuation token, ending listing"
                );
                page.next_token = None;
            }
        }

        self.state.refill(page);

        if self.state.token.is_none() {
            info!(
                subject = %self.descriptor.subject_name(),
                pages = self.stats.pages,
                requests = self.stats.requests,
                "Fetched final page"
            );
        }

        Ok(())
    }
}

impl<P: Projection> std::fmt::Debug for PaginationEngine<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationEngine")
            .field("descriptor", &self.descriptor)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
