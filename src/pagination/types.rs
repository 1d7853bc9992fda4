//! Pagination state types
//!
//! The phase machine and the buffer/token pair it guards.

use crate::decode::{PageResult, RawRecord};
use std::collections::VecDeque;

/// Lifecycle phase of a pagination engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnginePhase {
    /// Not yet started
    #[default]
    Uninitialized,
    /// A fetch is due but has not been issued (or the last one failed)
    AwaitingFetch,
    /// Items are available, or a continuation token promises more
    Buffered,
    /// Terminal; no further fetches will be attempted
    Exhausted,
}

impl EnginePhase {
    /// Check if this is the terminal phase
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

/// Mutable cursor state of one listing
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    /// Current phase
    pub phase: EnginePhase,
    /// Rows of the current page not yet handed out
    pub buffer: VecDeque<RawRecord>,
    /// Token for the next page; `None` once the server stops sending one
    pub token: Option<String>,
}

impl EngineState {
    /// Create a state in the `Uninitialized` phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Move from `Uninitialized` to `AwaitingFetch`
    pub fn start(&mut self) {
        if self.phase == EnginePhase::Uninitialized {
            self.phase = EnginePhase::AwaitingFetch;
        }
    }

    /// Install a freshly parsed page
    ///
    /// The previous token is dropped and replaced by the page's token.
    pub fn refill(&mut self, page: PageResult) {
        self.token = page.next_token;
        self.buffer.extend(page.items);
        self.phase = if self.buffer.is_empty() && self.token.is_none() {
            EnginePhase::Exhausted
        } else {
            EnginePhase::Buffered
        };
    }

    /// Take the next buffered row, settling the phase if the buffer drains
    pub fn pop_front(&mut self) -> Option<RawRecord> {
        let record = self.buffer.pop_front()?;
        if self.buffer.is_empty() {
            self.settle_empty();
        }
        Some(record)
    }

    /// Resolve an empty `Buffered` state into `AwaitingFetch` or `Exhausted`
    pub fn settle_empty(&mut self) {
        if self.phase == EnginePhase::Buffered && self.buffer.is_empty() {
            self.phase = if self.token.is_some() {
                EnginePhase::AwaitingFetch
            } else {
                EnginePhase::Exhausted
            };
        }
    }

    /// Enter the terminal phase, discarding the token
    pub fn exhaust(&mut self) {
        self.token = None;
        self.phase = EnginePhase::Exhausted;
    }
}

/// Counters collected while iterating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Transport calls issued, including failed ones
    pub requests: u64,
    /// Pages parsed successfully
    pub pages: u64,
    /// Items handed to the caller
    pub items_yielded: u64,
    /// Malformed rows dropped by the parser
    pub records_skipped: u64,
}
