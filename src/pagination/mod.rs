//! Pagination module
//!
//! Turns a sequence of paged API responses into one forward-only listing.
//!
//! # Overview
//!
//! [`PaginationEngine`] owns a single cursor over one [`QueryDescriptor`]
//! listing. Fetching is explicit: [`PaginationEngine::ensure_buffered`] may
//! perform one or more transport round-trips, while
//! [`PaginationEngine::peek`] and [`PaginationEngine::take_buffered`] only
//! touch the local buffer. `has_more`/`take_next` combine both for callers
//! that prefer a pull-style interface.
//!
//! The engine is single-consumer. Share it between tasks by wrapping it in a
//! mutex held for the whole fetch-and-refill call (see [`SharedEngine`]).
//!
//! [`QueryDescriptor`]: crate::query::QueryDescriptor

mod engine;
mod types;

pub use engine::{PaginationEngine, SharedEngine};
pub use types::{EnginePhase, EngineState, EngineStats};

#[cfg(test)]
mod tests;
