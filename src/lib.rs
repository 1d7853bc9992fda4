// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # mw-listing
//!
//! Lazy, restart-safe iteration over paginated MediaWiki API listings
//! (category members, backlinks, transclusions).
//!
//! ## Features
//!
//! - **Explicit fetching**: `ensure_buffered` does I/O, `peek`/`take_buffered` never do
//! - **Continuation tokens**: single-use, never advanced on failure, so retries are idempotent
//! - **Error detection**: API error responses end the listing; malformed rows are skipped
//! - **Pluggable pieces**: bring your own transport, parser or projection
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mw_listing::http::HttpTransport;
//! use mw_listing::pagination::PaginationEngine;
//! use mw_listing::projection::TitleProjection;
//! use mw_listing::query::QueryDescriptor;
//! use mw_listing::types::namespace;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> mw_listing::Result<()> {
//!     let transport = Arc::new(HttpTransport::new("https://en.wikipedia.org/w/")?);
//!     let descriptor = QueryDescriptor::builder("Chemical elements")
//!         .namespace(namespace::MAIN)
//!         .build()?;
//!
//!     let mut engine = PaginationEngine::new(descriptor, transport, TitleProjection);
//!     while let Some(title) = engine.take_next().await? {
//!         println!("{title}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PaginationEngine                         │
//! │  ensure_buffered() → peek() / take_buffered() → Projection   │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────────┬──────────┴─────────┬─────────────────────┐
//! │  RequestBuilder  │     Transport      │   ResponseParser    │
//! ├──────────────────┼────────────────────┼─────────────────────┤
//! │  first page      │  HttpTransport     │  error marker       │
//! │  continuation    │  (reqwest)         │  rows, continuation │
//! └──────────────────┴────────────────────┴─────────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Query descriptors and request construction
pub mod query;

/// Response parsing
pub mod decode;

/// Mapping parsed rows to caller types
pub mod projection;

/// Transport trait and HTTP implementation
pub mod http;

/// Pagination engine
pub mod pagination;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ClientConfig;
pub use decode::{PageResult, RawRecord, ResponseParser, XmlResponseParser};
pub use http::{HttpTransport, Transport};
pub use pagination::{EnginePhase, PaginationEngine};
pub use projection::{Projection, RecordProjection, TitleProjection};
pub use query::{QueryDescriptor, Request, RequestBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
