//! Response decoder module
//!
//! Turns one raw API response body into a [`PageResult`].
//!
//! # Overview
//!
//! Error responses are detected before any row is extracted. Rows that lack
//! a numeric `pageid`/`ns` or a `title` are skipped and counted, never fatal.
//! The presence of the continuation attribute is the only "more pages" signal.

mod parser;
mod types;

pub use parser::{decode_entities, ResponseParser, XmlResponseParser};
pub use types::{PageResult, RawRecord};
