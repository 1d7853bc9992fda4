//! HTTP transport module
//!
//! The pagination engine never performs I/O itself; it hands each
//! [`Request`](crate::query::Request) to a [`Transport`] and receives the raw
//! response text back.
//!
//! # Features
//!
//! - **Transport trait**: single request in, raw body out, async
//! - **HttpTransport**: reqwest-backed implementation with timeout, user agent
//!   and default headers
//!
//! Retries, backoff and rate limiting are left to the caller.

mod client;
mod transport;

pub use client::{HttpTransport, HttpTransportConfig, HttpTransportConfigBuilder};
pub use transport::Transport;
