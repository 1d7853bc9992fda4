//! Query module
//!
//! Describes a paginated listing and turns it into wire requests.
//!
//! # Overview
//!
//! - `QueryDescriptor` - immutable description of one logical listing
//! - `Request` - transport-agnostic request (method, path, ordered params)
//! - `RequestBuilder` - pure first-page / continuation request construction

mod builder;
mod types;

pub use builder::{build_continuation, build_first, RequestBuilder};
pub use types::{
    api_base_url, QueryDescriptor, QueryDescriptorBuilder, Request, DEFAULT_PAGE_LIMIT,
};
