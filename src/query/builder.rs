//! Request construction
//!
//! Both builders are pure: the same descriptor (and token) always yields an
//! identical [`Request`].

use super::types::{QueryDescriptor, Request};
use crate::error::{Error, Result};

/// Default entry point of the MediaWiki action API
const DEFAULT_API_PATH: &str = "api.php";

/// Builds first-page and continuation requests for a listing
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    /// Path of the API endpoint relative to the base URL
    api_path: String,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            api_path: DEFAULT_API_PATH.to_string(),
        }
    }
}

impl RequestBuilder {
    /// Create a builder targeting `api.php`
    pub fn new() -> Self {
        Self::default()
    }

    /// Target a different endpoint path
    #[must_use]
    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        self.api_path = path.into();
        self
    }

    /// Endpoint path used for every request
    pub fn api_path(&self) -> &str {
        &self.api_path
    }

    /// Request for the first page of a listing
    pub fn build_first(&self, descriptor: &QueryDescriptor) -> Result<Request> {
        self.base_request(descriptor)
    }

    /// Request for the page following `token`
    pub fn build_continuation(&self, descriptor: &QueryDescriptor, token: &str) -> Result<Request> {
        if token.is_empty() {
            return Err(Error::invalid_query("continuation token must not be empty"));
        }
        let request = self
            .base_request(descriptor)?
            .param(descriptor.kind().continue_param(), token);
        Ok(request)
    }

    fn base_request(&self, descriptor: &QueryDescriptor) -> Result<Request> {
        if descriptor.subject_name().is_empty() {
            return Err(Error::invalid_query("subject name must not be empty"));
        }

        let kind = descriptor.kind();
        let prefix = kind.prefix();

        let mut request = Request::get(&self.api_path)
            .param("action", "query")
            .param("format", "xml")
            .param("list", kind.module())
            .param(format!("{prefix}limit"), descriptor.page_limit().to_string());

        if let Some(namespaces) = descriptor.namespace_param() {
            request = request.param(format!("{prefix}namespace"), namespaces);
        }

        Ok(request.param(
            format!("{prefix}title"),
            kind.decorate_title(descriptor.subject_name()),
        ))
    }
}

/// Build a first-page request with the default builder
pub fn build_first(descriptor: &QueryDescriptor) -> Result<Request> {
    RequestBuilder::default().build_first(descriptor)
}

/// Build a continuation request with the default builder
pub fn build_continuation(descriptor: &QueryDescriptor, token: &str) -> Result<Request> {
    RequestBuilder::default().build_continuation(descriptor, token)
}
