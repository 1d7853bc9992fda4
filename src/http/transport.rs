//! Transport abstraction

use crate::error::Result;
use crate::query::Request;
use async_trait::async_trait;
use std::sync::Arc;

/// Executes one request and returns the raw response body
///
/// Implementations decide how to talk to the server (HTTP, fixtures, a
/// recorded session). Timeouts and cancellation belong here: an aborted
/// request should simply return an error.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single request
    async fn execute(&self, request: &Request) -> Result<String>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: &Request) -> Result<String> {
        (**self).execute(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn execute(&self, request: &Request) -> Result<String> {
        (**self).execute(request).await
    }
}
