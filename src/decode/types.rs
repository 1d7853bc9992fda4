//! Decoder output types

use crate::types::NamespaceId;
use serde::{Deserialize, Serialize};

/// One row of a listing as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRecord {
    /// Full page title including namespace prefix
    pub title: String,
    /// Page id
    #[serde(rename = "pageid")]
    pub page_id: u64,
    /// Namespace id
    #[serde(rename = "ns")]
    pub namespace_id: NamespaceId,
}

impl RawRecord {
    /// Create a new record
    pub fn new(title: impl Into<String>, page_id: u64, namespace_id: NamespaceId) -> Self {
        Self {
            title: title.into(),
            page_id,
            namespace_id,
        }
    }
}

/// Parsed outcome of one response page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Rows in server order
    pub items: Vec<RawRecord>,
    /// Continuation token; `None` means no further pages
    pub next_token: Option<String>,
    /// Number of malformed rows dropped while parsing
    pub skipped: usize,
}

impl PageResult {
    /// Create a page result
    pub fn new(items: Vec<RawRecord>, next_token: Option<String>) -> Self {
        Self {
            items,
            next_token,
            skipped: 0,
        }
    }

    /// Check if the server signalled another page
    pub fn has_more(&self) -> bool {
        self.next_token.is_some()
    }

    /// Check if this page ends the listing (no rows, no token)
    pub fn is_terminal(&self) -> bool {
        self.items.is_empty() && self.next_token.is_none()
    }
}
