//! Query types
//!
//! Defines the listing descriptor and the request value handed to a transport.

use crate::error::{Error, Result};
use crate::types::{ListKind, Method, NamespaceId};
use serde::Serialize;
use std::collections::BTreeSet;
use url::Url;

/// Page size used when none is configured
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Separator MediaWiki uses in place of spaces inside titles
const TITLE_SEPARATOR: &str = "_";

// ============================================================================
// Query Descriptor
// ============================================================================

/// Immutable description of one paginated listing
///
/// The subject name is normalized on construction (spaces become `_`), the
/// namespace filter is kept sorted and the page limit is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDescriptor {
    kind: ListKind,
    subject_name: String,
    namespaces: BTreeSet<NamespaceId>,
    page_limit: u32,
}

impl QueryDescriptor {
    /// Category member listing over all namespaces with the default page size
    pub fn new(subject_name: impl Into<String>) -> Result<Self> {
        Self::builder(subject_name).build()
    }

    /// Create a descriptor builder
    pub fn builder(subject_name: impl Into<String>) -> QueryDescriptorBuilder {
        QueryDescriptorBuilder {
            kind: ListKind::default(),
            subject_name: subject_name.into(),
            namespaces: BTreeSet::new(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Listing kind
    pub fn kind(&self) -> ListKind {
        self.kind
    }

    /// Normalized subject name (category or page title, without prefix)
    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    /// Namespace filter; empty means "all namespaces"
    pub fn namespaces(&self) -> &BTreeSet<NamespaceId> {
        &self.namespaces
    }

    /// Maximum number of rows requested per page
    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// Namespace filter serialized as a single `|`-delimited value
    pub fn namespace_param(&self) -> Option<String> {
        if self.namespaces.is_empty() {
            return None;
        }
        let joined = self
            .namespaces
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("|");
        Some(joined)
    }
}

/// Builder for [`QueryDescriptor`]
#[derive(Debug, Clone)]
pub struct QueryDescriptorBuilder {
    kind: ListKind,
    subject_name: String,
    namespaces: BTreeSet<NamespaceId>,
    page_limit: u32,
}

impl QueryDescriptorBuilder {
    /// Set the listing kind
    #[must_use]
    pub fn kind(mut self, kind: ListKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add one namespace to the filter
    #[must_use]
    pub fn namespace(mut self, ns: NamespaceId) -> Self {
        self.namespaces.insert(ns);
        self
    }

    /// Add several namespaces to the filter
    #[must_use]
    pub fn namespaces(mut self, namespaces: impl IntoIterator<Item = NamespaceId>) -> Self {
        self.namespaces.extend(namespaces);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }

    /// Validate and build the descriptor
    pub fn build(self) -> Result<QueryDescriptor> {
        let subject_name = normalize_title(&self.subject_name);
        if subject_name.is_empty() {
            return Err(Error::invalid_query("subject name must not be empty"));
        }
        if self.page_limit == 0 {
            return Err(Error::invalid_query("page limit must be greater than zero"));
        }

        Ok(QueryDescriptor {
            kind: self.kind,
            subject_name,
            namespaces: self.namespaces,
            page_limit: self.page_limit,
        })
    }
}

/// Trim and replace spaces with the wire separator
fn normalize_title(raw: &str) -> String {
    raw.trim().replace(' ', TITLE_SEPARATOR)
}

// ============================================================================
// Request
// ============================================================================

/// A transport-agnostic API request
///
/// Parameters are kept in insertion order so identical inputs always render
/// to byte-identical query strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API base URL (e.g. `api.php`)
    pub path: String,
    /// Unencoded parameters in wire order
    pub params: Vec<(String, String)>,
}

impl Request {
    /// Create an empty GET request for a path
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Look up the first value of a parameter
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render parameters as an `application/x-www-form-urlencoded` string
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    /// Resolve against an API base URL
    pub fn to_url(&self, base: &Url) -> Result<Url> {
        let mut url = base.join(&self.path)?;
        url.set_query(Some(&self.query_string()));
        Ok(url)
    }
}

/// Parse an API base URL so relative request paths resolve under it
///
/// A script path such as `https://wiki.example.org/w` gets a trailing `/`;
/// URLs that already end in `/` or name a `.php` entry point are kept.
pub fn api_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') && !url.path().ends_with(".php") {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}?{}", self.method, self.path, self.query_string())
    }
}
