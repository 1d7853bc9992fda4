//! Common types used throughout mw-listing
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// Numeric MediaWiki namespace id
pub type NamespaceId = i32;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::GET => write!(f, "GET"),
            Method::POST => write!(f, "POST"),
        }
    }
}

// ============================================================================
// Namespaces
// ============================================================================

/// Well-known MediaWiki namespace ids
pub mod namespace {
    use super::NamespaceId;

    pub const MEDIA: NamespaceId = -2;
    pub const SPECIAL: NamespaceId = -1;
    pub const MAIN: NamespaceId = 0;
    pub const TALK: NamespaceId = 1;
    pub const USER: NamespaceId = 2;
    pub const USER_TALK: NamespaceId = 3;
    pub const PROJECT: NamespaceId = 4;
    pub const PROJECT_TALK: NamespaceId = 5;
    pub const FILE: NamespaceId = 6;
    pub const FILE_TALK: NamespaceId = 7;
    pub const MEDIAWIKI: NamespaceId = 8;
    pub const MEDIAWIKI_TALK: NamespaceId = 9;
    pub const TEMPLATE: NamespaceId = 10;
    pub const TEMPLATE_TALK: NamespaceId = 11;
    pub const HELP: NamespaceId = 12;
    pub const HELP_TALK: NamespaceId = 13;
    pub const CATEGORY: NamespaceId = 14;
    pub const CATEGORY_TALK: NamespaceId = 15;
}

// ============================================================================
// Listing Kind
// ============================================================================

/// Which `list=` module a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Members of a category (`list=categorymembers`)
    #[default]
    CategoryMembers,
    /// Pages linking to a page (`list=backlinks`)
    BackLinks,
    /// Pages transcluding a page (`list=embeddedin`)
    EmbeddedIn,
}

impl ListKind {
    /// Value of the `list` parameter, also the name of the continuation element
    pub fn module(&self) -> &'static str {
        match self {
            ListKind::CategoryMembers => "categorymembers",
            ListKind::BackLinks => "backlinks",
            ListKind::EmbeddedIn => "embeddedin",
        }
    }

    /// Parameter prefix; doubles as the row element name
    pub fn prefix(&self) -> &'static str {
        match self {
            ListKind::CategoryMembers => "cm",
            ListKind::BackLinks => "bl",
            ListKind::EmbeddedIn => "ei",
        }
    }

    /// Name of the continuation parameter/attribute (e.g. `cmcontinue`)
    pub fn continue_param(&self) -> String {
        format!("{}continue", self.prefix())
    }

    /// Title as sent on the wire for a normalized subject name
    pub fn decorate_title(&self, subject: &str) -> String {
        match self {
            ListKind::CategoryMembers => format!("Category:{subject}"),
            ListKind::BackLinks | ListKind::EmbeddedIn => subject.to_string(),
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.module())
    }
}

impl std::str::FromStr for ListKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "categorymembers" | "cm" => Ok(ListKind::CategoryMembers),
            "backlinks" | "bl" => Ok(ListKind::BackLinks),
            "embeddedin" | "ei" => Ok(ListKind::EmbeddedIn),
            other => Err(crate::Error::invalid_query(format!(
                "unknown listing kind '{other}'"
            ))),
        }
    }
}
