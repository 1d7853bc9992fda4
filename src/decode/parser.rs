//! XML response parser for `list=` queries
//!
//! Matches the fixed row shape `<cm pageid=".." ns=".." title=".." />`
//! (attribute order is irrelevant) and the continuation marker in either
//! its legacy `<query-continue>` or current `<continue>` form.

use super::types::{PageResult, RawRecord};
use crate::error::{Error, Result};
use crate::types::{ListKind, NamespaceId};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

static ERROR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<error\b([^>]*?)/?>").unwrap());

static ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

static LEGACY_CONTINUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<query-continue>(.*?)</query-continue>").unwrap());

static CONTINUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<continue\b([^>]*?)/?>").unwrap());

static ROW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(cm|bl|ei)\b([^>]*?)/?>").unwrap());

static LEGACY_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(categorymembers|backlinks|embeddedin)\b([^>]*?)/?>").unwrap()
});

static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").unwrap());

/// Core trait for turning a response body into a page of rows
pub trait ResponseParser: Send + Sync {
    /// Parse one response body
    ///
    /// Fails with [`Error::Server`] when the body carries an error element.
    fn parse(&self, body: &str) -> Result<PageResult>;
}

/// Parser for XML-formatted action API responses
#[derive(Debug, Clone)]
pub struct XmlResponseParser {
    kind: ListKind,
    continue_attr: String,
}

impl XmlResponseParser {
    /// Create a parser for one listing kind
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            continue_attr: kind.continue_param(),
        }
    }

    /// Listing kind this parser understands
    pub fn kind(&self) -> ListKind {
        self.kind
    }

    fn check_error(&self, body: &str) -> Result<()> {
        if let Some(caps) = ERROR_REGEX.captures(body) {
            let attrs = parse_attributes(caps.get(1).map_or("", |m| m.as_str()));
            let code = attrs.get("code").cloned().unwrap_or_default();
            let info = attrs.get("info").cloned().unwrap_or_else(|| code.clone());
            debug!(code = %code, "API reported an error");
            return Err(Error::Server { code, info });
        }
        Ok(())
    }

    fn extract_records(&self, body: &str) -> (Vec<RawRecord>, usize) {
        let mut records = Vec::new();
        let mut skipped = 0;

        let rows = ROW_REGEX
            .captures_iter(body)
            .filter(|caps| &caps[1] == self.kind.prefix());

        for caps in rows {
            let raw_attrs = caps.get(2).map_or("", |m| m.as_str());
            match parse_record(&parse_attributes(raw_attrs)) {
                Some(record) => records.push(record),
                None => {
                    skipped += 1;
                    warn!(
                        row = %caps.get(0).map_or("", |m| m.as_str()),
                        "Skipping malformed {} row",
                        self.kind
                    );
                }
            }
        }

        (records, skipped)
    }

    fn extract_token(&self, body: &str) -> Option<String> {
        let current = CONTINUE_REGEX
            .captures(body)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_attributes(m.as_str()).remove(&self.continue_attr));
        if current.is_some() {
            return current.filter(|token| !token.is_empty());
        }

        let section = LEGACY_CONTINUE_REGEX.captures(body)?.get(1)?.as_str();
        LEGACY_MARKER_REGEX
            .captures_iter(section)
            .filter(|caps| &caps[1] == self.kind.module())
            .find_map(|caps| parse_attributes(&caps[2]).remove(&self.continue_attr))
            .filter(|token| !token.is_empty())
    }
}

impl Default for XmlResponseParser {
    fn default() -> Self {
        Self::new(ListKind::default())
    }
}

impl ResponseParser for XmlResponseParser {
    fn parse(&self, body: &str) -> Result<PageResult> {
        self.check_error(body)?;

        if !body.trim_start().starts_with('<') && !body.trim().is_empty() {
            warn!("Response body does not look like XML");
        }

        let (items, skipped) = self.extract_records(body);
        let next_token = self.extract_token(body);

        debug!(
            items = items.len(),
            skipped,
            has_more = next_token.is_some(),
            "Parsed {} page",
            self.kind
        );

        Ok(PageResult {
            items,
            next_token,
            skipped,
        })
    }
}

/// Build a record from row attributes; `None` if a field is missing or not numeric
fn parse_record(attrs: &HashMap<String, String>) -> Option<RawRecord> {
    let title = attrs.get("title").filter(|t| !t.is_empty())?;
    let page_id = attrs.get("pageid")?.trim().parse::<u64>().ok()?;
    let namespace_id = attrs.get("ns")?.trim().parse::<NamespaceId>().ok()?;
    Some(RawRecord::new(title.clone(), page_id, namespace_id))
}

/// Collect `name="value"` pairs, entity-decoding values
fn parse_attributes(raw: &str) -> HashMap<String, String> {
    ATTR_REGEX
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((name, decode_entities(value).into_owned()))
        })
        .collect()
}

/// Decode the predefined XML entities and numeric character references
///
/// Unknown or invalid references are left untouched.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    ENTITY_REGEX.replace_all(input, |caps: &regex::Captures<'_>| {
        let entity = &caps[1];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else {
                    entity[1..].parse::<u32>().ok()
                };
                code.and_then(char::from_u32)
            }
        };
        decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
    })
}
