//! Pagination types
//!
//! Raw query parameters, the resolved descriptor, the page view consumed by
//! the link strategies, and the link set they produce.

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Query parameter names understood by the resolver and the strategies
pub mod params {
    pub const PAGE: &str = "page";
    pub const LIMIT: &str = "limit";
    pub const SINCE: &str = "since";
    pub const BEFORE: &str = "before";
    pub const UNTIL: &str = "until";
    pub const NOW: &str = "now";

    /// Keys owned by the cursor strategies, stripped before every link is built
    pub const CURSOR_KEYS: [&str; 3] = [SINCE, BEFORE, UNTIL];
}

/// Default page when `page` is missing or not a number
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size when `limit` is missing or not a number
pub const DEFAULT_LIMIT: i64 = 10;

// ============================================================================
// Raw Query
// ============================================================================

/// Untyped inbound query parameters, possibly malformed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub since: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub until: Option<String>,
    #[serde(default)]
    pub now: Option<String>,
}

impl RawQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the recognized parameters from decoded query pairs.
    ///
    /// Unknown keys are ignored; for repeated keys the last value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            if let Some(slot) = query.slot(key.as_ref()) {
                *slot = Some(value.into());
            }
        }
        query
    }

    /// Parse a raw (still percent-encoded) query string
    pub fn from_query_str(query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    /// Set a parameter by name (builder style); unknown keys are ignored
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        if let Some(slot) = self.slot(key) {
            *slot = Some(value.into());
        }
        self
    }

    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            params::PAGE => Some(&mut self.page),
            params::LIMIT => Some(&mut self.limit),
            params::SINCE => Some(&mut self.since),
            params::BEFORE => Some(&mut self.before),
            params::UNTIL => Some(&mut self.until),
            params::NOW => Some(&mut self.now),
            _ => None,
        }
    }
}

// ============================================================================
// Pagination Descriptor
// ============================================================================

/// Canonical, clamped pagination state for one request.
///
/// Invariants: `limit >= 1`, `1 <= page <= last_page`,
/// `last_page = max(ceil(count / limit), 1)`, `offset = (page - 1) * limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDescriptor {
    pub offset: u64,
    pub limit: u64,
    pub page: u64,
    pub count: u64,
    pub last_page: u64,
    pub since: Option<Timestamp>,
    pub before: Option<Timestamp>,
    pub until: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now: Option<Timestamp>,
}

impl PaginationDescriptor {
    /// Whether the request carried either the `since` or the `before` cursor
    pub fn has_cursor(&self) -> bool {
        self.since.is_some() || self.before.is_some()
    }

    /// `since=0` is the explicit "no lower bound" marker used by `last` links
    pub fn at_oldest_boundary(&self) -> bool {
        self.since == Some(0)
    }

    /// Whether a page of `len` items filled the requested limit
    pub fn is_full(&self, len: usize) -> bool {
        len as u64 >= self.limit
    }
}

// ============================================================================
// Page View
// ============================================================================

/// The facts about a fetched page that the cursor strategies depend on.
///
/// Items are ordered newest first, so `newest` is the timestamp of the first
/// item and `oldest` the timestamp of the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    pub len: usize,
    pub newest: Option<Timestamp>,
    pub oldest: Option<Timestamp>,
    /// Wall-clock time when the page was rendered
    pub fetched_at: Timestamp,
}

impl PageView {
    /// A view with no items
    pub fn empty(fetched_at: Timestamp) -> Self {
        Self {
            len: 0,
            newest: None,
            oldest: None,
            fetched_at,
        }
    }

    /// A view over `len` items with known edge timestamps
    pub fn new(len: usize, newest: Timestamp, oldest: Timestamp, fetched_at: Timestamp) -> Self {
        Self {
            len,
            newest: Some(newest),
            oldest: Some(oldest),
            fetched_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// ============================================================================
// Links
// ============================================================================

/// Name of a navigation link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkName {
    First,
    Last,
    Next,
    Previous,
    Current,
}

impl LinkName {
    pub const ALL: [LinkName; 5] = [
        LinkName::First,
        LinkName::Previous,
        LinkName::Current,
        LinkName::Next,
        LinkName::Last,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkName::First => "first",
            LinkName::Last => "last",
            LinkName::Next => "next",
            LinkName::Previous => "previous",
            LinkName::Current => "current",
        }
    }
}

impl fmt::Display for LinkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation links; a key is present only when the link is reachable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, name: LinkName) -> &mut Option<String> {
        match name {
            LinkName::First => &mut self.first,
            LinkName::Last => &mut self.last,
            LinkName::Next => &mut self.next,
            LinkName::Previous => &mut self.previous,
            LinkName::Current => &mut self.current,
        }
    }

    /// Set a link, replacing any previous value
    pub fn insert(&mut self, name: LinkName, url: String) {
        *self.slot(name) = Some(url);
    }

    /// Get a link by name
    pub fn get(&self, name: LinkName) -> Option<&str> {
        match name {
            LinkName::First => self.first.as_deref(),
            LinkName::Last => self.last.as_deref(),
            LinkName::Next => self.next.as_deref(),
            LinkName::Previous => self.previous.as_deref(),
            LinkName::Current => self.current.as_deref(),
        }
    }

    pub fn contains(&self, name: LinkName) -> bool {
        self.get(name).is_some()
    }

    /// Present links in navigation order
    pub fn iter(&self) -> impl Iterator<Item = (LinkName, &str)> + '_ {
        LinkName::ALL
            .into_iter()
            .filter_map(|name| self.get(name).map(|url| (name, url)))
    }

    /// Names of the present links, in navigation order
    pub fn names(&self) -> Vec<LinkName> {
        self.iter().map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
