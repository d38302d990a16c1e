//! Link strategy implementations
//!
//! Each strategy turns a resolved descriptor and a view of the fetched page
//! into a [`LinkSet`]. The rules deciding which links exist are private to
//! each strategy and evaluated fresh on every call; URL building is shared
//! through [`UrlContext::link`].

use super::types::{params, LinkName, LinkSet, PageView, PaginationDescriptor};
use super::rebuilder::UrlContext;
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Core trait for link strategies
pub trait LinkStrategy {
    /// Build the navigation links for one rendered page
    fn build(&self, ctx: &UrlContext, page: &PageView, pagination: &PaginationDescriptor)
        -> LinkSet;
}

/// Build a cursor link: cursor overrides first, then `limit`, then any extras
fn cursor_link(
    ctx: &UrlContext,
    pagination: &PaginationDescriptor,
    cursors: &[(&str, Timestamp)],
    extra: &[(&str, Timestamp)],
) -> String {
    let mut overrides: Vec<(&str, String)> = cursors
        .iter()
        .map(|(key, value)| (*key, value.to_string()))
        .collect();
    overrides.push((params::LIMIT, pagination.limit.to_string()));
    overrides.extend(extra.iter().map(|(key, value)| (*key, value.to_string())));
    ctx.link(&overrides)
}

/// Shared `next` rule for the cursor strategies: the page is non-empty, the
/// request is not already pinned to the oldest boundary (`since=0`), and the
/// page came back full. A short page means there is nothing older.
fn has_next(page: &PageView, pagination: &PaginationDescriptor) -> bool {
    !page.is_empty() && !pagination.at_oldest_boundary() && pagination.is_full(page.len)
}

// ============================================================================
// Strategy Kind
// ============================================================================

/// The closed set of link strategies a collection can be rendered with
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Page-number pagination
    #[default]
    Offset,
    /// Timestamp cursors, newest boundary follows the live data
    SemiOpenCursor,
    /// Timestamp cursors pinned to a `now` anchor
    ClosedCursor,
    /// Timestamp cursors with only `previous` and `next`
    SimpleCursor,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Offset,
        StrategyKind::SemiOpenCursor,
        StrategyKind::ClosedCursor,
        StrategyKind::SimpleCursor,
    ];

    /// Whether links depend on item timestamps
    pub fn is_cursor(&self) -> bool {
        !matches!(self, StrategyKind::Offset)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Offset => "offset",
            StrategyKind::SemiOpenCursor => "semi_open_cursor",
            StrategyKind::ClosedCursor => "closed_cursor",
            StrategyKind::SimpleCursor => "simple_cursor",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                crate::error::Error::invalid_value(
                    "strategy",
                    format!(
                        "unknown strategy '{s}', expected one of: offset, semi_open_cursor, closed_cursor, simple_cursor"
                    ),
                )
            })
    }
}

impl LinkStrategy for StrategyKind {
    fn build(
        &self,
        ctx: &UrlContext,
        page: &PageView,
        pagination: &PaginationDescriptor,
    ) -> LinkSet {
        let links = match self {
            StrategyKind::Offset => OffsetStrategy.build(ctx, page, pagination),
            StrategyKind::SemiOpenCursor => SemiOpenCursorStrategy.build(ctx, page, pagination),
            StrategyKind::ClosedCursor => ClosedCursorStrategy.build(ctx, page, pagination),
            StrategyKind::SimpleCursor => SimpleCursorStrategy.build(ctx, page, pagination),
        };
        tracing::debug!(strategy = %self, links = ?links.names(), "Generated links");
        links
    }
}

// ============================================================================
// Offset Strategy
// ============================================================================

/// Page-number links.
///
/// `first`, `last` and `current` always exist; `previous` only past the
/// first page and `next` only before the last one.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetStrategy;

impl OffsetStrategy {
    fn page_link(ctx: &UrlContext, pagination: &PaginationDescriptor, page: u64) -> String {
        ctx.link(&[
            (params::PAGE, page.to_string()),
            (params::LIMIT, pagination.limit.to_string()),
        ])
    }
}

impl LinkStrategy for OffsetStrategy {
    fn build(
        &self,
        ctx: &UrlContext,
        _page: &PageView,
        pagination: &PaginationDescriptor,
    ) -> LinkSet {
        let mut links = LinkSet::new();
        links.insert(LinkName::First, Self::page_link(ctx, pagination, 1));
        links.insert(
            LinkName::Last,
            Self::page_link(ctx, pagination, pagination.last_page),
        );
        links.insert(
            LinkName::Current,
            Self::page_link(ctx, pagination, pagination.page),
        );

        if pagination.page > 1 {
            links.insert(
                LinkName::Previous,
                Self::page_link(ctx, pagination, pagination.page - 1),
            );
        }
        if pagination.page < pagination.last_page {
            links.insert(
                LinkName::Next,
                Self::page_link(ctx, pagination, pagination.page + 1),
            );
        }

        links
    }
}

// ============================================================================
// Semi-Open Cursor Strategy
// ============================================================================

/// Timestamp cursors over a collection whose newest boundary is not pinned.
///
/// ```text
/// 0 ------------------------ T ------------------------> now
///      next (older)  <--  [page]  -->  previous (newer)
/// ```
///
/// - `first`: non-empty page reached through a cursor, `until=<newest>`
/// - `last`: non-empty page, `since=0&before=<oldest>`
/// - `previous`: always; `since=<newest>`, or when the page is empty or its
///   newest timestamp is unknown, the cursor already in use (`since`, else
///   `before`, else the current time)
/// - `next`: see the shared rule, `before=<oldest>`
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiOpenCursorStrategy;

impl LinkStrategy for SemiOpenCursorStrategy {
    fn build(
        &self,
        ctx: &UrlContext,
        page: &PageView,
        pagination: &PaginationDescriptor,
    ) -> LinkSet {
        let mut links = LinkSet::new();
        let link = |cursors: &[(&str, Timestamp)]| cursor_link(ctx, pagination, cursors, &[]);

        if !page.is_empty() && pagination.has_cursor() {
            if let Some(newest) = page.newest {
                links.insert(LinkName::First, link(&[(params::UNTIL, newest)]));
            }
        }

        if !page.is_empty() {
            if let Some(oldest) = page.oldest {
                links.insert(
                    LinkName::Last,
                    link(&[(params::SINCE, 0), (params::BEFORE, oldest)]),
                );
            }
        }

        let previous = match page.newest {
            Some(newest) if !page.is_empty() => newest,
            _ => {
                if page.is_empty() && pagination.has_cursor() {
                    tracing::warn!(
                        since = ?pagination.since,
                        before = ?pagination.before,
                        "Empty page while following a cursor; re-anchoring previous link"
                    );
                }
                pagination
                    .since
                    .or(pagination.before)
                    .unwrap_or(page.fetched_at)
            }
        };
        links.insert(LinkName::Previous, link(&[(params::SINCE, previous)]));

        if has_next(page, pagination) {
            if let Some(oldest) = page.oldest {
                links.insert(LinkName::Next, link(&[(params::BEFORE, oldest)]));
            }
        }

        links
    }
}

// ============================================================================
// Closed Cursor Strategy
// ============================================================================

/// Timestamp cursors pinned to a `now` anchor.
///
/// The first render (no `now` on the request) fixes `now` one unit past the
/// newest item, and every link carries that value, so a traversal keeps a
/// stable top even while new items arrive.
///
/// - `first`: always, `before=<now>`
/// - `last`: always, `since=0` plus `before=<newest>` on a non-empty page
/// - `previous`: non-empty page, `now` already on the request and
///   `newest + 1 < now`; `since=<newest>`
/// - `next`: see the shared rule, `before=<oldest>`
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedCursorStrategy;

impl ClosedCursorStrategy {
    /// Anchor used for the whole traversal
    pub fn anchor(page: &PageView, pagination: &PaginationDescriptor) -> Timestamp {
        pagination
            .now
            .unwrap_or_else(|| Self::first_item_ts(page).saturating_add(1))
    }

    /// Newest item timestamp; the current time stands in for an empty page
    fn first_item_ts(page: &PageView) -> Timestamp {
        page.newest.unwrap_or(page.fetched_at)
    }

    fn has_previous(page: &PageView, pagination: &PaginationDescriptor, now: Timestamp) -> bool {
        if page.is_empty() || pagination.now.is_none() {
            return false;
        }
        page.newest
            .is_some_and(|newest| newest.saturating_add(1) < now)
    }

    /// Cursor for the `previous` link.
    ///
    /// An empty page mid-traversal means items were removed between fetches;
    /// link back to the known `before` cursor if it predates the first item
    /// timestamp, otherwise to that timestamp itself.
    pub(crate) fn previous_cursor(
        page: &PageView,
        pagination: &PaginationDescriptor,
    ) -> (&'static str, Timestamp) {
        let first_ts = Self::first_item_ts(page);
        if !page.is_empty() {
            return (params::SINCE, first_ts);
        }

        tracing::warn!(
            before = ?pagination.before,
            "Empty page inside a pinned traversal; falling back to a known cursor"
        );
        match pagination.before {
            Some(before) if before < first_ts => (params::SINCE, before),
            _ => (params::BEFORE, first_ts),
        }
    }
}

impl LinkStrategy for ClosedCursorStrategy {
    fn build(
        &self,
        ctx: &UrlContext,
        page: &PageView,
        pagination: &PaginationDescriptor,
    ) -> LinkSet {
        let now = Self::anchor(page, pagination);
        let link = |cursors: &[(&str, Timestamp)]| {
            cursor_link(ctx, pagination, cursors, &[(params::NOW, now)])
        };

        let mut links = LinkSet::new();
        links.insert(LinkName::First, link(&[(params::BEFORE, now)]));

        if Self::has_previous(page, pagination, now) {
            let cursor = Self::previous_cursor(page, pagination);
            links.insert(LinkName::Previous, link(&[cursor]));
        }

        if has_next(page, pagination) {
            if let Some(oldest) = page.oldest {
                links.insert(LinkName::Next, link(&[(params::BEFORE, oldest)]));
            }
        }

        let last = match page.newest {
            Some(newest) if !page.is_empty() => {
                link(&[(params::SINCE, 0), (params::BEFORE, newest)])
            }
            _ => link(&[(params::SINCE, 0)]),
        };
        links.insert(LinkName::Last, last);

        links
    }
}

// ============================================================================
// Simple Cursor Strategy
// ============================================================================

/// Two-link timestamp cursors (no `first` or `last`).
///
/// - `previous`: non-empty page reached through a cursor, `since=<newest>`
/// - `next`: see the shared rule, `before=<oldest>`
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCursorStrategy;

impl LinkStrategy for SimpleCursorStrategy {
    fn build(
        &self,
        ctx: &UrlContext,
        page: &PageView,
        pagination: &PaginationDescriptor,
    ) -> LinkSet {
        let mut links = LinkSet::new();
        let link = |cursors: &[(&str, Timestamp)]| cursor_link(ctx, pagination, cursors, &[]);

        if !page.is_empty() && pagination.has_cursor() {
            if let Some(newest) = page.newest {
                links.insert(LinkName::Previous, link(&[(params::SINCE, newest)]));
            }
        }

        if has_next(page, pagination) {
            if let Some(oldest) = page.oldest {
                links.insert(LinkName::Next, link(&[(params::BEFORE, oldest)]));
            }
        }

        links
    }
}
