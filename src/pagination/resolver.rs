//! Descriptor resolution
//!
//! Turns raw query parameters and a total count into a clamped
//! [`PaginationDescriptor`]. Resolution never fails.

use super::types::{PaginationDescriptor, RawQuery, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::types::Timestamp;

/// Resolve a descriptor from the raw query and the total item count.
///
/// `page` and `limit` fall back to 1 and 10 when missing or non-numeric,
/// `limit` is raised to at least 1 and `page` is clamped into
/// `[1, last_page]`. Cursor parameters are parsed once into integers; a
/// cursor that is not a number is treated as absent.
pub fn resolve(query: &RawQuery, count: u64) -> PaginationDescriptor {
    let page = parse_param(query.page.as_deref()).unwrap_or(DEFAULT_PAGE);
    let limit = parse_param(query.limit.as_deref()).unwrap_or(DEFAULT_LIMIT);

    let limit = limit.max(1) as u64;
    let last_page = count.div_ceil(limit).max(1);
    let page = (page.max(1) as u64).min(last_page);

    let descriptor = PaginationDescriptor {
        offset: (page - 1) * limit,
        limit,
        page,
        count,
        last_page,
        since: parse_param(query.since.as_deref()),
        before: parse_param(query.before.as_deref()),
        until: parse_param(query.until.as_deref()),
        now: parse_param(query.now.as_deref()),
    };

    tracing::debug!(
        page = descriptor.page,
        limit = descriptor.limit,
        last_page = descriptor.last_page,
        count = descriptor.count,
        "Resolved pagination descriptor"
    );

    descriptor
}

fn parse_param(value: Option<&str>) -> Option<Timestamp> {
    value.and_then(parse_int_prefix)
}

/// Permissive integer parsing: optional leading whitespace and sign, then the
/// leading run of ASCII digits. `"12abc"` is 12, `"abc"` and `""` are `None`.
/// Values beyond the `i64` range saturate.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude = rest[..digits].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    Some(if negative { -magnitude } else { magnitude })
}
