//! Pagination module
//!
//! Supports: Offset (page numbers), Semi-open cursor, Closed cursor, Simple cursor
//!
//! # Overview
//!
//! A request's raw query is resolved against the total item count into a
//! [`PaginationDescriptor`]. After the page is fetched, the selected
//! [`StrategyKind`] turns the descriptor and a [`PageView`] of the items into
//! a [`LinkSet`], rebuilding each link from the inbound [`UrlContext`].

mod extractor;
mod rebuilder;
mod resolver;
mod strategies;
mod types;

pub use extractor::{timestamp_from_value, DateExtractor};
pub use rebuilder::UrlContext;
pub use resolver::{parse_int_prefix, resolve};
pub use strategies::{
    ClosedCursorStrategy, LinkStrategy, OffsetStrategy, SemiOpenCursorStrategy,
    SimpleCursorStrategy, StrategyKind,
};
pub use types::{
    params, LinkName, LinkSet, PageView, PaginationDescriptor, RawQuery, DEFAULT_LIMIT,
    DEFAULT_PAGE,
};
