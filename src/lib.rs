// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # collection-links
//!
//! Paginated collection envelopes with navigation links.
//!
//! A renderer takes an inbound request URL, a count source, a data source and
//! one of four link strategies, and produces `{ count, items, links }` where
//! every link is a fully rebuilt absolute URL.
//!
//! ## Features
//!
//! - **Descriptor Resolution**: Lenient `page`/`limit` parsing clamped against the total count
//! - **Offset Links**: `first`, `previous`, `current`, `next`, `last` by page number
//! - **Timestamp Cursors**: Semi-open, closed (pinned `now`) and simple variants
//! - **URL Rebuilding**: Unrelated query parameters are preserved on every link
//! - **HTTP Integration**: axum extractor and a demo server over configured collections
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use collection_links::{CollectionRenderer, DateExtractor, MemorySource, RequestContext, StrategyKind};
//!
//! #[tokio::main]
//! async fn main() -> collection_links::Result<()> {
//!     let extractor = DateExtractor::field("created_at");
//!     let renderer = CollectionRenderer::new(StrategyKind::ClosedCursor)
//!         .source(MemorySource::with_timestamps(load_events(), &extractor))
//!         .date_extractor(extractor);
//!
//!     let request = RequestContext::parse("https://api.example.com/events?limit=20")?;
//!     let collection = renderer.render(&request).await?;
//!     println!("{}", serde_json::to_string_pretty(&collection)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      CollectionRenderer                         │
//! │  count() → resolve(query, count) → fetch(descriptor) → links    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───────────────┬─────────────────┐
//! │   Resolver   │          Strategies           │    Rebuilder    │
//! ├──────────────┼───────────────────────────────┼─────────────────┤
//! │ page/limit   │ Offset                        │ strip cursors   │
//! │ clamping     │ Semi-open cursor              │ apply overrides │
//! │ cursors      │ Closed cursor (now anchor)    │ absolute URL    │
//! │              │ Simple cursor                 │                 │
//! └──────────────┴───────────────────────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Descriptor resolution, link strategies and URL rebuilding
pub mod pagination;

/// Collection renderer and count/data sources
pub mod render;

/// axum request extraction and error responses
pub mod http;

/// Service definitions (YAML/JSON)
pub mod loader;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use http::RequestContext;
pub use loader::{load_config, CollectionConfig, ServiceConfig};
pub use pagination::{
    resolve, DateExtractor, LinkName, LinkSet, LinkStrategy, PaginationDescriptor, RawQuery,
    StrategyKind, UrlContext,
};
pub use render::{Collection, CollectionRenderer, CountSource, DataSource, MemorySource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
