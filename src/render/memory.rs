//! In-memory collection source
//!
//! Serves a static list of JSON items. Used by the CLI server to expose
//! datasets loaded from configuration.

use super::source::{CountSource, DataSource};
use crate::error::Result;
use crate::pagination::{DateExtractor, PaginationDescriptor};
use crate::types::{JsonValue, Timestamp};
use async_trait::async_trait;
use std::sync::Arc;

/// Static, newest-first list of JSON items
#[derive(Debug, Clone)]
pub struct MemorySource {
    /// Items paired with their timestamps, newest first
    entries: Arc<Vec<(Option<Timestamp>, JsonValue)>>,
    /// Whether cursor parameters select a window instead of `offset`
    windowed: bool,
}

impl MemorySource {
    /// Serve items in the given order; only offset paging is meaningful
    pub fn new(items: Vec<JsonValue>) -> Self {
        Self {
            entries: Arc::new(items.into_iter().map(|item| (None, item)).collect()),
            windowed: false,
        }
    }

    /// Serve items ordered newest first by the extracted timestamp.
    ///
    /// Items without a timestamp sort after every dated item and never fall
    /// inside a cursor window.
    pub fn with_timestamps(items: Vec<JsonValue>, extractor: &DateExtractor<JsonValue>) -> Self {
        let mut entries: Vec<_> = items
            .into_iter()
            .map(|item| (extractor.extract(&item), item))
            .collect();
        entries.sort_by(|(a, _), (b, _)| b.cmp(a));

        Self {
            entries: Arc::new(entries),
            windowed: true,
        }
    }

    /// Keep the newest-first order but page by `offset` only, ignoring any
    /// cursor parameters on the request
    #[must_use]
    pub fn offset_only(mut self) -> Self {
        self.windowed = false;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Select the page described by `pagination`.
    ///
    /// Without any cursor the page is `limit` items starting at `offset`.
    /// With cursors the items are first narrowed to the window
    /// (`ts < now`, `ts < before`, `ts <= until`, `ts > since`); a `since`
    /// cursor takes the `limit` items closest to that lower bound, otherwise
    /// the newest `limit` items of the window are returned.
    pub fn page(&self, pagination: &PaginationDescriptor) -> Vec<JsonValue> {
        let limit = pagination.limit as usize;
        let windowed = self.windowed
            && (pagination.has_cursor() || pagination.until.is_some() || pagination.now.is_some());

        if !windowed {
            return self
                .entries
                .iter()
                .skip(pagination.offset as usize)
                .take(limit)
                .map(|(_, item)| item.clone())
                .collect();
        }

        let window: Vec<&JsonValue> = self
            .entries
            .iter()
            .filter_map(|(ts, item)| {
                let ts = (*ts)?;
                let inside = pagination.now.map_or(true, |now| ts < now)
                    && pagination.before.map_or(true, |before| ts < before)
                    && pagination.until.map_or(true, |until| ts <= until)
                    && pagination.since.map_or(true, |since| ts > since);
                inside.then_some(item)
            })
            .collect();

        let selected = if pagination.since.is_some() {
            &window[window.len().saturating_sub(limit)..]
        } else {
            &window[..window.len().min(limit)]
        };

        selected.iter().map(|item| (*item).clone()).collect()
    }
}

#[async_trait]
impl CountSource for MemorySource {
    async fn count(&self) -> Result<u64> {
        Ok(self.entries.len() as u64)
    }
}

#[async_trait]
impl DataSource<JsonValue> for MemorySource {
    async fn fetch(&self, pagination: PaginationDescriptor) -> Result<Vec<JsonValue>> {
        let items = self.page(&pagination);
        tracing::trace!(returned = items.len(), "Served page from memory");
        Ok(items)
    }
}
