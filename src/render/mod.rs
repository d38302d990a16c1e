//! Collection rendering
//!
//! Orchestrates one paginated response: count, resolve, fetch, link.
//!
//! # Overview
//!
//! The render module provides:
//! - `CollectionRenderer` - Validates its collaborators and builds the envelope
//! - `CountSource` / `DataSource` - Async suppliers of the total and one page
//! - `MemorySource` - In-memory source for static datasets
//! - `Collection` - The `{ count, items, links }` envelope

mod memory;
mod source;

pub use memory::MemorySource;
pub use source::{CountSource, DataSource};

use crate::error::{Error, Result};
use crate::http::RequestContext;
use crate::pagination::{
    resolve, DateExtractor, LinkSet, LinkStrategy, PageView, StrategyKind,
};
use crate::types::now_millis;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Rendered collection envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection<T> {
    /// Total number of items in the collection
    pub count: u64,
    /// Items of the current page
    pub items: Vec<T>,
    /// Navigation links
    pub links: LinkSet,
}

impl<T: Serialize> IntoResponse for Collection<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Renders a paginated collection with one link strategy
pub struct CollectionRenderer<T> {
    strategy: StrategyKind,
    count_source: Option<Arc<dyn CountSource>>,
    data_source: Option<Arc<dyn DataSource<T>>>,
    date_extractor: Option<DateExtractor<T>>,
}

impl<T> Clone for CollectionRenderer<T> {
    fn clone(&self) -> Self {
        Self {
            strategy: self.strategy,
            count_source: self.count_source.clone(),
            data_source: self.data_source.clone(),
            date_extractor: self.date_extractor.clone(),
        }
    }
}

impl<T> fmt::Debug for CollectionRenderer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionRenderer")
            .field("strategy", &self.strategy)
            .field("count_source", &self.count_source.is_some())
            .field("data_source", &self.data_source.is_some())
            .field("date_extractor", &self.date_extractor)
            .finish()
    }
}

impl<T: Send + 'static> CollectionRenderer<T> {
    /// Create a renderer for the given strategy with no sources attached
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            count_source: None,
            data_source: None,
            date_extractor: None,
        }
    }

    /// Set the source of the total item count
    #[must_use]
    pub fn count_source(mut self, source: impl CountSource + 'static) -> Self {
        self.count_source = Some(Arc::new(source));
        self
    }

    /// Set the source of page items
    #[must_use]
    pub fn data_source(mut self, source: impl DataSource<T> + 'static) -> Self {
        self.data_source = Some(Arc::new(source));
        self
    }

    /// Set a shared source serving both the count and the items
    #[must_use]
    pub fn source<S>(mut self, source: S) -> Self
    where
        S: CountSource + DataSource<T> + 'static,
    {
        let source = Arc::new(source);
        self.count_source = Some(source.clone());
        self.data_source = Some(source);
        self
    }

    /// Set how item timestamps are read (required for cursor strategies)
    #[must_use]
    pub fn date_extractor(mut self, extractor: DateExtractor<T>) -> Self {
        self.date_extractor = Some(extractor);
        self
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Check that every collaborator the strategy needs is present
    fn check_contract(
        &self,
    ) -> Result<(&Arc<dyn CountSource>, &Arc<dyn DataSource<T>>, Option<&DateExtractor<T>>)> {
        let count_source = self
            .count_source
            .as_ref()
            .ok_or_else(|| Error::contract("count source is not set"))?;
        let data_source = self
            .data_source
            .as_ref()
            .ok_or_else(|| Error::contract("data source is not set"))?;

        if self.strategy.is_cursor() && self.date_extractor.is_none() {
            return Err(Error::contract(format!(
                "strategy '{}' requires a date extractor",
                self.strategy
            )));
        }

        Ok((count_source, data_source, self.date_extractor.as_ref()))
    }

    /// Render the collection for one request.
    ///
    /// The count is awaited first because the descriptor clamps `page`
    /// against it; items are then fetched with the resolved descriptor.
    /// Offset links do not depend on the items and are built alongside the
    /// fetch; cursor links are built from the fetched page.
    #[tracing::instrument(skip_all, fields(strategy = %self.strategy))]
    pub async fn render(&self, request: &RequestContext) -> Result<Collection<T>> {
        let (count_source, data_source, extractor) = self.check_contract()?;

        let count = count_source.count().await?;
        let pagination = resolve(&request.query, count);

        let (items, links) = match extractor {
            Some(extractor) if self.strategy.is_cursor() => {
                let items = data_source.fetch(pagination).await?;
                let view = extractor.page_view(&items, now_millis());
                let links = self.strategy.build(&request.url, &view, &pagination);
                (items, links)
            }
            _ => {
                let links = async {
                    self.strategy
                        .build(&request.url, &PageView::empty(now_millis()), &pagination)
                };
                let (items, links) = futures::join!(data_source.fetch(pagination), links);
                (items?, links)
            }
        };

        tracing::debug!(count, returned = items.len(), "Rendered collection");

        Ok(Collection {
            count: pagination.count,
            items,
            links,
        })
    }
}

#[cfg(test)]
mod tests;
