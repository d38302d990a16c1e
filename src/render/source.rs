//! Count and data source traits
//!
//! The renderer never talks to a store itself; it asks a [`CountSource`] for
//! the total and a [`DataSource`] for one page of items. Async closures
//! implement both traits directly.

use crate::error::Result;
use crate::pagination::PaginationDescriptor;
use async_trait::async_trait;
use std::future::Future;

/// Supplies the total number of items in the collection
#[async_trait]
pub trait CountSource: Send + Sync {
    async fn count(&self) -> Result<u64>;
}

/// Supplies the items of one page, newest first for cursor strategies
#[async_trait]
pub trait DataSource<T>: Send + Sync {
    async fn fetch(&self, pagination: PaginationDescriptor) -> Result<Vec<T>>;
}

#[async_trait]
impl<F, Fut> CountSource for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<u64>> + Send,
{
    async fn count(&self) -> Result<u64> {
        (self)().await
    }
}

#[async_trait]
impl<T, F, Fut> DataSource<T> for F
where
    T: Send + 'static,
    F: Fn(PaginationDescriptor) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>>> + Send,
{
    async fn fetch(&self, pagination: PaginationDescriptor) -> Result<Vec<T>> {
        (self)(pagination).await
    }
}
