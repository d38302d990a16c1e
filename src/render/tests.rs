//! Tests for the render module

use super::*;
use crate::pagination::{LinkName, PaginationDescriptor};
use futures::future::{ready, Ready};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

fn count_of(n: u64) -> impl Fn() -> Ready<Result<u64>> + Send + Sync {
    move || ready(Ok(n))
}

fn numbers(total: u64) -> impl Fn(PaginationDescriptor) -> Ready<Result<Vec<u64>>> + Send + Sync {
    move |d| {
        let items = (d.offset..total).take(d.limit as usize).collect();
        ready(Ok(items))
    }
}

fn events(timestamps: &[i64]) -> MemorySource {
    let items = timestamps
        .iter()
        .map(|ts| json!({"id": format!("e{ts}"), "ts": ts}))
        .collect();
    MemorySource::with_timestamps(items, &DateExtractor::field("ts"))
}

fn timestamps_of(items: &[Value]) -> Vec<i64> {
    items.iter().map(|item| item["ts"].as_i64().unwrap()).collect()
}

fn query_of(link: &str) -> HashMap<String, String> {
    url::Url::parse(link)
        .unwrap()
        .query_pairs()
        .into_owned()
        .collect()
}

// ============================================================================
// Contract Tests
// ============================================================================

#[tokio::test]
async fn test_missing_count_source_fails_before_fetching() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let renderer = CollectionRenderer::<u64>::new(StrategyKind::Offset).data_source(
        move |_d: PaginationDescriptor| {
            counter.fetch_add(1, Ordering::SeqCst);
            ready(Ok::<Vec<u64>, Error>(vec![]))
        },
    );

    let request = RequestContext::parse("http://api.test/items").unwrap();
    let err = renderer.render(&request).await.unwrap_err();

    assert!(matches!(err, Error::Contract { .. }));
    assert_eq!(err.to_string(), "Contract error: count source is not set");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_data_source_fails_before_counting() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let renderer = CollectionRenderer::<u64>::new(StrategyKind::Offset).count_source(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        ready(Ok::<u64, Error>(3))
    });

    let request = RequestContext::parse("http://api.test/items").unwrap();
    let err = renderer.render(&request).await.unwrap_err();

    assert_eq!(err.to_string(), "Contract error: data source is not set");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cursor_strategy_requires_extractor() {
    let renderer = CollectionRenderer::<Value>::new(StrategyKind::ClosedCursor).source(events(&[10]));

    let request = RequestContext::parse("http://api.test/events").unwrap();
    let err = renderer.render(&request).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Contract error: strategy 'closed_cursor' requires a date extractor"
    );
}

// ============================================================================
// Source Error Propagation
// ============================================================================

#[tokio::test]
async fn test_count_source_error_propagates() {
    let renderer = CollectionRenderer::<u64>::new(StrategyKind::Offset)
        .count_source(|| ready(Err::<u64, Error>(Error::data_source("count query failed"))))
        .data_source(numbers(10));

    let request = RequestContext::parse("http://api.test/items").unwrap();
    let err = renderer.render(&request).await.unwrap_err();
    assert!(matches!(err, Error::Source { ref message } if message == "count query failed"));
}

#[tokio::test]
async fn test_data_source_error_propagates() {
    let renderer = CollectionRenderer::<Value>::new(StrategyKind::SemiOpenCursor)
        .count_source(count_of(4))
        .data_source(|_d: PaginationDescriptor| {
            ready(Err::<Vec<Value>, Error>(Error::data_source("timeout")))
        })
        .date_extractor(DateExtractor::field("ts"));

    let request = RequestContext::parse("http://api.test/events").unwrap();
    let err = renderer.render(&request).await.unwrap_err();
    assert!(matches!(err, Error::Source { .. }));
}

// ============================================================================
// Offset Rendering
// ============================================================================

#[tokio::test]
async fn test_offset_render_last_page() {
    let renderer = CollectionRenderer::<u64>::new(StrategyKind::Offset)
        .count_source(count_of(25))
        .data_source(numbers(25));

    let request = RequestContext::parse("http://api.test/items?page=3&limit=10").unwrap();
    let collection = renderer.render(&request).await.unwrap();

    assert_eq!(collection.count, 25);
    assert_eq!(collection.items, vec![20, 21, 22, 23, 24]);
    assert_eq!(
        collection.links.previous.as_deref(),
        Some("http://api.test/items?page=2&limit=10")
    );
    assert!(!collection.links.contains(LinkName::Next));
}

#[tokio::test]
async fn test_data_source_receives_clamped_descriptor() {
    let seen = Arc::new(Mutex::new(None));
    let recorder = seen.clone();
    let renderer = CollectionRenderer::<u64>::new(StrategyKind::Offset)
        .count_source(count_of(25))
        .data_source(move |d: PaginationDescriptor| {
            *recorder.lock().unwrap() = Some(d);
            ready(Ok::<Vec<u64>, Error>(vec![]))
        });

    let request = RequestContext::parse("http://api.test/items?page=99&limit=0").unwrap();
    renderer.render(&request).await.unwrap();

    let descriptor = seen.lock().unwrap().take().unwrap();
    assert_eq!(descriptor.limit, 1);
    assert_eq!(descriptor.page, 25);
    assert_eq!(descriptor.offset, 24);
}

#[tokio::test]
async fn test_offset_envelope_serialization() {
    let renderer = CollectionRenderer::<u64>::new(StrategyKind::Offset)
        .count_source(count_of(2))
        .data_source(numbers(2));

    let request = RequestContext::parse("http://api.test/items").unwrap();
    let collection = renderer.render(&request).await.unwrap();

    assert_eq!(
        serde_json::to_value(&collection).unwrap(),
        json!({
            "count": 2,
            "items": [0, 1],
            "links": {
                "first": "http://api.test/items?page=1&limit=10",
                "current": "http://api.test/items?page=1&limit=10",
                "last": "http://api.test/items?page=1&limit=10"
            }
        })
    );
}

// ============================================================================
// Cursor Rendering
// ============================================================================

#[tokio::test]
async fn test_closed_cursor_traversal() {
    let renderer = CollectionRenderer::<Value>::new(StrategyKind::ClosedCursor)
        .source(events(&[100, 90, 80, 70, 60, 50, 40, 30, 20, 10]))
        .date_extractor(DateExtractor::field("ts"));

    let request = RequestContext::parse("http://api.test/events?limit=3").unwrap();
    let first = renderer.render(&request).await.unwrap();
    assert_eq!(timestamps_of(&first.items), vec![100, 90, 80]);
    assert!(!first.links.contains(LinkName::Previous));
    assert_eq!(query_of(first.links.first.as_deref().unwrap())["before"], "101");

    let next = first.links.next.clone().unwrap();
    let second = renderer
        .render(&RequestContext::parse(&next).unwrap())
        .await
        .unwrap();
    assert_eq!(timestamps_of(&second.items), vec![70, 60, 50]);
    assert_eq!(second.count, 10);

    let previous = second.links.previous.clone().unwrap();
    assert_eq!(query_of(&previous)["since"], "70");
    assert_eq!(query_of(&previous)["now"], "101");

    let back = renderer
        .render(&RequestContext::parse(&previous).unwrap())
        .await
        .unwrap();
    assert_eq!(timestamps_of(&back.items), vec![100, 90, 80]);
    assert!(!back.links.contains(LinkName::Previous));
}

#[tokio::test]
async fn test_closed_cursor_ignores_items_newer_than_anchor() {
    let source = events(&[120, 100, 90, 80]);
    let renderer = CollectionRenderer::<Value>::new(StrategyKind::ClosedCursor)
        .source(source)
        .date_extractor(DateExtractor::field("ts"));

    let request = RequestContext::parse("http://api.test/events?limit=2&now=101").unwrap();
    let page = renderer.render(&request).await.unwrap();
    assert_eq!(timestamps_of(&page.items), vec![100, 90]);
    assert!(!page.links.contains(LinkName::Previous));
}

#[tokio::test]
async fn test_semi_open_last_link_reaches_oldest_page() {
    let renderer = CollectionRenderer::<Value>::new(StrategyKind::SemiOpenCursor)
        .source(events(&[60, 50, 40, 30, 20, 10]))
        .date_extractor(DateExtractor::field("ts"));

    let request = RequestContext::parse("http://api.test/feed?limit=2").unwrap();
    let first = renderer.render(&request).await.unwrap();
    assert!(!first.links.contains(LinkName::First));

    let last = first.links.last.clone().unwrap();
    let oldest = renderer
        .render(&RequestContext::parse(&last).unwrap())
        .await
        .unwrap();
    assert_eq!(timestamps_of(&oldest.items), vec![20, 10]);
    assert!(!oldest.links.contains(LinkName::Next));
    assert!(oldest.links.contains(LinkName::First));
}

#[tokio::test]
async fn test_simple_cursor_empty_window() {
    let renderer = CollectionRenderer::<Value>::new(StrategyKind::SimpleCursor)
        .source(events(&[30, 20, 10]))
        .date_extractor(DateExtractor::field("ts"));

    let request = RequestContext::parse("http://api.test/chat?since=30").unwrap();
    let collection = renderer.render(&request).await.unwrap();
    assert!(collection.items.is_empty());
    assert!(collection.links.is_empty());
    assert_eq!(collection.count, 3);
}

// ============================================================================
// MemorySource Tests
// ============================================================================

fn descriptor(query: &str, count: u64) -> PaginationDescriptor {
    resolve(&crate::pagination::RawQuery::from_query_str(query), count)
}

#[test]
fn test_memory_source_orders_newest_first() {
    let source = events(&[10, 30, 20]);
    let items = source.page(&descriptor("", 3));
    assert_eq!(timestamps_of(&items), vec![30, 20, 10]);
    assert_eq!(source.len(), 3);
    assert!(!source.is_empty());
}

#[test]
fn test_memory_source_windows() {
    let source = events(&[60, 50, 40, 30, 20, 10]);

    let items = source.page(&descriptor("limit=2&before=45", 6));
    assert_eq!(timestamps_of(&items), vec![40, 30]);

    let items = source.page(&descriptor("limit=2&since=20", 6));
    assert_eq!(timestamps_of(&items), vec![40, 30]);

    let items = source.page(&descriptor("limit=5&until=40", 6));
    assert_eq!(timestamps_of(&items), vec![40, 30, 20, 10]);

    let items = source.page(&descriptor("limit=2&since=0&before=60", 6));
    assert_eq!(timestamps_of(&items), vec![20, 10]);
}

#[test]
fn test_memory_source_offset_pages() {
    let source = MemorySource::new(vec![json!("a"), json!("b"), json!("c")]);
    let items = source.page(&descriptor("page=2&limit=2", 3));
    assert_eq!(items, vec![json!("c")]);

    // cursors are meaningless without timestamps
    let items = source.page(&descriptor("limit=2&before=1", 3));
    assert_eq!(items, vec![json!("a"), json!("b")]);
}

#[test]
fn test_memory_source_offset_only_ignores_cursors() {
    let source = events(&[60, 50, 40, 30, 20, 10]).offset_only();

    let items = source.page(&descriptor("page=2&limit=2&since=45", 6));
    assert_eq!(timestamps_of(&items), vec![40, 30]);

    let items = source.page(&descriptor("limit=2&before=25&now=70", 6));
    assert_eq!(timestamps_of(&items), vec![60, 50]);
}

#[test]
fn test_memory_source_undated_items_sort_last() {
    let items = vec![json!({"ts": 5}), json!({"id": "undated"}), json!({"ts": 9})];
    let source = MemorySource::with_timestamps(items, &DateExtractor::field("ts"));

    let all = source.page(&descriptor("", 3));
    assert_eq!(all[0]["ts"], 9);
    assert_eq!(all[2]["id"], "undated");

    let windowed = source.page(&descriptor("before=100", 3));
    assert_eq!(timestamps_of(&windowed), vec![9, 5]);
}
