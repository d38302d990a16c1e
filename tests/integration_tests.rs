//! Integration tests driving the HTTP server
//!
//! Tests the full end-to-end flow: YAML service definition → axum router →
//! rendered collection envelopes with navigable links

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use collection_links::cli::{router, ServerConfig};
use collection_links::loader::load_config_from_str;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

const SERVICE: &str = r"
collections:
  - name: products
    description: Catalogue
    strategy: offset
  - name: events
    strategy: closed_cursor
    date_field: ts
  - name: feed
    strategy: semi_open_cursor
    date_field: published_at
    items:
      - { id: f1, published_at: '2024-01-01T00:00:03Z' }
      - { id: f2, published_at: '2024-01-01T00:00:02Z' }
      - { id: f3, published_at: '2024-01-01T00:00:01Z' }
";

fn app() -> Router {
    let mut service = load_config_from_str(SERVICE).unwrap();
    for collection in &mut service.collections {
        match collection.name.as_str() {
            "products" => collection.items = (0..25).map(|i| json!({ "id": i })).collect(),
            "events" => {
                collection.items = (1..=10)
                    .map(|i| json!({ "id": format!("e{i}"), "ts": i * 10 }))
                    .collect();
            }
            _ => {}
        }
    }
    router(ServerConfig::new(service))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header("host", "api.test")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Turn an absolute link into the path and query to request next
fn follow(link: &Value) -> String {
    let url = url::Url::parse(link.as_str().unwrap()).unwrap();
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

fn ids(body: &Value) -> Vec<Value> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].clone())
        .collect()
}

// ============================================================================
// Service Endpoints
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get(&app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_list_collections() {
    let (status, body) = get(&app(), "/collections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let collections = body["data"]["collections"].as_array().unwrap();
    assert_eq!(collections.len(), 3);
    assert_eq!(collections[0]["name"], "products");
    assert_eq!(collections[0]["strategy"], "offset");
    assert_eq!(collections[0]["count"], 25);
    assert_eq!(collections[1]["strategy"], "closed_cursor");
}

#[tokio::test]
async fn test_unknown_collection_is_404() {
    let (status, body) = get(&app(), "/collections/orders").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"success": false, "error": "Collection 'orders' not found"})
    );
}

// ============================================================================
// Offset Collections
// ============================================================================

#[tokio::test]
async fn test_offset_collection_pages() {
    let app = app();
    let (status, body) = get(&app, "/collections/products?page=3&limit=10&sort=id").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 25);
    assert_eq!(ids(&body), (20..25).map(|i| json!(i)).collect::<Vec<_>>());
    assert_eq!(
        body["links"],
        json!({
            "first": "http://api.test/collections/products?page=1&limit=10&sort=id",
            "previous": "http://api.test/collections/products?page=2&limit=10&sort=id",
            "current": "http://api.test/collections/products?page=3&limit=10&sort=id",
            "last": "http://api.test/collections/products?page=3&limit=10&sort=id"
        })
    );
}

#[tokio::test]
async fn test_offset_collection_clamps_malformed_params() {
    let (status, body) = get(&app(), "/collections/products?page=abc&limit=-4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![json!(0)]);
    assert_eq!(
        body["links"]["next"],
        "http://api.test/collections/products?page=2&limit=1"
    );
    assert_eq!(
        body["links"]["last"],
        "http://api.test/collections/products?page=25&limit=1"
    );
}

// ============================================================================
// Cursor Collections
// ============================================================================

#[tokio::test]
async fn test_closed_cursor_walk() {
    let app = app();

    let (_, first) = get(&app, "/collections/events?limit=4").await;
    assert_eq!(ids(&first), vec!["e10", "e9", "e8", "e7"]);
    assert_eq!(
        first["links"]["next"],
        "http://api.test/collections/events?limit=4&before=70&now=101"
    );
    assert!(first["links"].get("previous").is_none());

    let (_, second) = get(&app, &follow(&first["links"]["next"])).await;
    assert_eq!(ids(&second), vec!["e6", "e5", "e4", "e3"]);
    assert_eq!(
        second["links"]["previous"],
        "http://api.test/collections/events?limit=4&now=101&since=60"
    );

    let (_, third) = get(&app, &follow(&second["links"]["next"])).await;
    assert_eq!(ids(&third), vec!["e2", "e1"]);
    assert!(third["links"].get("next").is_none());
    assert_eq!(
        third["links"]["last"],
        "http://api.test/collections/events?limit=4&now=101&since=0&before=20"
    );

    let (_, back) = get(&app, &follow(&third["links"]["previous"])).await;
    assert_eq!(ids(&back), vec!["e6", "e5", "e4", "e3"]);
}

#[tokio::test]
async fn test_semi_open_cursor_with_rfc3339_dates() {
    let app = app();

    let (status, first) = get(&app, "/collections/feed?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&first), vec!["f1", "f2"]);
    assert!(first["links"].get("first").is_none());

    // 2024-01-01T00:00:02Z
    assert_eq!(
        first["links"]["next"],
        "http://api.test/collections/feed?limit=2&before=1704067202000"
    );

    let (_, older) = get(&app, &follow(&first["links"]["next"])).await;
    assert_eq!(ids(&older), vec!["f3"]);
    assert!(older["links"].get("next").is_none());
    assert_eq!(
        older["links"]["first"],
        "http://api.test/collections/feed?limit=2&until=1704067201000"
    );
}
