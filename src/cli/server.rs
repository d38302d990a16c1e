//! HTTP server mode serving configured collections

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::http::{ApiResponse, RequestContext};
use crate::loader::ServiceConfig;
use crate::render::{Collection, CollectionRenderer};
use crate::types::JsonValue;

/// Server configuration
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Collections to expose
    pub service: ServiceConfig,
}

impl ServerConfig {
    pub fn new(service: ServiceConfig) -> Self {
        Self { service }
    }
}

/// App state shared across handlers
struct AppState {
    config: ServerConfig,
    renderers: HashMap<String, CollectionRenderer<JsonValue>>,
}

impl AppState {
    fn new(config: ServerConfig) -> Self {
        let renderers = config
            .service
            .collections
            .iter()
            .map(|collection| (collection.name.clone(), collection.renderer()))
            .collect();
        Self { config, renderers }
    }
}

/// Build the router with all routes and layers
pub fn router(config: ServerConfig) -> Router {
    // Allow all origins; links are rebuilt from the request itself
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/collections", get(list_collections))
        .route("/collections/:name", get(get_collection))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(Arc::new(AppState::new(config)))
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig, port: u16) -> Result<()> {
    let app = router(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// List configured collections
async fn list_collections(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let collections: Vec<JsonValue> = state
        .config
        .service
        .collections
        .iter()
        .map(|collection| {
            json!({
                "name": collection.name,
                "description": collection.description,
                "strategy": collection.strategy,
                "date_field": collection.date_field,
                "count": collection.items.len(),
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "collections": collections }))),
    )
}

/// Render one page of a collection
async fn get_collection(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    request: RequestContext,
) -> Result<Collection<JsonValue>> {
    let renderer = state
        .renderers
        .get(&name)
        .ok_or_else(|| Error::not_found(&name))?;

    renderer.render(&request).await
}
