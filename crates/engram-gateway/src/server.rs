// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, CORS, and shared state, and serves until the shutdown
//! token fires.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use engram_core::EngramError;
use engram_memory::{Ingestor, Maintenance, Retriever};
use engram_storage::Database;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Shared single-writer database handle.
    pub db: Arc<Database>,
    /// Create path.
    pub ingestor: Arc<Ingestor>,
    /// Search and profile.
    pub retriever: Arc<Retriever>,
    /// Forget, bulk delete, stats, wipe.
    pub maintenance: Arc<Maintenance>,
}

impl GatewayState {
    /// Build the full service stack over one database handle.
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            ingestor: Arc::new(Ingestor::new(db.clone())),
            retriever: Arc::new(Retriever::new(db.clone())),
            maintenance: Arc::new(Maintenance::new(db.clone())),
            db,
        }
    }
}

/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Assemble the API router.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/v1/add", post(handlers::post_add))
        .route("/api/v1/search/memories", post(handlers::post_search))
        .route("/api/v1/profile", get(handlers::get_profile))
        .route("/api/v1/memories/forget", post(handlers::post_forget))
        .route("/api/v1/documents/list", post(handlers::post_list))
        .route("/api/v1/documents/deleteBulk", post(handlers::post_delete_bulk))
        .route("/api/v1/profile/promote", post(handlers::post_promote))
        .route("/api/v1/stats", get(handlers::get_stats))
        .route("/api/v1/container/{tag}", delete(handlers::delete_container))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), EngramError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| EngramError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| EngramError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        build_router(GatewayState::new(db))
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok_and_version() {
        let app = test_router().await;
        let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn add_then_search_round_trip() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/add",
                serde_json::json!({"content": "I prefer dark mode", "containerTag": "work"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["created"], true);
        assert!(body["id"].is_string());

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/search/memories",
                serde_json::json!({"q": "dark mode", "containerTag": "work"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["results"][0]["memory"], "I prefer dark mode");
        assert!(body["results"][0]["similarity"].as_f64().unwrap() > 0.05);
        assert!(body["timing"].is_u64());
    }

    #[tokio::test]
    async fn add_without_content_is_a_400() {
        let app = test_router().await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/add",
                serde_json::json!({"containerTag": "work"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("content"));
    }

    #[tokio::test]
    async fn search_defaults_to_the_default_container() {
        let app = test_router().await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/add",
                serde_json::json!({"content": "dark mode note"}),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/search/memories",
                serde_json::json!({"query": "dark mode"}),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn profile_promote_scenario() {
        let app = test_router().await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/add",
                serde_json::json!({
                    "content": "I always drink green tea in the morning",
                    "containerTag": "work"
                }),
            ))
            .await
            .unwrap();

        // The habit sentence lands as a dynamic fact.
        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/v1/profile?containerTag=work"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body["profile"]["dynamic"][0],
            "I always drink green tea in the morning"
        );
        assert!(body["profile"]["static"].as_array().unwrap().is_empty());
        assert!(body.get("searchResults").is_none());

        // Promote it.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/profile/promote",
                serde_json::json!({
                    "containerTag": "work",
                    "fact": "I always drink green tea in the morning"
                }),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["promoted"], true);

        // Now static, no longer dynamic.
        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/v1/profile?containerTag=work"))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(
            body["profile"]["static"][0],
            "I always drink green tea in the morning"
        );
        assert!(body["profile"]["dynamic"].as_array().unwrap().is_empty());

        // Second promote has nothing left to flip.
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/profile/promote",
                serde_json::json!({
                    "containerTag": "work",
                    "fact": "I always drink green tea in the morning"
                }),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["promoted"], false);
    }

    #[tokio::test]
    async fn profile_with_query_includes_search_results() {
        let app = test_router().await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/add",
                serde_json::json!({"content": "I prefer dark mode", "containerTag": "work"}),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(empty_request(
                "GET",
                "/api/v1/profile?containerTag=work&q=dark%20mode",
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["searchResults"][0]["memory"], "I prefer dark mode");
    }

    #[tokio::test]
    async fn forget_hides_memory_from_search_and_stats() {
        let app = test_router().await;
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/add",
                serde_json::json!({"content": "dark mode note", "containerTag": "work"}),
            ))
            .await
            .unwrap();
        let id = json_body(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/memories/forget",
                serde_json::json!({"id": id, "containerTag": "work"}),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["forgotten"], true);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/search/memories",
                serde_json::json!({"q": "dark mode", "containerTag": "work"}),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 0);

        let response = app.oneshot(empty_request("GET", "/api/v1/stats")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["memories"], 0);
    }

    #[tokio::test]
    async fn forget_with_neither_selector_is_a_400() {
        let app = test_router().await;
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/memories/forget",
                serde_json::json!({"containerTag": "work"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_paginates_without_repeats() {
        let app = test_router().await;
        for i in 0..5 {
            app.clone()
                .oneshot(json_request(
                    "POST",
                    "/api/v1/add",
                    serde_json::json!({"content": format!("note number {i}"), "containerTag": "work"}),
                ))
                .await
                .unwrap();
        }

        let mut seen = Vec::new();
        for page in 1..=3 {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/v1/documents/list",
                    serde_json::json!({"containerTags": ["work"], "limit": 2, "page": page}),
                ))
                .await
                .unwrap();
            let body = json_body(response).await;
            assert_eq!(body["pagination"]["total"], 5);
            assert_eq!(body["pagination"]["totalPages"], 3);
            assert_eq!(body["pagination"]["page"], page);
            let memories = body["memories"].as_array().unwrap().clone();
            assert!(memories.len() <= 2);
            for m in memories {
                let id = m["id"].as_str().unwrap().to_string();
                assert!(!seen.contains(&id), "no item repeated across pages");
                seen.push(id);
            }
        }
        assert_eq!(seen.len(), 5);
    }

    #[tokio::test]
    async fn delete_bulk_requires_non_empty_ids() {
        let app = test_router().await;
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/deleteBulk",
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/deleteBulk",
                serde_json::json!({"ids": []}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_bulk_reports_removed_count() {
        let app = test_router().await;
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/add",
                serde_json::json!({"content": "short lived", "containerTag": "work"}),
            ))
            .await
            .unwrap();
        let id = json_body(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/deleteBulk",
                serde_json::json!({"ids": [id, "no-such-id"]}),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["deleted"], 1);
    }

    #[tokio::test]
    async fn wipe_container_clears_memories_and_facts() {
        let app = test_router().await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/add",
                serde_json::json!({
                    "content": "I prefer dark mode",
                    "containerTag": "scratch"
                }),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/api/v1/container/scratch"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["wiped"], true);
        assert_eq!(body["containerTag"], "scratch");

        let response = app.oneshot(empty_request("GET", "/api/v1/stats")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["memories"], 0);
        assert_eq!(body["facts"], 0);
        assert!(body["containers"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn partition_isolation_over_http() {
        let app = test_router().await;
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/add",
                serde_json::json!({"content": "dark mode note", "containerTag": "alpha"}),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/search/memories",
                serde_json::json!({"q": "dark mode", "containerTag": "beta"}),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 0);
    }
}
