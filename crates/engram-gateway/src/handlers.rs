// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the Engram REST API.
//!
//! Every endpoint has an explicit request/response schema; field aliases
//! (`q`/`query`, `containerTag`/`containerTags`) express the flexible wire
//! shapes before anything reaches the core. Validation errors map to 400,
//! storage failures to 500.

use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use engram_core::{EngramError, ScoredMemory};
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

/// Container tag applied when a request names none.
const DEFAULT_CONTAINER_TAG: &str = "default";

/// Default result count for memory search.
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Default page size for document listing.
const DEFAULT_LIST_LIMIT: u64 = 100;

/// Error response body shared by all endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error description.
    pub error: String,
}

/// Wrapper turning [`EngramError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(EngramError);

impl From<EngramError> for ApiError {
    fn from(err: EngramError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

/// Resolve the container tag from the `containerTag`/`containerTags` pair.
fn resolve_tag(tag: Option<String>, tags: Option<&[String]>) -> String {
    tag.filter(|t| !t.is_empty())
        .or_else(|| tags.and_then(|t| t.first().cloned()))
        .unwrap_or_else(|| DEFAULT_CONTAINER_TAG.to_string())
}

// --- GET /health ---

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// --- POST /api/v1/add ---

/// Request body for POST /api/v1/add.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    /// Memory text. Required; rejected with 400 when missing or empty.
    #[serde(default)]
    pub content: Option<String>,
    /// Target container.
    #[serde(default)]
    pub container_tag: Option<String>,
    /// Alternative plural spelling; the first entry is used.
    #[serde(default)]
    pub container_tags: Option<Vec<String>>,
    /// Opaque metadata, stored verbatim.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Caller-supplied identifier, never interpreted.
    #[serde(default)]
    pub custom_id: Option<String>,
}

/// Response body for POST /api/v1/add.
#[derive(Debug, Serialize)]
pub struct AddResponse {
    /// Id of the created memory.
    pub id: String,
    /// Always true on success.
    pub created: bool,
}

/// POST /api/v1/add
pub async fn post_add(
    State(state): State<GatewayState>,
    Json(body): Json<AddRequest>,
) -> Result<Json<AddResponse>, ApiError> {
    let tag = resolve_tag(body.container_tag, body.container_tags.as_deref());
    let content = body.content.unwrap_or_default();

    let id = state
        .ingestor
        .ingest(&tag, &content, body.metadata, body.custom_id)
        .await?;

    Ok(Json(AddResponse { id, created: true }))
}

// --- POST /api/v1/search/memories ---

/// Request body for POST /api/v1/search/memories.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Query text. `q` and `query` are interchangeable.
    #[serde(default, alias = "query")]
    pub q: Option<String>,
    /// Target container.
    #[serde(default)]
    pub container_tag: Option<String>,
    /// Alternative plural spelling; all entries form a union scope.
    #[serde(default)]
    pub container_tags: Option<Vec<String>>,
    /// Maximum results to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One search hit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Memory id.
    pub id: String,
    /// Memory content.
    pub memory: String,
    /// Relevance score in (0.05, 1].
    pub similarity: f64,
    /// Stored metadata, verbatim.
    pub metadata: Option<serde_json::Value>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-update timestamp.
    pub updated_at: String,
}

impl From<ScoredMemory> for SearchHit {
    fn from(scored: ScoredMemory) -> Self {
        Self {
            id: scored.memory.id,
            memory: scored.memory.content,
            similarity: scored.score,
            metadata: scored.memory.metadata,
            created_at: scored.memory.created_at,
            updated_at: scored.memory.updated_at,
        }
    }
}

/// Response body for POST /api/v1/search/memories.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Ranked hits above the relevance floor.
    pub results: Vec<SearchHit>,
    /// Wall-clock time spent, in milliseconds.
    pub timing: u64,
    /// Number of returned results.
    pub total: usize,
}

/// POST /api/v1/search/memories
pub async fn post_search(
    State(state): State<GatewayState>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let started = Instant::now();

    let mut tags = body.container_tags.unwrap_or_default();
    if let Some(tag) = body.container_tag.filter(|t| !t.is_empty()) {
        tags.insert(0, tag);
    }
    if tags.is_empty() {
        tags.push(DEFAULT_CONTAINER_TAG.to_string());
    }

    let query = body.q.unwrap_or_default();
    let limit = body.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    let results = state.retriever.search(&tags, &query, limit).await?;
    let results: Vec<SearchHit> = results.into_iter().map(SearchHit::from).collect();

    Ok(Json(SearchResponse {
        total: results.len(),
        timing: started.elapsed().as_millis() as u64,
        results,
    }))
}

// --- GET /api/v1/profile ---

/// Query parameters for GET /api/v1/profile.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileParams {
    /// Target container.
    #[serde(default)]
    pub container_tag: Option<String>,
    /// Optional search query to augment the profile.
    #[serde(default)]
    pub q: Option<String>,
    /// Score floor for the augmented search (default 0.1).
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// The two-tier fact listing.
#[derive(Debug, Serialize)]
pub struct ProfileFacts {
    /// Promoted, durable facts.
    #[serde(rename = "static")]
    pub static_facts: Vec<String>,
    /// Recently extracted facts.
    pub dynamic: Vec<String>,
}

/// Response body for GET /api/v1/profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Fact lists, always present.
    pub profile: ProfileFacts,
    /// Search hits, only when a query was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_results: Option<Vec<SearchHit>>,
}

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<GatewayState>,
    Query(params): Query<ProfileParams>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let tag = resolve_tag(params.container_tag, None);

    let view = state
        .retriever
        .profile(&tag, params.q.as_deref(), params.threshold)
        .await?;

    Ok(Json(ProfileResponse {
        profile: ProfileFacts {
            static_facts: view.static_facts,
            dynamic: view.dynamic_facts,
        },
        search_results: view
            .search_results
            .map(|hits| hits.into_iter().map(SearchHit::from).collect()),
    }))
}

// --- POST /api/v1/memories/forget ---

/// Request body for POST /api/v1/memories/forget.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgetRequest {
    /// Memory id to forget. Mutually exclusive with `content`.
    #[serde(default)]
    pub id: Option<String>,
    /// Exact content to forget (bulk). Mutually exclusive with `id`.
    #[serde(default)]
    pub content: Option<String>,
    /// Target container.
    #[serde(default)]
    pub container_tag: Option<String>,
}

/// Response body for POST /api/v1/memories/forget.
#[derive(Debug, Serialize)]
pub struct ForgetResponse {
    /// The id selector, echoed back when one was supplied.
    pub id: Option<String>,
    /// Whether any row was marked forgotten.
    pub forgotten: bool,
}

/// POST /api/v1/memories/forget
pub async fn post_forget(
    State(state): State<GatewayState>,
    Json(body): Json<ForgetRequest>,
) -> Result<Json<ForgetResponse>, ApiError> {
    let tag = resolve_tag(body.container_tag, None);

    let forgotten = state
        .maintenance
        .forget(&tag, body.id.as_deref(), body.content.as_deref())
        .await?;

    Ok(Json(ForgetResponse {
        id: body.id,
        forgotten,
    }))
}

// --- POST /api/v1/documents/list ---

/// Request body for POST /api/v1/documents/list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    /// Containers to list; union scope.
    #[serde(default)]
    pub container_tags: Option<Vec<String>>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<u64>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u64>,
}

/// One listed document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedMemory {
    /// Memory id.
    pub id: String,
    /// Memory content.
    pub content: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-update timestamp.
    pub updated_at: String,
}

/// Pagination envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Total active memories in scope.
    pub total: u64,
    /// ceil(total / limit).
    pub total_pages: u64,
}

/// Response body for POST /api/v1/documents/list.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// The page of active memories, newest first.
    pub memories: Vec<ListedMemory>,
    /// Pagination envelope.
    pub pagination: Pagination,
}

/// POST /api/v1/documents/list
pub async fn post_list(
    State(state): State<GatewayState>,
    Json(body): Json<ListRequest>,
) -> Result<Json<ListResponse>, ApiError> {
    let tags = match body.container_tags {
        Some(tags) if !tags.is_empty() => tags,
        _ => vec![DEFAULT_CONTAINER_TAG.to_string()],
    };
    let limit = body.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(1);
    let page = body.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;

    let (records, total) = engram_storage::queries::memories::list_active(
        &state.db,
        &tags,
        limit as i64,
        offset as i64,
    )
    .await?;

    let memories = records
        .into_iter()
        .map(|r| ListedMemory {
            id: r.id,
            content: r.content,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
        .collect();

    Ok(Json(ListResponse {
        memories,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        },
    }))
}

// --- POST /api/v1/documents/deleteBulk ---

/// Request body for POST /api/v1/documents/deleteBulk.
#[derive(Debug, Deserialize)]
pub struct DeleteBulkRequest {
    /// Ids to hard-delete. Required, non-empty.
    #[serde(default)]
    pub ids: Option<Vec<String>>,
}

/// Response body for POST /api/v1/documents/deleteBulk.
#[derive(Debug, Serialize)]
pub struct DeleteBulkResponse {
    /// Rows removed.
    pub deleted: usize,
}

/// POST /api/v1/documents/deleteBulk
pub async fn post_delete_bulk(
    State(state): State<GatewayState>,
    Json(body): Json<DeleteBulkRequest>,
) -> Result<Json<DeleteBulkResponse>, ApiError> {
    let ids = body.ids.unwrap_or_default();
    let deleted = state.maintenance.bulk_delete(&ids).await?;
    Ok(Json(DeleteBulkResponse { deleted }))
}

// --- POST /api/v1/profile/promote ---

/// Request body for POST /api/v1/profile/promote.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteRequest {
    /// Target container.
    #[serde(default)]
    pub container_tag: Option<String>,
    /// Exact fact text to promote.
    #[serde(default)]
    pub fact: Option<String>,
}

/// Response body for POST /api/v1/profile/promote.
#[derive(Debug, Serialize)]
pub struct PromoteResponse {
    /// Whether any dynamic row was flipped.
    pub promoted: bool,
}

/// POST /api/v1/profile/promote
pub async fn post_promote(
    State(state): State<GatewayState>,
    Json(body): Json<PromoteRequest>,
) -> Result<Json<PromoteResponse>, ApiError> {
    let tag = resolve_tag(body.container_tag, None);
    let fact = body.fact.unwrap_or_default();
    if fact.trim().is_empty() {
        return Err(EngramError::Validation("fact is required".to_string()).into());
    }

    let promoted = engram_storage::queries::facts::promote(&state.db, &tag, &fact).await?;
    Ok(Json(PromoteResponse { promoted }))
}

// --- GET /api/v1/stats ---

/// Response body for GET /api/v1/stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Active memory count across all containers.
    pub memories: u64,
    /// Total fact rows across all containers.
    pub facts: u64,
    /// Sorted distinct container tags.
    pub containers: Vec<String>,
}

/// GET /api/v1/stats
pub async fn get_stats(
    State(state): State<GatewayState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.maintenance.stats().await?;
    Ok(Json(StatsResponse {
        memories: stats.memories,
        facts: stats.facts,
        containers: stats.containers,
    }))
}

// --- DELETE /api/v1/container/{tag} ---

/// Response body for DELETE /api/v1/container/{tag}.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WipeResponse {
    /// Always true on success.
    pub wiped: bool,
    /// The wiped container.
    pub container_tag: String,
}

/// DELETE /api/v1/container/{tag}
pub async fn delete_container(
    State(state): State<GatewayState>,
    Path(tag): Path<String>,
) -> Result<Json<WipeResponse>, ApiError> {
    state.maintenance.wipe_container(&tag).await?;
    Ok(Json(WipeResponse {
        wiped: true,
        container_tag: tag,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_request_accepts_minimal_body() {
        let req: AddRequest = serde_json::from_str(r#"{"content": "hello"}"#).unwrap();
        assert_eq!(req.content.as_deref(), Some("hello"));
        assert!(req.container_tag.is_none());
        assert!(req.metadata.is_none());
    }

    #[test]
    fn add_request_accepts_container_tags_array() {
        let req: AddRequest = serde_json::from_str(
            r#"{"content": "x", "containerTags": ["work"], "customId": "c-1"}"#,
        )
        .unwrap();
        assert_eq!(req.container_tags.as_deref(), Some(&["work".to_string()][..]));
        assert_eq!(req.custom_id.as_deref(), Some("c-1"));
    }

    #[test]
    fn search_request_q_and_query_are_interchangeable() {
        let via_q: SearchRequest = serde_json::from_str(r#"{"q": "dark mode"}"#).unwrap();
        assert_eq!(via_q.q.as_deref(), Some("dark mode"));

        let via_query: SearchRequest =
            serde_json::from_str(r#"{"query": "dark mode"}"#).unwrap();
        assert_eq!(via_query.q.as_deref(), Some("dark mode"));
    }

    #[test]
    fn resolve_tag_prefers_singular_then_plural_then_default() {
        assert_eq!(
            resolve_tag(Some("work".into()), Some(&["home".to_string()])),
            "work"
        );
        assert_eq!(resolve_tag(None, Some(&["home".to_string()])), "home");
        assert_eq!(resolve_tag(None, None), "default");
        assert_eq!(resolve_tag(Some(String::new()), None), "default");
    }

    #[test]
    fn profile_facts_serialize_with_static_keyword_key() {
        let facts = ProfileFacts {
            static_facts: vec!["a".into()],
            dynamic: vec!["b".into()],
        };
        let json = serde_json::to_string(&facts).unwrap();
        assert!(json.contains("\"static\":[\"a\"]"));
        assert!(json.contains("\"dynamic\":[\"b\"]"));
    }

    #[test]
    fn profile_response_omits_absent_search_results() {
        let response = ProfileResponse {
            profile: ProfileFacts {
                static_facts: vec![],
                dynamic: vec![],
            },
            search_results: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("searchResults"));
    }

    #[test]
    fn search_hit_serializes_camel_case_timestamps() {
        let hit = SearchHit {
            id: "m1".into(),
            memory: "text".into(),
            similarity: 0.42,
            metadata: None,
            created_at: "2026-03-01T00:00:00.000Z".into(),
            updated_at: "2026-03-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_string(&hit).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"similarity\":0.42"));
    }

    #[test]
    fn pagination_serializes_total_pages_camel_case() {
        let p = Pagination {
            page: 1,
            limit: 100,
            total: 250,
            total_pages: 3,
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"totalPages\":3"));
    }

    #[test]
    fn delete_bulk_request_tolerates_missing_ids() {
        let req: DeleteBulkRequest = serde_json::from_str("{}").unwrap();
        assert!(req.ids.is_none());
    }
}
