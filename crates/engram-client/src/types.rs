// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for responses from an Engram server.
//!
//! These mirror the REST surface; consumers never see internal store types.

use serde::Deserialize;

/// GET /health response.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    /// "ok" when the server is up.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// POST /api/v1/add response.
#[derive(Debug, Clone, Deserialize)]
pub struct AddOutcome {
    /// Id of the created memory.
    pub id: String,
    /// Always true on success.
    pub created: bool,
}

/// One recalled memory from search.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalledMemory {
    /// Memory id.
    pub id: String,
    /// Memory content.
    pub memory: String,
    /// Relevance score in (0, 1].
    pub similarity: f64,
    /// Stored metadata, verbatim.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-update timestamp.
    pub updated_at: String,
}

/// POST /api/v1/search/memories response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchOutcome {
    /// Ranked hits.
    pub results: Vec<RecalledMemory>,
    /// Server-side time spent, milliseconds.
    pub timing: u64,
    /// Number of returned results.
    pub total: usize,
}

/// The two-tier fact listing inside a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileFacts {
    /// Durable facts.
    #[serde(rename = "static")]
    pub static_facts: Vec<String>,
    /// Recent facts.
    pub dynamic: Vec<String>,
}

/// GET /api/v1/profile response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOutcome {
    /// Fact lists.
    pub profile: ProfileFacts,
    /// Present only when a query was supplied.
    #[serde(default)]
    pub search_results: Option<Vec<RecalledMemory>>,
}

/// POST /api/v1/memories/forget response.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgetOutcome {
    /// Echoed id selector, when one was supplied.
    #[serde(default)]
    pub id: Option<String>,
    /// Whether any row was marked forgotten.
    pub forgotten: bool,
}

/// One listed document.
#[derive(Debug, Clone, Deserialize)]
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

/// Pagination envelope from document listing.
#[derive(Debug, Clone, Deserialize)]
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

/// POST /api/v1/documents/list response.
#[derive(Debug, Clone, Deserialize)]
pub struct ListOutcome {
    /// The requested page, newest first.
    pub memories: Vec<ListedMemory>,
    /// Pagination envelope.
    pub pagination: Pagination,
}

/// POST /api/v1/documents/deleteBulk response.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteBulkOutcome {
    /// Rows removed.
    pub deleted: usize,
}

/// POST /api/v1/profile/promote response.
#[derive(Debug, Clone, Deserialize)]
pub struct PromoteOutcome {
    /// Whether any dynamic row was flipped.
    pub promoted: bool,
}

/// GET /api/v1/stats response.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsOutcome {
    /// Active memory count.
    pub memories: u64,
    /// Total fact rows.
    pub facts: u64,
    /// Sorted distinct container tags.
    pub containers: Vec<String>,
}

/// DELETE /api/v1/container/{tag} response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WipeOutcome {
    /// Always true on success.
    pub wiped: bool,
    /// The wiped container.
    pub container_tag: String,
}
