// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consumer-side client for the Engram memory store.
//!
//! One [`MemoryService`] trait covers the whole REST surface, with two
//! backing variants selected at construction time: [`self_hosted`] talks to
//! a local Engram server, [`hosted`] to a managed endpoint with an API key.
//! Callers hold a `Box<dyn MemoryService>` and never learn which variant is
//! active.
//!
//! Transport failures surface as [`EngramError::Transport`]; consumers are
//! expected to degrade gracefully (see [`probe`]) rather than crash.

pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use engram_core::EngramError;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::types::{
    AddOutcome, DeleteBulkOutcome, ForgetOutcome, Health, ListOutcome, ProfileOutcome,
    PromoteOutcome, SearchOutcome, StatsOutcome, WipeOutcome,
};

/// Base URL of the managed Engram service.
const HOSTED_API_BASE_URL: &str = "https://api.engram.dev";

/// Request timeout for all client calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The full memory surface, one method per REST operation.
#[async_trait]
pub trait MemoryService: Send + Sync {
    /// GET /health
    async fn health(&self) -> Result<Health, EngramError>;

    /// POST /api/v1/add
    async fn add(
        &self,
        tag: &str,
        content: &str,
        metadata: Option<serde_json::Value>,
        custom_id: Option<&str>,
    ) -> Result<AddOutcome, EngramError>;

    /// POST /api/v1/search/memories
    async fn search(
        &self,
        tag: &str,
        query: &str,
        limit: usize,
    ) -> Result<SearchOutcome, EngramError>;

    /// GET /api/v1/profile
    async fn profile(
        &self,
        tag: &str,
        query: Option<&str>,
        threshold: Option<f64>,
    ) -> Result<ProfileOutcome, EngramError>;

    /// POST /api/v1/memories/forget
    async fn forget(
        &self,
        tag: &str,
        id: Option<&str>,
        content: Option<&str>,
    ) -> Result<ForgetOutcome, EngramError>;

    /// POST /api/v1/documents/list
    async fn list(
        &self,
        tags: &[String],
        limit: u64,
        page: u64,
    ) -> Result<ListOutcome, EngramError>;

    /// POST /api/v1/documents/deleteBulk
    async fn delete_bulk(&self, ids: &[String]) -> Result<DeleteBulkOutcome, EngramError>;

    /// POST /api/v1/profile/promote
    async fn promote(&self, tag: &str, fact: &str) -> Result<PromoteOutcome, EngramError>;

    /// GET /api/v1/stats
    async fn stats(&self) -> Result<StatsOutcome, EngramError>;

    /// DELETE /api/v1/container/{tag}
    async fn wipe_container(&self, tag: &str) -> Result<WipeOutcome, EngramError>;
}

/// Connect to a self-hosted Engram server at `base_url`.
pub fn self_hosted(base_url: &str) -> Result<Box<dyn MemoryService>, EngramError> {
    Ok(Box::new(RestMemoryService::new(base_url, None)?))
}

/// Connect to the managed Engram service with an API key.
pub fn hosted(api_key: &str) -> Result<Box<dyn MemoryService>, EngramError> {
    Ok(Box::new(RestMemoryService::new(
        HOSTED_API_BASE_URL,
        Some(api_key),
    )?))
}

/// Check whether the service is reachable and healthy.
///
/// Logs a warning and returns false on any failure so callers can disable
/// the memory feature instead of crashing.
pub async fn probe(service: &dyn MemoryService) -> bool {
    match service.health().await {
        Ok(health) => health.status == "ok",
        Err(e) => {
            warn!(error = %e, "memory service unreachable, disabling memory features");
            false
        }
    }
}

/// Reqwest-backed implementation shared by both variants.
///
/// The hosted variant differs only in its base URL and the `x-api-key`
/// default header installed at construction.
struct RestMemoryService {
    client: reqwest::Client,
    base_url: String,
}

impl RestMemoryService {
    fn new(base_url: &str, api_key: Option<&str>) -> Result<Self, EngramError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            headers.insert(
                "x-api-key",
                HeaderValue::from_str(key).map_err(|e| {
                    EngramError::Config(format!("invalid API key header value: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EngramError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, EngramError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(send_err)?;
        decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, EngramError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(send_err)?;
        decode(response).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, EngramError> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .map_err(send_err)?;
        decode(response).await
    }
}

fn send_err(e: reqwest::Error) -> EngramError {
    EngramError::Transport {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Decode a response, mapping non-success statuses to Transport errors with
/// the server's `{error}` message when one is present.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, EngramError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);
        return Err(EngramError::Transport {
            message: format!("server returned {status}: {message}"),
            source: None,
        });
    }

    response.json().await.map_err(|e| EngramError::Transport {
        message: format!("failed to decode response body: {e}"),
        source: Some(Box::new(e)),
    })
}

#[async_trait]
impl MemoryService for RestMemoryService {
    async fn health(&self) -> Result<Health, EngramError> {
        self.get_json("/health").await
    }

    async fn add(
        &self,
        tag: &str,
        content: &str,
        metadata: Option<serde_json::Value>,
        custom_id: Option<&str>,
    ) -> Result<AddOutcome, EngramError> {
        let mut body = serde_json::json!({
            "content": content,
            "containerTag": tag,
        });
        if let Some(metadata) = metadata {
            body["metadata"] = metadata;
        }
        if let Some(custom_id) = custom_id {
            body["customId"] = serde_json::Value::String(custom_id.to_string());
        }
        self.post_json("/api/v1/add", &body).await
    }

    async fn search(
        &self,
        tag: &str,
        query: &str,
        limit: usize,
    ) -> Result<SearchOutcome, EngramError> {
        let body = serde_json::json!({
            "q": query,
            "containerTag": tag,
            "limit": limit,
        });
        self.post_json("/api/v1/search/memories", &body).await
    }

    async fn profile(
        &self,
        tag: &str,
        query: Option<&str>,
        threshold: Option<f64>,
    ) -> Result<ProfileOutcome, EngramError> {
        let mut path = format!("/api/v1/profile?containerTag={}", urlencode(tag));
        if let Some(q) = query {
            path.push_str(&format!("&q={}", urlencode(q)));
        }
        if let Some(t) = threshold {
            path.push_str(&format!("&threshold={t}"));
        }
        self.get_json(&path).await
    }

    async fn forget(
        &self,
        tag: &str,
        id: Option<&str>,
        content: Option<&str>,
    ) -> Result<ForgetOutcome, EngramError> {
        let mut body = serde_json::json!({ "containerTag": tag });
        if let Some(id) = id {
            body["id"] = serde_json::Value::String(id.to_string());
        }
        if let Some(content) = content {
            body["content"] = serde_json::Value::String(content.to_string());
        }
        self.post_json("/api/v1/memories/forget", &body).await
    }

    async fn list(
        &self,
        tags: &[String],
        limit: u64,
        page: u64,
    ) -> Result<ListOutcome, EngramError> {
        let body = serde_json::json!({
            "containerTags": tags,
            "limit": limit,
            "page": page,
        });
        self.post_json("/api/v1/documents/list", &body).await
    }

    async fn delete_bulk(&self, ids: &[String]) -> Result<DeleteBulkOutcome, EngramError> {
        let body = serde_json::json!({ "ids": ids });
        self.post_json("/api/v1/documents/deleteBulk", &body).await
    }

    async fn promote(&self, tag: &str, fact: &str) -> Result<PromoteOutcome, EngramError> {
        let body = serde_json::json!({
            "containerTag": tag,
            "fact": fact,
        });
        self.post_json("/api/v1/profile/promote", &body).await
    }

    async fn stats(&self) -> Result<StatsOutcome, EngramError> {
        self.get_json("/api/v1/stats").await
    }

    async fn wipe_container(&self, tag: &str) -> Result<WipeOutcome, EngramError> {
        self.delete_json(&format!("/api/v1/container/{}", urlencode(tag)))
            .await
    }
}

/// Minimal percent-encoding for path/query components.
fn urlencode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}
