// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relevance-ranked retrieval over a container's active memories.
//!
//! Search loads a bounded recency-ordered working set, scores every
//! candidate lexically, drops low-relevance hits, and returns the top
//! results. The profile view pairs the fact lists with an optional search
//! over a larger working set.

use std::sync::Arc;

use engram_core::{EngramError, FactType, ScoredMemory};
use engram_storage::queries::{facts, memories};
use engram_storage::Database;

use crate::score::score;

/// Most-recent active memories considered per search.
const SEARCH_WORKING_SET: i64 = 200;

/// Working set for the profile's query search.
const PROFILE_WORKING_SET: i64 = 500;

/// Fixed low-relevance floor for plain search. Scores <= this are dropped.
const SEARCH_FLOOR: f64 = 0.05;

/// Default floor for the profile's query search when the caller gives none.
const PROFILE_DEFAULT_FLOOR: f64 = 0.1;

/// Hard cap on profile search results.
const PROFILE_SEARCH_CAP: usize = 10;

/// Facts listed per type in the profile view.
const PROFILE_FACT_LIMIT: i64 = 50;

/// The profile view: durable and recent facts, plus optional search hits.
#[derive(Debug)]
pub struct ProfileView {
    /// Promoted, durable facts.
    pub static_facts: Vec<String>,
    /// Recently extracted facts.
    pub dynamic_facts: Vec<String>,
    /// Present only when a query was supplied.
    pub search_results: Option<Vec<ScoredMemory>>,
}

/// Relevance-ranked retrieval service.
pub struct Retriever {
    db: Arc<Database>,
}

impl Retriever {
    /// Creates a retriever over the shared database handle.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Search the container union for memories relevant to `query`.
    ///
    /// Results are sorted by score descending; ties keep recency order
    /// (the sort is stable over the recency-ordered working set).
    pub async fn search(
        &self,
        tags: &[String],
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredMemory>, EngramError> {
        let working = memories::recent_active(&self.db, tags, SEARCH_WORKING_SET).await?;
        Ok(rank(working, query, SEARCH_FLOOR, limit))
    }

    /// Build the profile view for one container.
    ///
    /// Fact lists are always returned. When `query` is non-empty, a search
    /// over a larger working set is included, filtered at `threshold`
    /// (default 0.1) and capped at 10 results.
    pub async fn profile(
        &self,
        tag: &str,
        query: Option<&str>,
        threshold: Option<f64>,
    ) -> Result<ProfileView, EngramError> {
        let static_facts =
            facts::list_by_type(&self.db, tag, FactType::Static, PROFILE_FACT_LIMIT).await?;
        let dynamic_facts =
            facts::list_by_type(&self.db, tag, FactType::Dynamic, PROFILE_FACT_LIMIT).await?;

        let search_results = match query {
            Some(q) if !q.trim().is_empty() => {
                let scope = vec![tag.to_string()];
                let working =
                    memories::recent_active(&self.db, &scope, PROFILE_WORKING_SET).await?;
                let floor = threshold.unwrap_or(PROFILE_DEFAULT_FLOOR);
                Some(rank(working, q, floor, PROFILE_SEARCH_CAP))
            }
            _ => None,
        };

        Ok(ProfileView {
            static_facts,
            dynamic_facts,
            search_results,
        })
    }
}

/// Score, filter, sort, and truncate a working set.
///
/// `Vec::sort_by` is stable, so equal scores preserve the incoming recency
/// order.
fn rank(
    working: Vec<engram_core::MemoryRecord>,
    query: &str,
    floor: f64,
    limit: usize,
) -> Vec<ScoredMemory> {
    let mut scored: Vec<ScoredMemory> = working
        .into_iter()
        .map(|memory| {
            let score = score(query, &memory.content);
            ScoredMemory { memory, score }
        })
        .filter(|sm| sm.score > floor)
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}
