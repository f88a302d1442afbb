// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Container-wide maintenance: forget, bulk delete, stats, wipe.

use std::collections::BTreeSet;
use std::sync::Arc;

use engram_core::{EngramError, StoreStats};
use engram_storage::queries::{facts, memories};
use engram_storage::Database;
use tracing::info;

/// Result of wiping a container.
#[derive(Debug, Clone, Copy)]
pub struct WipeOutcome {
    /// Memory rows removed.
    pub memories: usize,
    /// Fact rows removed.
    pub facts: usize,
}

/// Maintenance service over both stores.
pub struct Maintenance {
    db: Arc<Database>,
}

impl Maintenance {
    /// Creates a maintenance service over the shared database handle.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Soft-delete a memory by id or by exact content.
    ///
    /// Exactly one selector must be supplied. Returns whether any row was
    /// marked; "nothing matched" is a normal outcome, not an error.
    pub async fn forget(
        &self,
        tag: &str,
        id: Option<&str>,
        content: Option<&str>,
    ) -> Result<bool, EngramError> {
        match (id, content) {
            (Some(id), None) => {
                Ok(memories::soft_delete_by_id(&self.db, tag, id).await? > 0)
            }
            (None, Some(content)) => {
                Ok(memories::soft_delete_by_content(&self.db, tag, content).await? > 0)
            }
            _ => Err(EngramError::Validation(
                "exactly one of id or content must be supplied".to_string(),
            )),
        }
    }

    /// Hard-delete memories by id, any container, any forgotten state.
    pub async fn bulk_delete(&self, ids: &[String]) -> Result<usize, EngramError> {
        if ids.is_empty() {
            return Err(EngramError::Validation(
                "ids must be a non-empty array".to_string(),
            ));
        }
        memories::hard_delete(&self.db, ids).await
    }

    /// Aggregate counts across all containers.
    ///
    /// The fact count includes rows whose source memory was forgotten or
    /// hard-deleted; facts are never cascaded.
    pub async fn stats(&self) -> Result<StoreStats, EngramError> {
        let memory_count = memories::count_active(&self.db).await?;
        let fact_count = facts::count_all(&self.db).await?;

        let mut containers: BTreeSet<String> =
            memories::distinct_container_tags(&self.db).await?.into_iter().collect();
        containers.extend(facts::distinct_container_tags(&self.db).await?);

        Ok(StoreStats {
            memories: memory_count,
            facts: fact_count,
            containers: containers.into_iter().collect(),
        })
    }

    /// Hard-delete every memory and every fact in the container.
    pub async fn wipe_container(&self, tag: &str) -> Result<WipeOutcome, EngramError> {
        let memories = memories::wipe_container(&self.db, tag).await?;
        let facts = facts::wipe_container(&self.db, tag).await?;
        info!(container = tag, memories, facts, "container wiped");
        Ok(WipeOutcome { memories, facts })
    }
}
