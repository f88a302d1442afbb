// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory ingestion: one memory row plus its derived facts, atomically.

use std::sync::Arc;

use engram_core::{EngramError, FactType, MemoryRecord, ProfileFact};
use engram_storage::queries::memories;
use engram_storage::Database;
use tracing::debug;
use uuid::Uuid;

use crate::extract::extract;

/// Current UTC time as an ISO 8601 string with millisecond precision.
fn now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Ingestion service: validates, extracts facts, and persists.
pub struct Ingestor {
    db: Arc<Database>,
}

impl Ingestor {
    /// Creates an ingestor over the shared database handle.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store `content` as a new memory in `tag` and derive dynamic facts
    /// from it. Returns the new memory's id.
    ///
    /// The memory row and all fact rows are written in one transaction:
    /// either everything lands or nothing does.
    pub async fn ingest(
        &self,
        tag: &str,
        content: &str,
        metadata: Option<serde_json::Value>,
        custom_id: Option<String>,
    ) -> Result<String, EngramError> {
        if tag.trim().is_empty() {
            return Err(EngramError::Validation(
                "containerTag must not be empty".to_string(),
            ));
        }
        if content.trim().is_empty() {
            return Err(EngramError::Validation("content is required".to_string()));
        }

        let now = now_iso();
        let record = MemoryRecord {
            id: Uuid::new_v4().to_string(),
            container_tag: tag.to_string(),
            content: content.to_string(),
            metadata,
            custom_id,
            created_at: now.clone(),
            updated_at: now.clone(),
            forgotten_at: None,
        };

        let facts: Vec<ProfileFact> = extract(content)
            .into_iter()
            .map(|fact| ProfileFact {
                id: Uuid::new_v4().to_string(),
                container_tag: tag.to_string(),
                fact,
                fact_type: FactType::Dynamic,
                created_at: now.clone(),
                updated_at: now.clone(),
            })
            .collect();

        memories::insert_with_facts(&self.db, &record, &facts).await?;

        debug!(
            id = record.id.as_str(),
            container = tag,
            facts = facts.len(),
            "memory ingested"
        );
        Ok(record.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_storage::queries::facts;

    async fn setup() -> (Arc<Database>, Ingestor) {
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        (db.clone(), Ingestor::new(db))
    }

    #[tokio::test]
    async fn ingest_persists_memory_and_returns_id() {
        let (db, ingestor) = setup().await;
        let id = ingestor
            .ingest("work", "plain note without triggers", None, None)
            .await
            .unwrap();

        let stored = memories::get_by_id(&db, &id).await.unwrap().unwrap();
        assert_eq!(stored.content, "plain note without triggers");
        assert_eq!(stored.container_tag, "work");
        assert_eq!(stored.created_at, stored.updated_at);
        assert!(stored.is_active());
    }

    #[tokio::test]
    async fn ingest_rejects_empty_content() {
        let (_db, ingestor) = setup().await;
        let err = ingestor.ingest("work", "   ", None, None).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn ingest_rejects_empty_container_tag() {
        let (_db, ingestor) = setup().await;
        let err = ingestor.ingest("", "some content", None, None).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn ingest_derives_dynamic_facts_in_same_container() {
        let (db, ingestor) = setup().await;
        ingestor
            .ingest("work", "I always drink green tea in the morning", None, None)
            .await
            .unwrap();

        let dynamic = facts::list_by_type(&db, "work", FactType::Dynamic, 50)
            .await
            .unwrap();
        assert_eq!(dynamic, vec!["I always drink green tea in the morning".to_string()]);

        let elsewhere = facts::list_by_type(&db, "home", FactType::Dynamic, 50)
            .await
            .unwrap();
        assert!(elsewhere.is_empty());
    }

    #[tokio::test]
    async fn ingest_without_triggers_creates_no_facts() {
        let (db, ingestor) = setup().await;
        ingestor
            .ingest("work", "the deploy finished at noon", None, None)
            .await
            .unwrap();

        assert_eq!(facts::count_all(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn ingest_keeps_metadata_and_custom_id() {
        let (db, ingestor) = setup().await;
        let id = ingestor
            .ingest(
                "work",
                "note with extras",
                Some(serde_json::json!({"source": "slack", "priority": 2})),
                Some("ticket-77".to_string()),
            )
            .await
            .unwrap();

        let stored = memories::get_by_id(&db, &id).await.unwrap().unwrap();
        assert_eq!(
            stored.metadata,
            Some(serde_json::json!({"source": "slack", "priority": 2}))
        );
        assert_eq!(stored.custom_id.as_deref(), Some("ticket-77"));
    }

    #[tokio::test]
    async fn repeated_ingest_duplicates_facts() {
        let (db, ingestor) = setup().await;
        for _ in 0..2 {
            ingestor
                .ingest("work", "I use vim for everything", None, None)
                .await
                .unwrap();
        }

        // Two rows in storage, collapsed to one line in the listing.
        assert_eq!(facts::count_all(&db).await.unwrap(), 2);
        let listed = facts::list_by_type(&db, "work", FactType::Dynamic, 50)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }
}
