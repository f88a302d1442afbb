// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRUD and soft-delete operations for the `memories` table.
//!
//! All reads that feed search, listing, and stats filter on
//! `forgotten_at IS NULL`; hard deletes ignore both container and
//! soft-delete state.

use engram_core::EngramError;
use rusqlite::params;

use crate::database::{map_tr_err, Database};
use crate::models::{MemoryRecord, ProfileFact};

const COLUMNS: &str =
    "id, container_tag, content, metadata, custom_id, created_at, updated_at, forgotten_at";

/// Convert a rusqlite Row to a MemoryRecord.
fn row_to_record(row: &rusqlite::Row) -> Result<MemoryRecord, rusqlite::Error> {
    let metadata: Option<String> = row.get(3)?;
    Ok(MemoryRecord {
        id: row.get(0)?,
        container_tag: row.get(1)?,
        content: row.get(2)?,
        metadata: metadata.as_deref().and_then(|s| serde_json::from_str(s).ok()),
        custom_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
        forgotten_at: row.get(7)?,
    })
}

/// Insert a single memory row.
pub async fn insert(db: &Database, record: &MemoryRecord) -> Result<(), EngramError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            insert_record(conn, &record)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a memory row and its derived facts in one transaction.
///
/// Either the memory and all facts land together, or none do.
pub async fn insert_with_facts(
    db: &Database,
    record: &MemoryRecord,
    facts: &[ProfileFact],
) -> Result<(), EngramError> {
    let record = record.clone();
    let facts = facts.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            insert_record(&tx, &record)?;
            for fact in &facts {
                tx.execute(
                    "INSERT INTO profile_facts (id, container_tag, fact, fact_type, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        fact.id,
                        fact.container_tag,
                        fact.fact,
                        fact.fact_type.as_str(),
                        fact.created_at,
                        fact.updated_at,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

fn insert_record(conn: &rusqlite::Connection, record: &MemoryRecord) -> Result<(), rusqlite::Error> {
    let metadata = record.metadata.as_ref().map(|m| m.to_string());
    conn.execute(
        "INSERT INTO memories (id, container_tag, content, metadata, custom_id, created_at, updated_at, forgotten_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.id,
            record.container_tag,
            record.content,
            metadata,
            record.custom_id,
            record.created_at,
            record.updated_at,
            record.forgotten_at,
        ],
    )?;
    Ok(())
}

/// Get a memory by ID, regardless of container or soft-delete state.
pub async fn get_by_id(db: &Database, id: &str) -> Result<Option<MemoryRecord>, EngramError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM memories WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_record);
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List active memories for the container union, newest first, with the
/// total active count for pagination.
pub async fn list_active(
    db: &Database,
    tags: &[String],
    limit: i64,
    offset: i64,
) -> Result<(Vec<MemoryRecord>, u64), EngramError> {
    if tags.is_empty() {
        return Ok((Vec::new(), 0));
    }
    let tags = tags.to_vec();
    db.connection()
        .call(move |conn| {
            let placeholders: Vec<String> = (1..=tags.len()).map(|i| format!("?{i}")).collect();
            let in_clause = placeholders.join(", ");

            let count_sql = format!(
                "SELECT COUNT(*) FROM memories WHERE forgotten_at IS NULL AND container_tag IN ({in_clause})"
            );
            let tag_params: Vec<&dyn rusqlite::types::ToSql> =
                tags.iter().map(|t| t as &dyn rusqlite::types::ToSql).collect();
            let total: u64 = conn.query_row(&count_sql, tag_params.as_slice(), |row| row.get(0))?;

            let select_sql = format!(
                "SELECT {COLUMNS} FROM memories
                 WHERE forgotten_at IS NULL AND container_tag IN ({in_clause})
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?{} OFFSET ?{}",
                tags.len() + 1,
                tags.len() + 2
            );
            let mut stmt = conn.prepare(&select_sql)?;
            let mut select_params = tag_params;
            select_params.push(&limit);
            select_params.push(&offset);
            let records = stmt
                .query_map(select_params.as_slice(), row_to_record)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok((records, total))
        })
        .await
        .map_err(map_tr_err)
}

/// Load the most-recent `cap` active memories for the container union.
///
/// This is the bounded working set the relevance scorer runs over.
pub async fn recent_active(
    db: &Database,
    tags: &[String],
    cap: i64,
) -> Result<Vec<MemoryRecord>, EngramError> {
    if tags.is_empty() {
        return Ok(Vec::new());
    }
    let tags = tags.to_vec();
    db.connection()
        .call(move |conn| {
            let placeholders: Vec<String> = (1..=tags.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "SELECT {COLUMNS} FROM memories
                 WHERE forgotten_at IS NULL AND container_tag IN ({})
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?{}",
                placeholders.join(", "),
                tags.len() + 1
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut params: Vec<&dyn rusqlite::types::ToSql> =
                tags.iter().map(|t| t as &dyn rusqlite::types::ToSql).collect();
            params.push(&cap);
            let records = stmt
                .query_map(params.as_slice(), row_to_record)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        })
        .await
        .map_err(map_tr_err)
}

/// Soft-delete the active memory with the given id in the container.
///
/// Returns the number of rows affected (0 or 1). "No rows affected" is a
/// normal outcome, not an error.
pub async fn soft_delete_by_id(
    db: &Database,
    tag: &str,
    id: &str,
) -> Result<usize, EngramError> {
    let tag = tag.to_string();
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE memories SET forgotten_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND container_tag = ?2 AND forgotten_at IS NULL",
                params![id, tag],
            )?;
            Ok(affected)
        })
        .await
        .map_err(map_tr_err)
}

/// Soft-delete every active memory in the container with exactly this
/// content. Returns the number of rows affected.
pub async fn soft_delete_by_content(
    db: &Database,
    tag: &str,
    content: &str,
) -> Result<usize, EngramError> {
    let tag = tag.to_string();
    let content = content.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE memories SET forgotten_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE content = ?1 AND container_tag = ?2 AND forgotten_at IS NULL",
                params![content, tag],
            )?;
            Ok(affected)
        })
        .await
        .map_err(map_tr_err)
}

/// Hard-delete rows by id, regardless of container or soft-delete state.
pub async fn hard_delete(db: &Database, ids: &[String]) -> Result<usize, EngramError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let ids = ids.to_vec();
    db.connection()
        .call(move |conn| {
            let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "DELETE FROM memories WHERE id IN ({})",
                placeholders.join(", ")
            );
            let params: Vec<&dyn rusqlite::types::ToSql> =
                ids.iter().map(|id| id as &dyn rusqlite::types::ToSql).collect();
            let affected = conn.execute(&sql, params.as_slice())?;
            Ok(affected)
        })
        .await
        .map_err(map_tr_err)
}

/// Hard-delete every memory in the container, any forgotten state.
pub async fn wipe_container(db: &Database, tag: &str) -> Result<usize, EngramError> {
    let tag = tag.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "DELETE FROM memories WHERE container_tag = ?1",
                params![tag],
            )?;
            Ok(affected)
        })
        .await
        .map_err(map_tr_err)
}

/// Count active memories across all containers.
pub async fn count_active(db: &Database) -> Result<u64, EngramError> {
    db.connection()
        .call(|conn| {
            let count: u64 = conn.query_row(
                "SELECT COUNT(*) FROM memories WHERE forgotten_at IS NULL",
                [],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}

/// Distinct container tags present in the memories table.
pub async fn distinct_container_tags(db: &Database) -> Result<Vec<String>, EngramError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT container_tag FROM memories ORDER BY container_tag",
            )?;
            let tags = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tags)
        })
        .await
        .map_err(map_tr_err)
}
