// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRUD and promotion operations for the `profile_facts` table.
//!
//! Fact rows are append-only: extraction never deduplicates, so the same
//! statement may exist as several rows. Listing collapses duplicate text;
//! promotion flips every matching dynamic row at once.

use engram_core::{EngramError, FactType};
use rusqlite::params;

use crate::database::{map_tr_err, Database};
use crate::models::ProfileFact;

/// Insert one row per fact, always as `dynamic`.
pub async fn insert_dynamic(db: &Database, facts: &[ProfileFact]) -> Result<(), EngramError> {
    if facts.is_empty() {
        return Ok(());
    }
    let facts = facts.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for fact in &facts {
                tx.execute(
                    "INSERT INTO profile_facts (id, container_tag, fact, fact_type, created_at, updated_at)
                     VALUES (?1, ?2, ?3, 'dynamic', ?4, ?5)",
                    params![
                        fact.id,
                        fact.container_tag,
                        fact.fact,
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

/// List distinct fact strings of one type, most-recently-updated first.
///
/// Duplicate rows remain in storage; only the listing collapses them.
pub async fn list_by_type(
    db: &Database,
    tag: &str,
    fact_type: FactType,
    limit: i64,
) -> Result<Vec<String>, EngramError> {
    let tag = tag.to_string();
    let fact_type = fact_type.as_str();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT fact, MAX(updated_at) AS last_updated
                 FROM profile_facts
                 WHERE container_tag = ?1 AND fact_type = ?2
                 GROUP BY fact
                 ORDER BY last_updated DESC
                 LIMIT ?3",
            )?;
            let facts = stmt
                .query_map(params![tag, fact_type, limit], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(facts)
        })
        .await
        .map_err(map_tr_err)
}

/// Promote every dynamic row matching `(container_tag, fact)` to static,
/// refreshing `updated_at`. Returns whether any row was flipped.
///
/// Re-promoting text with no remaining dynamic rows is a no-op, not an
/// error.
pub async fn promote(db: &Database, tag: &str, fact: &str) -> Result<bool, EngramError> {
    let tag = tag.to_string();
    let fact = fact.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE profile_facts
                 SET fact_type = 'static', updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE container_tag = ?1 AND fact = ?2 AND fact_type = 'dynamic'",
                params![tag, fact],
            )?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Hard-delete every fact row in the container.
pub async fn wipe_container(db: &Database, tag: &str) -> Result<usize, EngramError> {
    let tag = tag.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "DELETE FROM profile_facts WHERE container_tag = ?1",
                params![tag],
            )?;
            Ok(affected)
        })
        .await
        .map_err(map_tr_err)
}

/// Count all fact rows across containers, both dynamic and static.
pub async fn count_all(db: &Database) -> Result<u64, EngramError> {
    db.connection()
        .call(|conn| {
            let count: u64 =
                conn.query_row("SELECT COUNT(*) FROM profile_facts", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}

/// Distinct container tags present in the profile_facts table.
pub async fn distinct_container_tags(db: &Database) -> Result<Vec<String>, EngramError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT container_tag FROM profile_facts ORDER BY container_tag",
            )?;
            let tags = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(tags)
        })
        .await
        .map_err(map_tr_err)
}
