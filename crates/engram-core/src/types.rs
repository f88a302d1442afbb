// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical domain types shared across crate boundaries.

use serde::{Deserialize, Serialize};

/// A stored text unit, scoped to exactly one container for its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique identifier, assigned at creation, immutable.
    pub id: String,
    /// Partition key. Never changes after creation.
    pub container_tag: String,
    /// The raw text. Non-empty at creation.
    pub content: String,
    /// Opaque caller-supplied JSON, stored and returned verbatim.
    pub metadata: Option<serde_json::Value>,
    /// Optional caller-supplied identifier. Not required to be unique.
    pub custom_id: Option<String>,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-update timestamp.
    pub updated_at: String,
    /// Soft-delete marker. `None` = active, `Some` = hidden from reads.
    pub forgotten_at: Option<String>,
}

impl MemoryRecord {
    /// True when the record is visible to search, listing, and stats.
    pub fn is_active(&self) -> bool {
        self.forgotten_at.is_none()
    }
}

/// A derived statement about the user within a container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileFact {
    /// Unique identifier.
    pub id: String,
    /// Partition key, matches the memory the fact was derived from.
    pub container_tag: String,
    /// The literal extracted sentence, verbatim.
    pub fact: String,
    /// Two-tier classification: recent vs. durable.
    pub fact_type: FactType,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-update timestamp. Changes on promotion.
    pub updated_at: String,
}

/// Classification of a profile fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactType {
    /// Recently observed. Default on extraction.
    Dynamic,
    /// Promoted, considered durable/established.
    Static,
}

impl FactType {
    /// Convert to string for SQLite storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            FactType::Dynamic => "dynamic",
            FactType::Static => "static",
        }
    }

    /// Parse from SQLite string.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "static" => FactType::Static,
            _ => FactType::Dynamic,
        }
    }
}

/// A memory paired with its relevance score for a query.
#[derive(Debug, Clone)]
pub struct ScoredMemory {
    /// The stored record.
    pub memory: MemoryRecord,
    /// Lexical relevance in [0, 1].
    pub score: f64,
}

/// Aggregate counts across all containers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    /// Active (non-forgotten) memory count.
    pub memories: u64,
    /// Total fact rows, both dynamic and static. Facts are never cascaded
    /// on memory deletion, so this counts facts whose source memory is
    /// forgotten or gone.
    pub facts: u64,
    /// Sorted distinct container tags across both tables.
    pub containers: Vec<String>,
}
