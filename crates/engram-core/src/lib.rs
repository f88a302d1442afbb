// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Engram memory store.
//!
//! This crate provides the error taxonomy and the canonical domain types
//! used throughout the Engram workspace. Persistence, the retrieval engine,
//! and the HTTP surface all build on what is defined here.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::EngramError;
pub use types::{FactType, MemoryRecord, ProfileFact, ScoredMemory, StoreStats};
