// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory engine for the Engram store.
//!
//! Provides lexical tokenization and relevance scoring, heuristic fact
//! extraction, and the three services the HTTP surface is built on.
//!
//! ## Architecture
//!
//! - **token**: shared normalization (term split + sentence split)
//! - **score**: term-overlap relevance in [0, 1] with exact-substring boost
//! - **extract**: precision-biased trigger-phrase fact extraction
//! - **Ingestor**: validated create path, memory + facts in one transaction
//! - **Retriever**: bounded working-set search and the profile view
//! - **Maintenance**: forget, bulk delete, stats, container wipe

pub mod extract;
pub mod ingest;
pub mod maintenance;
pub mod retriever;
pub mod score;
pub mod token;

pub use ingest::Ingestor;
pub use maintenance::{Maintenance, WipeOutcome};
pub use retriever::{ProfileView, Retriever};
