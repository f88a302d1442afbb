// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical relevance scoring between a query and a content string.
//!
//! Purely term-overlap based: no fuzzy matching, no edit distance, no
//! embeddings. Two near-identical strings score 0 if they share no term
//! longer than two characters.

use std::collections::HashSet;

use crate::token::tokenize;

/// Added to the base score when the content contains the query verbatim.
const EXACT_MATCH_BOOST: f64 = 0.3;

/// Score the relevance of `content` to `query`. Returns a value in [0, 1].
///
/// The base measure is `matches / sqrt(|Q| * |C|)` where `Q` is the set of
/// distinct query terms and `C` the content term sequence with repeats.
/// Repeated query terms in the content count multiple times, and the
/// multiset denominator penalizes long content unless it keeps matching.
/// An exact substring occurrence of the query adds a fixed boost.
pub fn score(query: &str, content: &str) -> f64 {
    let query_terms: HashSet<String> = tokenize(query).into_iter().collect();
    let content_terms = tokenize(content);

    if query_terms.is_empty() || content_terms.is_empty() {
        return 0.0;
    }

    let matches = content_terms
        .iter()
        .filter(|term| query_terms.contains(term.as_str()))
        .count();

    let base = matches as f64 / ((query_terms.len() * content_terms.len()) as f64).sqrt();

    let needle = query.trim().to_lowercase();
    let boost = if !needle.is_empty() && content.to_lowercase().contains(&needle) {
        EXACT_MATCH_BOOST
    } else {
        0.0
    };

    (base + boost).min(1.0)
}
