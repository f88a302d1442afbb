// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic extraction of profile facts from ingested text.
//!
//! Precision-biased: a sentence is only emitted when it carries an explicit
//! preference/intent trigger phrase. Missed statements are acceptable;
//! spurious ones are not.

use std::sync::LazyLock;

use regex::Regex;

use crate::token::split_sentences;

/// Sentences this short carry no usable statement.
const MIN_SENTENCE_LEN: usize = 10;

/// Ordered trigger patterns. A sentence is emitted on its first match and
/// never tested against later patterns.
static FACT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // "I prefer/like/love/hate/want/need/use/enjoy ..."
        Regex::new(r"(?i)\bI\s+(?:really\s+)?(?:prefer|like|love|hate|want|need|use|enjoy)\b")
            .unwrap(),
        // "my favorite/preferred/default ..."
        Regex::new(r"(?i)\bmy\s+(?:favorite|favourite|preferred|default)\b").unwrap(),
        // "I always/never/usually/often/rarely ..."
        Regex::new(r"(?i)\bI\s+(?:always|never|usually|often|rarely)\b").unwrap(),
        // "remember that/to ..."
        Regex::new(r"(?i)\bremember\s+(?:that|to)\b").unwrap(),
        // "I am ..." / "I'm ..."
        Regex::new(r"(?i)\bI\s*(?:am|'m)\b").unwrap(),
        // "I work/live ..."
        Regex::new(r"(?i)\bI\s+(?:work|live)\b").unwrap(),
        // "call me ..."
        Regex::new(r"(?i)\bcall\s+me\b").unwrap(),
    ]
});

/// Extract candidate profile facts from `content`.
///
/// Each fact is a verbatim sentence segment; order follows sentence order in
/// the source text. A segment contributes at most one fact.
pub fn extract(content: &str) -> Vec<String> {
    split_sentences(content)
        .into_iter()
        .filter(|segment| segment.chars().count() > MIN_SENTENCE_LEN)
        .filter(|segment| FACT_PATTERNS.iter().any(|pattern| pattern.is_match(segment)))
        .map(str::to_string)
        .collect()
}
