// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text normalization shared by the relevance scorer and the fact extractor.

/// Split free text into comparable terms.
///
/// Lowercases the input, treats every character that is not a letter, digit,
/// or underscore as a separator, and drops terms of length <= 2.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|term| term.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Split text into trimmed sentence segments on runs of `.`, `!`, `?`.
///
/// A coarser split than [`tokenize`], used for fact extraction. Empty
/// segments (from consecutive terminators) are dropped; length filtering is
/// the extractor's concern.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_splits_on_non_word() {
        assert_eq!(
            tokenize("I PREFER Dark-Mode, obviously!"),
            vec!["prefer", "dark", "mode", "obviously"]
        );
    }

    #[test]
    fn tokenize_drops_short_terms() {
        // "I", "to", "a" are all <= 2 chars.
        assert_eq!(tokenize("I go to a gym"), vec!["gym"]);
    }

    #[test]
    fn tokenize_keeps_underscores_and_digits() {
        assert_eq!(tokenize("user_id 12345"), vec!["user_id", "12345"]);
    }

    #[test]
    fn tokenize_empty_and_punctuation_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("?!... --- !!").is_empty());
    }

    #[test]
    fn split_sentences_on_terminator_runs() {
        assert_eq!(
            split_sentences("First one. Second one!! Third one?"),
            vec!["First one", "Second one", "Third one"]
        );
    }

    #[test]
    fn split_sentences_trims_and_drops_empty() {
        assert_eq!(split_sentences("...  Only this.  "), vec!["Only this"]);
        assert!(split_sentences("?!?!").is_empty());
    }

    #[test]
    fn split_sentences_without_terminator_is_whole_text() {
        assert_eq!(split_sentences("no terminator here"), vec!["no terminator here"]);
    }
}
