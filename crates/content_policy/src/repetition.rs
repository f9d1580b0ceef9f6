// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

/// A run of this many identical characters counts as spam.
pub const MAX_CHAR_RUN: usize = 10;

/// Fewer words than this are never checked for a dominant word.
pub const MIN_WORDS_FOR_FREQUENCY: usize = 5;

/// A dominant word must occur more often than this.
pub const MIN_DOMINANT_REPEATS: usize = 5;

/// Share of all words above which a single word is dominant.
pub const DOMINANT_WORD_RATIO: f64 = 0.6;

/// Heuristic spam detection. These cut-offs decide which content gets
/// rejected, so they must not drift.
pub fn is_repetitive(text: &str) -> bool {
    has_long_char_run(text) || has_dominant_word(text)
}

fn has_long_char_run(text: &str) -> bool {
    let mut previous = None;
    let mut run = 0;
    for c in text.chars() {
        if c.is_whitespace() {
            previous = None;
            run = 0;
            continue;
        }
        if previous == Some(c) {
            run += 1;
        } else {
            previous = Some(c);
            run = 1;
        }
        if run >= MAX_CHAR_RUN {
            return true;
        }
    }
    false
}

fn has_dominant_word(text: &str) -> bool {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0;
    for word in text.unicode_words() {
        *counts.entry(word.to_lowercase()).or_default() += 1;
        total += 1;
    }
    if total < MIN_WORDS_FOR_FREQUENCY {
        return false;
    }
    counts.values().any(|&count| {
        count > MIN_DOMINANT_REPEATS
            && count as f64 / total as f64 > DOMINANT_WORD_RATIO
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_identical_characters_are_repetitive() {
        assert!(is_repetitive("aaaaaaaaaa"));
        assert!(is_repetitive("look!!!!!!!!!!"));
    }

    #[test]
    fn nine_identical_characters_are_not() {
        assert!(!is_repetitive("aaaaaaaaa"));
    }

    #[test]
    fn whitespace_breaks_a_run() {
        assert!(!is_repetitive("aaaaa aaaaa"));
    }

    #[test]
    fn dominant_word_is_repetitive() {
        // 6 of 7 words
        assert!(is_repetitive("buy buy buy buy buy buy now"));
    }

    #[test]
    fn dominant_word_needs_more_than_five_repeats() {
        // 5 of 5 words is 100% but only 5 repeats
        assert!(!is_repetitive("buy buy buy buy buy"));
    }

    #[test]
    fn frequent_word_under_ratio_is_fine() {
        // 6 of 12 words is 50%
        assert!(!is_repetitive(
            "go go go go go go one two three four five six"
        ));
    }

    #[test]
    fn word_comparison_ignores_case() {
        assert!(is_repetitive("Buy BUY buy bUy buy Buy now"));
    }
}
