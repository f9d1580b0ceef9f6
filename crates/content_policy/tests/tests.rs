// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use content_policy::{check, is_repetitive, ContentStats, PolicyViolation};
use speculoos::prelude::*;

const MAX_WORDS: usize = 5000;

fn verdict(text: &str) -> Result<(), PolicyViolation> {
    check(&ContentStats::new(text), MAX_WORDS)
}

#[test]
fn digits_only_wins_over_too_short() {
    assert_that!(verdict("1234567890"))
        .is_err()
        .is_equal_to(PolicyViolation::NumericOnly);
}

#[test]
fn repetition_wins_over_too_short() {
    assert_that!(verdict(&"a".repeat(15)))
        .is_err()
        .is_equal_to(PolicyViolation::SpamRepetition);
}

#[test]
fn a_dominant_word_is_spam_even_in_long_content() {
    let text = format!(
        "{} with a handful of other ordinary words",
        "great ".repeat(20)
    );
    assert_that!(verdict(&text))
        .is_err()
        .is_equal_to(PolicyViolation::SpamRepetition);
}

#[test]
fn ordinary_prose_passes() {
    let text = "Our community garden opened this spring. Volunteers planted \
                tomatoes, beans and a long row of sunflowers along the fence.";
    assert!(!is_repetitive(text));
    assert_that!(verdict(text)).is_ok();
}

#[test]
fn media_counts_as_content() {
    let stats = ContentStats::new("").with_media(1);
    assert_that!(check(&stats, MAX_WORDS)).is_ok();
    assert_that!(stats.is_empty()).is_false();
}

#[test]
fn word_limit_comes_from_the_caller() {
    let text = (0..120).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
    assert_that!(check(&ContentStats::new(text.clone()), 100))
        .is_err()
        .is_equal_to(PolicyViolation::TooLong { max_words: 100 });
    assert_that!(check(&ContentStats::new(text), 120)).is_ok();
}

#[test]
fn messages_and_codes() {
    let violation = PolicyViolation::TooLong { max_words: 10 };
    assert_eq!(violation.code(), "too-long");
    assert_eq!(violation.to_string(), "content exceeds the limit of 10 words");
}
