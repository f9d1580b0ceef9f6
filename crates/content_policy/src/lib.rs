// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Save-time content policy.
//!
//! The editor hands over a [`ContentStats`] summary of the document it is
//! about to persist and [`check`] decides whether the content may be saved.
//! Violations carry a stable machine readable code (see
//! [`PolicyViolation::code`]) that hosts use to pick a user facing message.

mod repetition;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

pub use repetition::is_repetitive;

/// Content shorter than this (in characters) needs at least one media item.
pub const MIN_TEXT_CHARS: usize = 50;

/// Maximum number of list items across the whole document.
pub const MAX_LIST_ITEMS: usize = 300;

static DIGITS_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9\s]+$").expect("valid regex"));

/// The facts about a document that the policy looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentStats {
    /// All visible text, blocks separated by whitespace.
    pub text: String,
    /// Number of images and embeds.
    pub media_count: usize,
    /// Number of list items across every list.
    pub list_item_count: usize,
}

impl ContentStats {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_media(mut self, media_count: usize) -> Self {
        self.media_count = media_count;
        self
    }

    pub fn with_list_items(mut self, list_item_count: usize) -> Self {
        self.list_item_count = list_item_count;
        self
    }

    /// The text with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    pub fn char_count(&self) -> usize {
        self.trimmed_text().chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.trimmed_text().unicode_words().count()
    }

    pub fn has_media(&self) -> bool {
        self.media_count > 0
    }

    pub fn is_empty(&self) -> bool {
        self.trimmed_text().is_empty() && !self.has_media()
    }
}

/// Why content was refused.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    thiserror::Error,
    strum_macros::AsRefStr,
    strum_macros::IntoStaticStr,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum PolicyViolation {
    #[error("content is required")]
    ContentRequired,
    #[error("content must be at least {} characters", MIN_TEXT_CHARS)]
    TooShort,
    #[error("content exceeds the limit of {max_words} words")]
    TooLong { max_words: usize },
    #[error("content has more than {} list items", MAX_LIST_ITEMS)]
    TooManyListItems,
    #[error("content looks like repeated text")]
    SpamRepetition,
    #[error("content cannot consist of numbers only")]
    NumericOnly,
}

impl PolicyViolation {
    /// Stable code, e.g. `"too-short"`.
    pub fn code(&self) -> &'static str {
        self.into()
    }
}

/// Check `stats` against the policy. `max_words` depends on the author's
/// plan and is supplied by the caller.
///
/// Checks run in a fixed order and the first failure wins, so a short
/// string of digits is reported as [`PolicyViolation::NumericOnly`] and a
/// short run of one character as [`PolicyViolation::SpamRepetition`].
pub fn check(
    stats: &ContentStats,
    max_words: usize,
) -> Result<(), PolicyViolation> {
    if stats.is_empty() {
        return Err(PolicyViolation::ContentRequired);
    }

    let text = stats.trimmed_text();
    if !text.is_empty() && DIGITS_ONLY.is_match(text) {
        return Err(PolicyViolation::NumericOnly);
    }
    if is_repetitive(text) {
        return Err(PolicyViolation::SpamRepetition);
    }
    if stats.char_count() < MIN_TEXT_CHARS && !stats.has_media() {
        return Err(PolicyViolation::TooShort);
    }
    if stats.word_count() > max_words {
        return Err(PolicyViolation::TooLong { max_words });
    }
    if stats.list_item_count > MAX_LIST_ITEMS {
        return Err(PolicyViolation::TooManyListItems);
    }
    Ok(())
}
