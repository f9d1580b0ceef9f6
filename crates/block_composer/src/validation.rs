// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Save-time validation of serialized content.

use content_policy::{check, PolicyViolation};
use tracing::debug;

use crate::document::Document;
use crate::dom::parse_html;

/// Check persisted content against the content policy. `max_words` comes
/// from the author's plan.
///
/// The content is parsed the same way the composer loads it, so text,
/// media and list items are counted exactly as the editor sees them.
/// Markup that yields no blocks counts as empty.
pub fn validate(content: &str, max_words: usize) -> Result<(), PolicyViolation> {
    let blocks = parse_html(content).unwrap_or_default();
    let stats = Document::from_blocks(blocks).content_stats();
    let result = check(&stats, max_words);
    if let Err(violation) = &result {
        debug!(code = violation.code(), "content refused");
    }
    result
}

#[cfg(test)]
mod tests {
    use content_policy::PolicyViolation;

    use super::validate;

    #[test]
    fn digits_are_numeric_only() {
        assert_eq!(validate("1234567890", 5000), Err(PolicyViolation::NumericOnly));
    }

    #[test]
    fn nothing_is_content_required() {
        assert_eq!(validate("", 5000), Err(PolicyViolation::ContentRequired));
        assert_eq!(validate("<p></p><p> </p>", 5000), Err(PolicyViolation::ContentRequired));
    }

    #[test]
    fn short_text_is_too_short() {
        assert_eq!(validate("Hi", 5000), Err(PolicyViolation::TooShort));
        assert_eq!(
            validate(
                "<p>Hi</p><figure class=\"image\"><img src=\"https://x.org/a.png\" alt=\"\"></figure>",
                5000
            ),
            Ok(())
        );
    }

    #[test]
    fn word_limit() {
        let words: Vec<String> = (0..5001).map(|i| format!("word{i}")).collect();
        let html = format!("<p>{}</p>", words.join(" "));
        assert_eq!(
            validate(&html, 5000),
            Err(PolicyViolation::TooLong { max_words: 5000 })
        );
        assert_eq!(validate(&html, 6000), Ok(()));
    }

    #[test]
    fn list_items_are_counted_from_markup() {
        let items: String = (0..301).map(|i| format!("<li>item number {i}</li>")).collect();
        let html = format!("<p>A perfectly ordinary introduction to a long list.</p><ul>{items}</ul>");
        assert_eq!(validate(&html, 5000), Err(PolicyViolation::TooManyListItems));
    }
}
