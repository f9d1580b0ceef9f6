// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use email_address::EmailAddress;
use tracing::debug;
use url::Url;

use crate::document::{Point, Selection};
use crate::{Composer, ComposerUpdate};

/// Turn user input into a link target, or `None` if it cannot be one.
///
/// Absolute `http`, `https` and `mailto` URLs are kept as typed. A bare
/// e-mail address gets `mailto:` and a bare host name gets `https://`.
/// Every other scheme is refused.
pub fn normalize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return match url.scheme() {
            "http" | "https" if url.has_host() => Some(trimmed.to_owned()),
            "mailto" => Some(trimmed.to_owned()),
            _ => None,
        };
    }
    if EmailAddress::is_valid(trimmed) {
        return Some(format!("mailto:{trimmed}"));
    }
    if trimmed.contains(char::is_whitespace) || !trimmed.contains('.') {
        return None;
    }
    let candidate = format!("https://{trimmed}");
    Url::parse(&candidate)
        .ok()
        .filter(Url::has_host)
        .map(|_| candidate)
}

impl Composer {
    /// Link the selection to `url`. With a collapsed caret inside a link
    /// the link's target is changed; elsewhere the URL itself is inserted
    /// as linked text.
    pub fn insert_link(&mut self, url: &str) -> ComposerUpdate {
        if self.is_restricted_zone() {
            debug!("link rejected in restricted zone");
            return ComposerUpdate::keep();
        }
        let Some(url) = normalize_url(url) else {
            debug!("link rejected: unusable url");
            return ComposerUpdate::keep();
        };
        let caret = self.selection.start();
        if self.selection.is_collapsed() {
            let existing = self.rich_slot(caret).and_then(|c| c.link_at(caret.offset));
            if let Some((start, end, _)) = existing {
                self.begin_edit();
                if let Some(content) = self.rich_slot_mut(caret.block, caret.slot) {
                    content.set_link(start, end, Some(&url));
                }
                return self.finish_edit();
            }
            let text = url.strip_prefix("mailto:").unwrap_or(&url).to_owned();
            return self.insert_link_with_text(&url, &text);
        }
        let segments = self.rich_segments();
        if segments.iter().all(|&(_, _, from, to)| from == to) {
            return ComposerUpdate::keep();
        }
        self.begin_edit();
        for (block, slot, from, to) in segments {
            if let Some(content) = self.rich_slot_mut(block, slot) {
                content.set_link(from, to, Some(&url));
            }
        }
        self.finish_edit()
    }

    /// Insert `text` linked to `url` at the caret, replacing any selection.
    pub fn insert_link_with_text(&mut self, url: &str, text: &str) -> ComposerUpdate {
        if self.is_restricted_zone() || text.is_empty() {
            return ComposerUpdate::keep();
        }
        let Some(url) = normalize_url(url) else {
            return ComposerUpdate::keep();
        };
        self.begin_edit();
        let marks = self.insertion_marks();
        let caret = self.delete_selection();
        let Some(content) = self.rich_slot_mut(caret.block, caret.slot) else {
            return self.finish_edit();
        };
        content.insert(caret.offset, text, marks, Some(url));
        let end = caret.offset + text.chars().count();
        self.selection = Selection::caret(Point { offset: end, ..caret });
        self.finish_edit()
    }

    /// Remove links from the selection, or the whole link around a
    /// collapsed caret.
    pub fn remove_link(&mut self) -> ComposerUpdate {
        if self.is_restricted_zone() {
            return ComposerUpdate::keep();
        }
        let caret = self.selection.start();
        if self.selection.is_collapsed() {
            let Some((start, end, _)) =
                self.rich_slot(caret).and_then(|c| c.link_at(caret.offset))
            else {
                return ComposerUpdate::keep();
            };
            self.begin_edit();
            if let Some(content) = self.rich_slot_mut(caret.block, caret.slot) {
                content.set_link(start, end, None);
            }
            return self.finish_edit();
        }
        let segments = self.rich_segments();
        let linked = segments.iter().any(|&(block, slot, _, _)| {
            self.rich_slot(Point::new(block, slot, 0))
                .is_some_and(|c| c.has_links())
        });
        if !linked {
            return ComposerUpdate::keep();
        }
        self.begin_edit();
        for (block, slot, from, to) in segments {
            if let Some(content) = self.rich_slot_mut(block, slot) {
                content.set_link(from, to, None);
            }
        }
        self.finish_edit()
    }

    /// Target of the link under the caret, if any.
    pub fn current_link(&self) -> Option<String> {
        let caret = self.selection.start();
        self.rich_slot(caret)
            .and_then(|c| c.link_at(caret.offset))
            .map(|(_, _, url)| url)
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::normalize_url;
    use crate::document::{Point, Selection, Slot};
    use crate::Composer;

    #[test]
    fn absolute_urls_are_kept() {
        assert_that!(normalize_url("https://example.com/a?b=c"))
            .is_some()
            .is_equal_to("https://example.com/a?b=c".to_owned());
        assert_eq!(normalize_url(" http://x.org "), Some("http://x.org".to_owned()));
        assert_eq!(
            normalize_url("mailto:someone@example.com"),
            Some("mailto:someone@example.com".to_owned())
        );
    }

    #[test]
    fn bare_inputs_get_a_scheme() {
        assert_eq!(
            normalize_url("someone@example.com"),
            Some("mailto:someone@example.com".to_owned())
        );
        assert_eq!(
            normalize_url("example.com/page"),
            Some("https://example.com/page".to_owned())
        );
    }

    #[test]
    fn other_inputs_are_refused() {
        assert_that!(normalize_url("javascript:alert(1)")).is_none();
        assert_that!(normalize_url("ftp://example.com")).is_none();
        assert_that!(normalize_url("not a link")).is_none();
        assert_that!(normalize_url("")).is_none();
    }

    #[test]
    fn linking_a_range() {
        let mut model = Composer::from_html("<p>see docs</p>");
        model.select(Selection::within(0, Slot::Body, 4, 8));
        model.insert_link("docs.example.com");
        assert_eq!(
            model.get_content_as_html(),
            "<p>see <a href=\"https://docs.example.com\">docs</a></p>"
        );
    }

    #[test]
    fn collapsed_caret_inserts_the_url() {
        let mut model = Composer::from_html("<p>at</p>");
        model.insert_link("https://x.org");
        model.replace_text(" after");
        assert_eq!(
            model.get_content_as_html(),
            "<p>at<a href=\"https://x.org\">https://x.org</a> after</p>"
        );
    }

    #[test]
    fn caret_inside_a_link_edits_it() {
        let mut model =
            Composer::from_html("<p><a href=\"https://old.org\">text</a></p>");
        model.select(Selection::caret(Point::body(0, 2)));
        model.insert_link("https://new.org");
        assert_eq!(
            model.get_content_as_html(),
            "<p><a href=\"https://new.org\">text</a></p>"
        );
        assert_eq!(model.current_link(), Some("https://new.org".to_owned()));
    }

    #[test]
    fn remove_link_under_the_caret() {
        let mut model = Composer::from_html(
            "<p>a <a href=\"https://x.org\"><strong>b</strong>c</a> d</p>",
        );
        model.select(Selection::caret(Point::body(0, 3)));
        model.remove_link();
        assert_eq!(model.get_content_as_html(), "<p>a <strong>b</strong>c d</p>");
    }

    #[test]
    fn links_are_rejected_in_blockquotes() {
        let mut model = Composer::from_html("<blockquote>quote</blockquote>");
        model.select(Selection::within(0, Slot::Body, 0, 5));
        assert!(model.insert_link("https://x.org").is_keep());
    }

    #[test]
    fn remove_link_ignores_ranges_reaching_a_heading() {
        let html = "<p><a href=\"https://x.org\">linked</a></p><h2>Title</h2>";
        let mut model = Composer::from_html(html);
        model.select(Selection::new(Point::body(0, 0), Point::body(1, 3)));
        assert!(model.remove_link().is_keep());
        assert_eq!(model.get_content_as_html(), html);
    }

    #[test]
    fn invalid_links_change_nothing() {
        let mut model = Composer::from_html("<p>text</p>");
        model.select(Selection::within(0, Slot::Body, 0, 4));
        assert!(model.insert_link("javascript:void(0)").is_keep());
        assert_eq!(model.get_content_as_html(), "<p>text</p>");
    }
}
