// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use tracing::debug;

use crate::document::{InlineMark, Point, Slot};
use crate::{Composer, ComposerUpdate};

impl Composer {
    pub fn bold(&mut self) -> ComposerUpdate {
        self.toggle_mark(InlineMark::Bold)
    }

    pub fn italic(&mut self) -> ComposerUpdate {
        self.toggle_mark(InlineMark::Italic)
    }

    pub fn underline(&mut self) -> ComposerUpdate {
        self.toggle_mark(InlineMark::Underline)
    }

    /// Toggle an inline mark.
    ///
    /// With a collapsed caret the mark is remembered for the next insertion.
    /// Over a range it is removed if every selected character already has
    /// it and added everywhere otherwise.
    pub fn toggle_mark(&mut self, mark: InlineMark) -> ComposerUpdate {
        if self.is_restricted_zone() {
            debug!(%mark, "mark rejected in restricted zone");
            return ComposerUpdate::keep();
        }
        if self.selection.is_collapsed() {
            self.pending_marks = Some(self.insertion_marks().toggled(mark));
            return self.create_update_selection();
        }
        let segments = self.rich_segments();
        if segments.is_empty() {
            return ComposerUpdate::keep();
        }
        self.begin_edit();
        let active = self.mark_active_over(mark, &segments);
        for (block, slot, from, to) in segments {
            if let Some(content) = self.rich_slot_mut(block, slot) {
                content.apply_mark(from, to, mark, !active);
            }
        }
        self.finish_edit()
    }

    /// Whether `mark` applies at the selection: pending marks for a caret,
    /// every selected character otherwise.
    pub(crate) fn mark_active(&self, mark: InlineMark) -> bool {
        if self.selection.is_collapsed() {
            return self.insertion_marks().has(mark);
        }
        self.mark_active_over(mark, &self.rich_segments())
    }

    fn mark_active_over(
        &self,
        mark: InlineMark,
        segments: &[(usize, Slot, usize, usize)],
    ) -> bool {
        let mut seen = false;
        for &(block, slot, from, to) in segments {
            if from == to {
                continue;
            }
            let Some(content) = self.rich_slot(Point::new(block, slot, 0)) else {
                continue;
            };
            if !content.has_mark(from, to, mark) {
                return false;
            }
            seen = true;
        }
        seen
    }

    /// The selected parts of rich text slots.
    pub(crate) fn rich_segments(&self) -> Vec<(usize, Slot, usize, usize)> {
        self.document
            .text_segments(self.selection.start(), self.selection.end())
            .into_iter()
            .filter(|&(block, slot, _, _)| {
                self.rich_slot(Point::new(block, slot, 0)).is_some()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::document::{InlineMark, Point, Selection, Slot};
    use crate::{ActionState, Composer, ComposerAction};

    #[test]
    fn bold_over_a_range() {
        let mut model = Composer::from_html("<p>hello world</p>");
        model.select(Selection::within(0, Slot::Body, 0, 5));
        model.bold();
        assert_eq!(
            model.get_content_as_html(),
            "<p><strong>hello</strong> world</p>"
        );
        model.bold();
        assert_eq!(model.get_content_as_html(), "<p>hello world</p>");
    }

    #[test]
    fn partially_marked_range_is_marked_everywhere() {
        let mut model = Composer::from_html("<p><em>ab</em>cd</p>");
        model.select(Selection::within(0, Slot::Body, 0, 4));
        model.italic();
        assert_eq!(model.get_content_as_html(), "<p><em>abcd</em></p>");
    }

    #[test]
    fn marks_span_paragraphs_and_list_items() {
        let mut model = Composer::from_html("<p>ab</p><ul><li>cd</li></ul>");
        model.select(Selection::new(Point::body(0, 1), Point::new(1, Slot::Item(0), 1)));
        model.underline();
        assert_eq!(
            model.get_content_as_html(),
            "<p>a<u>b</u></p><ul><li><u>c</u>d</li></ul>"
        );
    }

    #[test]
    fn pending_mark_applies_to_typed_text() {
        let mut model = Composer::from_html("<p>ab</p>");
        let update = model.bold();
        assert_eq!(
            update.action_state(ComposerAction::Bold),
            Some(ActionState::Reversed)
        );
        model.replace_text("cd");
        assert_eq!(model.get_content_as_html(), "<p>ab<strong>cd</strong></p>");
    }

    #[test]
    fn moving_the_caret_drops_pending_marks() {
        let mut model = Composer::from_html("<p>ab</p>");
        model.italic();
        model.select(Selection::caret(Point::body(0, 1)));
        assert!(!model.mark_active(InlineMark::Italic));
    }

    #[test]
    fn marks_are_rejected_in_headings() {
        let mut model = Composer::from_html("<h2>Title</h2>");
        model.select(Selection::within(0, Slot::Body, 0, 5));
        assert!(model.bold().is_keep());
        assert_eq!(model.get_content_as_html(), "<h2>Title</h2>");
    }

    #[test]
    fn marks_are_rejected_in_captions() {
        let mut model = Composer::from_html(
            "<figure class=\"image align-center\"><img src=\"https://x.org/a.png\" alt=\"\"><figcaption>cap</figcaption></figure>",
        );
        model.select(Selection::within(0, Slot::Caption, 0, 3));
        assert!(model.italic().is_keep());
    }
}
