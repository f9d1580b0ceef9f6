// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use pulldown_cmark::{html::push_html, Options, Parser};
use tracing::{debug, warn};

use crate::collaborators::{ImageFile, MarkupCleaner, PendingUpload};
use crate::document::{Block, Document, Point, Selection};
use crate::dom::parser::parse_html;
use crate::error::HtmlParseError;
use crate::{Composer, ComposerUpdate};

/// What the host received from a paste or drop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InsertionEvent {
    pub image: Option<ImageFile>,
    pub html: Option<String>,
    pub plain_text: String,
}

impl InsertionEvent {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            ..Self::default()
        }
    }

    pub fn html(html: impl Into<String>, plain_text: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            plain_text: plain_text.into(),
            ..Self::default()
        }
    }

    pub fn image(file: ImageFile) -> Self {
        Self {
            image: Some(file),
            ..Self::default()
        }
    }
}

/// Result of an insertion. `upload` is set when an image upload was
/// started and the host has to drive it.
#[derive(Debug)]
pub struct Insertion {
    pub update: ComposerUpdate,
    pub upload: Option<PendingUpload>,
}

impl Insertion {
    pub(crate) fn keep() -> Self {
        ComposerUpdate::keep().into()
    }
}

impl From<ComposerUpdate> for Insertion {
    fn from(update: ComposerUpdate) -> Self {
        Self {
            update,
            upload: None,
        }
    }
}

impl Composer {
    /// Insert pasted or dropped content at the caret.
    ///
    /// An image goes to the upload pipeline when an uploader is present.
    /// Headings, blockquotes, captions and table cells only take the plain
    /// text. Elsewhere markup is cleaned and mapped onto blocks, falling
    /// back to the plain text when nothing usable is left. A paste is
    /// always one undo step.
    pub fn paste(&mut self, event: InsertionEvent) -> Insertion {
        let InsertionEvent {
            image,
            html,
            plain_text,
        } = event;
        if let Some(file) = image {
            if self.collaborators.has_uploader() {
                return self.insert_image_file(file);
            }
            debug!("no uploader, pasted image ignored");
        }
        if self.is_restricted_zone() {
            return self.paste_plain(&plain_text).into();
        }
        if let Some(blocks) = html.as_deref().and_then(|html| self.clean_markup(html)) {
            return self.paste_blocks(blocks).into();
        }
        self.paste_plain(&plain_text).into()
    }

    /// Replace the whole document with persisted HTML. The history starts
    /// over from the loaded state.
    pub fn set_content_from_html(
        &mut self,
        html: &str,
    ) -> Result<ComposerUpdate, HtmlParseError> {
        let blocks = match parse_html(html) {
            Ok(blocks) => blocks,
            Err(HtmlParseError::Empty) => Vec::new(),
            Err(error) => return Err(error),
        };
        self.document = Document::from_blocks(blocks);
        self.pending_marks = None;
        self.repair();
        self.selection = Selection::caret(self.document.end_point());
        self.history.reset(self.snapshot());
        Ok(self.create_update_replace_all())
    }

    /// Replace the whole document with Markdown, converted to HTML first.
    pub fn set_content_from_markdown(
        &mut self,
        markdown: &str,
    ) -> Result<ComposerUpdate, HtmlParseError> {
        let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);
        let mut html = String::new();
        push_html(&mut html, parser);
        self.set_content_from_html(&html)
    }

    /// Blocks to paste from raw markup, or `None` to fall back to text.
    fn clean_markup(&self, raw: &str) -> Option<Vec<Block>> {
        let cleaned = match &self.collaborators.cleaner {
            Some(cleaner) => match cleaner.sanitize(raw) {
                Some(cleaned) => cleaned,
                None => {
                    warn!("markup cleaner gave up, pasting plain text");
                    return None;
                }
            },
            None => raw.to_owned(),
        };
        match parse_html(&cleaned) {
            Ok(blocks) => Some(blocks),
            Err(error) => {
                warn!(%error, "pasted markup unusable, pasting plain text");
                None
            }
        }
    }

    fn paste_plain(&mut self, text: &str) -> ComposerUpdate {
        if text.is_empty() {
            return ComposerUpdate::keep();
        }
        self.push_undo();
        if !self.insert_text(text) {
            return ComposerUpdate::keep();
        }
        self.finish_structural_edit()
    }

    fn paste_blocks(&mut self, blocks: Vec<Block>) -> ComposerUpdate {
        self.push_undo();
        self.insert_blocks(blocks);
        self.finish_structural_edit()
    }

    /// Splice `blocks` in at the caret. A lone paragraph landing in rich
    /// text is merged inline; anything else splits the paragraph under the
    /// caret and goes between its halves.
    fn insert_blocks(&mut self, mut blocks: Vec<Block>) {
        self.pending_marks = None;
        let caret = self.delete_selection();
        let caret = self.ensure_text_caret(caret);

        if let [Block::Paragraph { .. }] = blocks.as_slice() {
            if self.rich_slot(caret).is_some() {
                if let Some(Block::Paragraph { content, .. }) = blocks.pop() {
                    let len = content.len();
                    if let Some(target) = self.rich_slot_mut(caret.block, caret.slot) {
                        target.insert_content(caret.offset, content);
                    }
                    self.selection = Selection::caret(caret.with_offset(caret.offset + len));
                }
                return;
            }
        }

        let count = blocks.len();
        let b = caret.block;
        let document = self.document.blocks_mut();
        let mut at = b + 1;
        if let Block::Paragraph { content, align } = &mut document[b] {
            let tail = content.split_off(caret.offset);
            let align = *align;
            let emptied = content.is_empty();
            if !tail.is_empty() {
                document.insert(b + 1, Block::Paragraph { content: tail, align });
            }
            if emptied {
                document.remove(b);
                at = b;
            }
        }
        document.splice(at..at, blocks);

        let last = at + count - 1;
        let end = self.document.last_point(last);
        let in_text = self
            .document
            .block(last)
            .and_then(|block| block.text_slot(end.slot))
            .is_some();
        let caret = if in_text {
            end
        } else {
            let next = self.document.first_point(last + 1);
            let next_is_text = self
                .document
                .block(last + 1)
                .and_then(|block| block.text_slot(next.slot))
                .is_some();
            if next_is_text {
                next
            } else {
                Point::body(self.paragraph_after(last), 0)
            }
        };
        self.selection = Selection::caret(caret);
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::collaborators::{Collaborators, ImageFile};
    use crate::document::{Point, Selection, Slot};
    use crate::error::HtmlParseError;
    use crate::{Composer, InsertionEvent};

    #[test]
    fn plain_paste_into_a_paragraph() {
        let mut model = Composer::from_html("<p>ab</p>");
        model.select(Selection::caret(Point::body(0, 1)));
        model.paste(InsertionEvent::plain("xy"));
        assert_eq!(model.get_content_as_html(), "<p>axyb</p>");
        assert_eq!(model.selection(), Selection::caret(Point::body(0, 3)));
    }

    #[test]
    fn a_single_pasted_paragraph_merges_inline() {
        let mut model = Composer::from_html("<p>ab</p>");
        model.select(Selection::caret(Point::body(0, 1)));
        model.paste(InsertionEvent::html("<p><strong>x</strong></p>", "x"));
        assert_eq!(model.get_content_as_html(), "<p>a<strong>x</strong>b</p>");
    }

    #[test]
    fn pasted_blocks_split_the_paragraph() {
        let mut model = Composer::from_html("<p>beforeafter</p>");
        model.select(Selection::caret(Point::body(0, 6)));
        model.paste(InsertionEvent::html(
            "<h2>Title</h2><ul><li>one</li></ul>",
            "Title\none",
        ));
        assert_eq!(
            model.get_content_as_html(),
            "<p>before</p><h2>Title</h2><ul><li>one</li></ul><p>after</p>"
        );
        assert_eq!(
            model.selection(),
            Selection::caret(Point::new(2, Slot::Item(0), 3))
        );
    }

    #[test]
    fn unsupported_markup_is_dropped() {
        let mut model = Composer::new();
        model.paste(InsertionEvent::html(
            indoc! {r#"
                <div style="color: red" onclick="evil()">
                    <h1>Big</h1>
                    <script>alert(1)</script>
                    <p><span class="x">kept</span></p>
                </div>
            "#},
            "Big kept",
        ));
        assert_eq!(model.get_content_as_html(), "<h2>Big</h2><p>kept</p>");
    }

    #[test]
    fn restricted_zones_take_plain_text_only() {
        let mut model = Composer::from_html("<h2>Title</h2>");
        model.paste(InsertionEvent::html("<p><strong>bold</strong></p>", "bold"));
        assert_eq!(model.get_content_as_html(), "<h2>Titlebold</h2>");
    }

    #[test]
    fn a_failing_cleaner_falls_back_to_plain_text() {
        let mut model = Composer::new().with_collaborators(
            Collaborators::new().with_cleaner(|_: &str| None::<String>),
        );
        model.paste(InsertionEvent::html("<h2>x</h2>", "plain"));
        assert_eq!(model.get_content_as_html(), "<p>plain</p>");
    }

    #[test]
    fn image_without_uploader_uses_the_fallback() {
        let mut model = Composer::new();
        let mut event = InsertionEvent::image(ImageFile::new("a.png", "image/png", vec![1]));
        event.plain_text = "caption".to_owned();
        let insertion = model.paste(event);
        assert!(insertion.upload.is_none());
        assert_eq!(model.get_content_as_html(), "<p>caption</p>");
    }

    #[test]
    fn paste_is_one_undo_step() {
        let mut model = Composer::from_html("<p>a</p>");
        model.paste(InsertionEvent::html("<p>b</p><p>c</p>", "b c"));
        assert_eq!(model.get_content_as_html(), "<p>a</p><p>b</p><p>c</p>");
        model.undo();
        assert_eq!(model.get_content_as_html(), "<p>a</p>");
        model.redo();
        assert_eq!(model.get_content_as_html(), "<p>a</p><p>b</p><p>c</p>");
    }

    #[test]
    fn empty_paste_changes_nothing() {
        let mut model = Composer::from_html("<p>a</p>");
        assert!(model.paste(InsertionEvent::plain("")).update.is_keep());
        assert_eq!(model.history().len(), 1);
    }

    #[test]
    fn loading_html_resets_history() {
        let mut model = Composer::new();
        model.replace_text("typed");
        model.push_undo();
        model
            .set_content_from_html("<p>loaded</p><hr><p>end</p>")
            .unwrap();
        assert_eq!(model.history().len(), 1);
        assert!(!model.history().can_undo());
        assert_eq!(model.selection(), Selection::caret(Point::body(2, 3)));
    }

    #[test]
    fn loading_nothing_gives_an_empty_document() {
        let mut model = Composer::from_html("<p>x</p>");
        model.set_content_from_html("<script>x</script>").unwrap();
        assert_eq!(model.get_content_as_html(), "");
        assert!(matches!(
            crate::parse_html(""),
            Err(HtmlParseError::Empty)
        ));
    }

    #[test]
    fn markdown_is_loaded_through_html() {
        let mut model = Composer::new();
        model
            .set_content_from_markdown(indoc! {"
                # Title

                Some **bold** and *soft* text.

                1. one
                2. two

                > quoted
            "})
            .unwrap();
        assert_eq!(
            model.get_content_as_html(),
            "<h2>Title</h2><p>Some <strong>bold</strong> and <em>soft</em> text.</p>\
             <ol><li>one</li><li>two</li></ol><blockquote>quoted</blockquote>"
        );
    }

    #[test]
    fn markdown_tables_become_tables() {
        let mut model = Composer::new();
        model
            .set_content_from_markdown(indoc! {"
                | A | B |
                |---|---|
                | 1 | 2 |
            "})
            .unwrap();
        assert_eq!(
            model.get_content_as_html(),
            "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
    }
}
