// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Structural formatting: headings, blockquotes, lists, alignment and
//! horizontal rules.
//!
//! Converting between text blocks goes through "lines": one line per
//! paragraph, heading or quote, and one per list item. Lines keep their
//! inline content when they land in a paragraph or list item and are
//! flattened to plain text when they land in a heading or quote.

use tracing::debug;

use crate::document::{
    Alignment, Block, HeadingLevel, InlineContent, ListKind, Point, Selection,
    Slot,
};
use crate::{Composer, ComposerUpdate};

struct Line {
    content: InlineContent,
    align: Alignment,
}

impl Line {
    fn into_paragraph(self) -> Block {
        Block::Paragraph {
            content: self.content,
            align: self.align,
        }
    }

    fn into_heading(self, level: HeadingLevel) -> Block {
        let mut block = Block::heading(level, &self.content.plain_text());
        block.set_align(self.align);
        block
    }

    fn into_blockquote(self) -> Block {
        let mut block = Block::blockquote(&self.content.plain_text());
        block.set_align(self.align);
        block
    }
}

fn lines_of(block: &Block) -> Vec<Line> {
    match block {
        Block::Paragraph { content, align } => vec![Line {
            content: content.clone(),
            align: *align,
        }],
        Block::Heading { text, align, .. } | Block::Blockquote { text, align } => {
            vec![Line {
                content: InlineContent::from_plain(text),
                align: *align,
            }]
        }
        Block::List { items, .. } => items
            .iter()
            .map(|item| Line {
                content: item.clone(),
                align: Alignment::Left,
            })
            .collect(),
        Block::Table(_) | Block::Media(_) | Block::HorizontalRule => Vec::new(),
    }
}

fn is_line_block(block: &Block) -> bool {
    matches!(
        block,
        Block::Paragraph { .. }
            | Block::Heading { .. }
            | Block::Blockquote { .. }
            | Block::List { .. }
    )
}

impl Composer {
    /// Turn the selected blocks into headings of `level`, or back into
    /// paragraphs if they all already are.
    pub fn toggle_heading(&mut self, level: HeadingLevel) -> ComposerUpdate {
        let Some((first, last)) = self.line_block_range() else {
            debug!(%level, "heading rejected outside text blocks");
            return ComposerUpdate::keep();
        };
        let all_match = self.document.blocks()[first..=last]
            .iter()
            .all(|b| matches!(b, Block::Heading { level: l, .. } if *l == level));
        self.begin_edit();
        if all_match {
            self.convert_lines(first, last, Line::into_paragraph);
        } else {
            self.convert_lines(first, last, |line| line.into_heading(level));
        }
        self.finish_edit()
    }

    /// Turn the selected blocks into blockquotes, or back into paragraphs.
    /// List items each become a quote of their own.
    pub fn toggle_blockquote(&mut self) -> ComposerUpdate {
        let Some((first, last)) = self.line_block_range() else {
            debug!("blockquote rejected outside text blocks");
            return ComposerUpdate::keep();
        };
        let all_match = self.document.blocks()[first..=last]
            .iter()
            .all(|b| matches!(b, Block::Blockquote { .. }));
        self.begin_edit();
        if all_match {
            self.convert_lines(first, last, Line::into_paragraph);
        } else {
            self.convert_lines(first, last, Line::into_blockquote);
        }
        self.finish_edit()
    }

    pub fn ordered_list(&mut self) -> ComposerUpdate {
        self.toggle_list(ListKind::Ordered)
    }

    pub fn unordered_list(&mut self) -> ComposerUpdate {
        self.toggle_list(ListKind::Unordered)
    }

    /// Gather the selected blocks into one list of `kind`, joined with
    /// neighbouring lists of the same kind. If they already all are such
    /// lists, every item becomes a paragraph instead.
    pub fn toggle_list(&mut self, kind: ListKind) -> ComposerUpdate {
        let Some((first, last)) = self.line_block_range() else {
            debug!(%kind, "list rejected outside text blocks");
            return ComposerUpdate::keep();
        };
        let all_match = self.document.blocks()[first..=last]
            .iter()
            .all(|b| matches!(b, Block::List { kind: k, .. } if *k == kind));
        self.begin_edit();
        if all_match {
            self.convert_lines(first, last, Line::into_paragraph);
        } else {
            let lines: Vec<InlineContent> = self.document.blocks()[first..=last]
                .iter()
                .flat_map(lines_of)
                .map(|line| line.content)
                .collect();
            self.splice_lines(first, last, vec![Block::list(kind, lines)], |line| {
                (0, Slot::Item(line))
            });
            if self.join_lists(first) {
                debug!("joined with following list");
            }
            if first > 0 && self.join_lists(first - 1) {
                debug!("joined with preceding list");
            }
        }
        self.finish_edit()
    }

    /// Align the selected media block, or every selected text block.
    pub fn set_alignment(&mut self, align: Alignment) -> ComposerUpdate {
        let range = self.selected_blocks();
        let needs_change = self.document.blocks()[range.clone()]
            .iter()
            .any(|b| b.align().is_some_and(|current| current != align));
        if !needs_change {
            return ComposerUpdate::keep();
        }
        self.begin_edit();
        for block in &mut self.document.blocks_mut()[range] {
            block.set_align(align);
        }
        self.finish_edit()
    }

    pub fn insert_horizontal_rule(&mut self) -> ComposerUpdate {
        self.begin_edit();
        let index = self.insert_block_at_caret(Block::HorizontalRule);
        let next = index + 1;
        let followed_by_text = self
            .document
            .block(next)
            .is_some_and(|b| is_line_block(b) && !b.is_restricted());
        if !followed_by_text {
            self.document.blocks_mut().insert(next, Block::empty_paragraph());
        }
        self.selection = Selection::caret(self.document.first_point(next));
        self.finish_edit()
    }

    /// Insert a block at the caret, splitting the paragraph it is in.
    /// An empty paragraph is replaced. Returns the new block's index.
    pub(crate) fn insert_block_at_caret(&mut self, block: Block) -> usize {
        let caret = self.delete_selection();
        self.pending_marks = None;
        if let Some(index) = self.document.selected_media() {
            self.document.deselect_all();
            self.document.blocks_mut().insert(index + 1, block);
            return index + 1;
        }
        let b = caret.block;
        let blocks = self.document.blocks_mut();
        match &mut blocks[b] {
            Block::Paragraph { content, .. } if content.is_empty() => {
                blocks[b] = block;
                b
            }
            Block::Paragraph { .. } if caret.offset == 0 => {
                blocks.insert(b, block);
                b
            }
            Block::Paragraph { content, align } if caret.offset < content.len() => {
                let tail = Block::Paragraph {
                    content: content.split_off(caret.offset),
                    align: *align,
                };
                blocks.insert(b + 1, tail);
                blocks.insert(b + 1, block);
                b + 1
            }
            _ => {
                blocks.insert(b + 1, block);
                b + 1
            }
        }
    }

    /// The selected blocks, if all of them can be converted line by line.
    fn line_block_range(&self) -> Option<(usize, usize)> {
        if self.document.selected_media().is_some() {
            return None;
        }
        let (first, last) = (self.selection.start().block, self.selection.end().block);
        let blocks = self.document.blocks().get(first..=last)?;
        blocks.iter().all(is_line_block).then_some((first, last))
    }

    /// Rebuild blocks `first..=last` one block per line.
    fn convert_lines(
        &mut self,
        first: usize,
        last: usize,
        convert: impl Fn(Line) -> Block,
    ) {
        let replacement: Vec<Block> = self.document.blocks()[first..=last]
            .iter()
            .flat_map(lines_of)
            .map(convert)
            .collect();
        self.splice_lines(first, last, replacement, |line| (line, Slot::Body));
    }

    /// Replace blocks `first..=last` and carry the selection over. `locate`
    /// maps a line number to the block (relative to `first`) and slot the
    /// line ended up in.
    fn splice_lines(
        &mut self,
        first: usize,
        last: usize,
        replacement: Vec<Block>,
        locate: impl Fn(usize) -> (usize, Slot),
    ) {
        let mut bases = Vec::with_capacity(last - first + 1);
        let mut total = 0;
        for block in &self.document.blocks()[first..=last] {
            bases.push(total);
            total += lines_of(block).len();
        }
        let old_count = last - first + 1;
        let new_count = replacement.len();
        self.document.blocks_mut().splice(first..=last, replacement);
        self.remap_selection(|p| {
            if p.block < first {
                p
            } else if p.block > last {
                Point {
                    block: p.block + new_count - old_count,
                    ..p
                }
            } else {
                let within = match p.slot {
                    Slot::Item(i) => i,
                    _ => 0,
                };
                let (delta, slot) = locate(bases[p.block - first] + within);
                Point::new(first + delta, slot, p.offset)
            }
        });
    }

    /// Merge the list at `left + 1` into the list at `left` when both have
    /// the same kind.
    fn join_lists(&mut self, left: usize) -> bool {
        let blocks = self.document.blocks();
        let same_kind = match (blocks.get(left), blocks.get(left + 1)) {
            (Some(Block::List { kind: a, .. }), Some(Block::List { kind: b, .. })) => a == b,
            _ => false,
        };
        if !same_kind {
            return false;
        }
        let moved = match self.document.blocks_mut().remove(left + 1) {
            Block::List { items, .. } => items,
            _ => return false,
        };
        let offset = match &mut self.document.blocks_mut()[left] {
            Block::List { items, .. } => {
                let offset = items.len();
                items.extend(moved);
                offset
            }
            _ => return false,
        };
        self.remap_selection(|p| {
            if p.block == left + 1 {
                let item = match p.slot {
                    Slot::Item(i) => i,
                    _ => 0,
                };
                Point::new(left, Slot::Item(offset + item), p.offset)
            } else if p.block > left + 1 {
                Point {
                    block: p.block - 1,
                    ..p
                }
            } else {
                p
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::document::{Alignment, HeadingLevel, ListKind, Point, Selection, Slot};
    use crate::Composer;

    #[test]
    fn heading_toggles_back_to_a_paragraph() {
        let mut model = Composer::from_html("<p>Title</p>");
        model.toggle_heading(HeadingLevel::H2);
        assert_eq!(model.get_content_as_html(), "<h2>Title</h2>");
        model.toggle_heading(HeadingLevel::H2);
        assert_eq!(model.get_content_as_html(), "<p>Title</p>");
    }

    #[test]
    fn switching_heading_level() {
        let mut model = Composer::from_html("<h2>Title</h2>");
        model.toggle_heading(HeadingLevel::H3);
        assert_eq!(model.get_content_as_html(), "<h3>Title</h3>");
    }

    #[test]
    fn heading_drops_marks_and_links() {
        let mut model = Composer::from_html(
            "<p><strong>Big</strong> <a href=\"https://x.org\">news</a></p>",
        );
        model.toggle_heading(HeadingLevel::H2);
        assert_eq!(model.get_content_as_html(), "<h2>Big news</h2>");
    }

    #[test]
    fn list_on_a_blockquote_clears_the_quote() {
        let mut model = Composer::from_html("<blockquote>quoted</blockquote>");
        model.toggle_list(ListKind::Unordered);
        assert_eq!(model.get_content_as_html(), "<ul><li>quoted</li></ul>");
        model.toggle_blockquote();
        assert_eq!(
            model.get_content_as_html(),
            "<blockquote>quoted</blockquote>"
        );
    }

    #[test]
    fn list_over_several_paragraphs_is_one_list() {
        let mut model = Composer::from_html("<p>a</p><p><em>b</em></p><p>c</p>");
        model.select(Selection::new(Point::body(0, 0), Point::body(2, 1)));
        model.toggle_list(ListKind::Ordered);
        assert_eq!(
            model.get_content_as_html(),
            "<ol><li>a</li><li><em>b</em></li><li>c</li></ol>"
        );
        assert_eq!(model.selection().focus, Point::new(0, Slot::Item(2), 1));
        model.toggle_list(ListKind::Ordered);
        assert_eq!(
            model.get_content_as_html(),
            "<p>a</p><p><em>b</em></p><p>c</p>"
        );
    }

    #[test]
    fn new_list_joins_its_neighbours() {
        let mut model =
            Composer::from_html("<ul><li>a</li></ul><p>b</p><ul><li>c</li></ul>");
        model.select(Selection::caret(Point::body(1, 1)));
        model.toggle_list(ListKind::Unordered);
        assert_eq!(
            model.get_content_as_html(),
            "<ul><li>a</li><li>b</li><li>c</li></ul>"
        );
        assert_eq!(model.selection(), Selection::caret(Point::new(0, Slot::Item(1), 1)));
    }

    #[test]
    fn switching_list_kind_converts_the_list() {
        let mut model = Composer::from_html("<ul><li>a</li><li>b</li></ul>");
        model.toggle_list(ListKind::Ordered);
        assert_eq!(model.get_content_as_html(), "<ol><li>a</li><li>b</li></ol>");
    }

    #[test]
    fn structural_toggles_are_rejected_on_tables() {
        let mut model = Composer::new();
        model.insert_table();
        assert!(model.toggle_heading(HeadingLevel::H2).is_keep());
        assert!(model.toggle_list(ListKind::Ordered).is_keep());
    }

    #[test]
    fn alignment_applies_to_text_blocks() {
        let mut model = Composer::from_html("<p>a</p><h2>b</h2>");
        model.select_all();
        model.set_alignment(Alignment::Right);
        assert_eq!(
            model.get_content_as_html(),
            "<p class=\"align-right\">a</p><h2 class=\"align-right\">b</h2>"
        );
        assert!(model.set_alignment(Alignment::Right).is_keep());
    }

    #[test]
    fn alignment_applies_to_the_selected_media_only() {
        let mut model = Composer::from_html("<p>a</p>");
        model.insert_media(crate::MediaSource::image("https://x.org/a.png"));
        model.select_media(1);
        model.set_alignment(Alignment::Left);
        assert_eq!(
            model.get_content_as_html(),
            "<p>a</p><figure class=\"image align-left\"><img src=\"https://x.org/a.png\" alt=\"\"></figure><p></p>"
        );
    }

    #[test]
    fn horizontal_rule_splits_a_paragraph() {
        let mut model = Composer::from_html("<p>abcd</p>");
        model.select(Selection::caret(Point::body(0, 2)));
        model.insert_horizontal_rule();
        assert_eq!(model.get_content_as_html(), "<p>ab</p><hr><p>cd</p>");
        assert_eq!(model.selection(), Selection::caret(Point::body(2, 0)));
    }

    #[test]
    fn horizontal_rule_at_the_end_adds_a_paragraph() {
        let mut model = Composer::from_html("<p>ab</p>");
        model.insert_horizontal_rule();
        assert_eq!(model.get_content_as_html(), "<p>ab</p><hr><p></p>");
        assert_eq!(model.selection(), Selection::caret(Point::body(2, 0)));
    }
}
