// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::document::inline::{char_len, char_to_byte};
use crate::document::{
    Block, Document, InlineContent, Marks, Point, Selection, Slot, MAX_ROWS,
};
use crate::{Composer, ComposerUpdate};

impl Composer {
    /// Replace the selection with `text`. Line breaks survive in rich
    /// slots and become spaces in plain ones.
    pub fn replace_text(&mut self, text: &str) -> ComposerUpdate {
        self.begin_edit();
        if self.insert_text(text) {
            self.finish_edit()
        } else {
            ComposerUpdate::keep()
        }
    }

    /// Replace the selection with `text` without touching the history.
    /// Returns false if there was nowhere to put it.
    pub(crate) fn insert_text(&mut self, text: &str) -> bool {
        let marks = self.insertion_marks();
        let caret = self.delete_selection();
        let caret = self.ensure_text_caret(caret);
        let Some(mut slot) = self
            .document
            .block_mut(caret.block)
            .and_then(|b| b.text_slot_mut(caret.slot))
        else {
            return false;
        };
        let text = if slot.is_rich() {
            text.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            text.to_owned()
        };
        let before = slot.len();
        slot.insert(caret.offset, &text, marks);
        let inserted = slot.len() - before;
        self.selection = Selection::caret(caret.with_offset(caret.offset + inserted));
        self.pending_marks = None;
        true
    }

    pub fn enter(&mut self) -> ComposerUpdate {
        if let Some(index) = self.document.selected_media() {
            self.begin_edit();
            self.document.deselect_all();
            let next = self.paragraph_after(index);
            self.selection = Selection::caret(Point::body(next, 0));
            return self.finish_edit();
        }
        let caret = self.selection.start();
        if matches!(caret.slot, Slot::Cell { .. } | Slot::Caption) {
            return ComposerUpdate::keep();
        }
        self.begin_edit();
        let caret = self.delete_selection();
        self.pending_marks = None;
        let b = caret.block;
        let new_caret = match &mut self.document.blocks_mut()[b] {
            Block::Paragraph { content, align } => {
                let tail = Block::Paragraph {
                    content: content.split_off(caret.offset),
                    align: *align,
                };
                self.document.blocks_mut().insert(b + 1, tail);
                Point::body(b + 1, 0)
            }
            Block::Heading { text, .. } | Block::Blockquote { text, .. } => {
                let len = char_len(text);
                if caret.offset >= len {
                    self.document.blocks_mut().insert(b + 1, Block::empty_paragraph());
                    Point::body(b + 1, 0)
                } else if caret.offset == 0 {
                    self.document.blocks_mut().insert(b, Block::empty_paragraph());
                    Point::body(b + 1, 0)
                } else {
                    let tail = split_plain_block(&mut self.document.blocks_mut()[b], caret.offset);
                    self.document.blocks_mut().insert(b + 1, tail);
                    Point::body(b + 1, 0)
                }
            }
            Block::List { kind, items } => {
                let Slot::Item(i) = caret.slot else {
                    return ComposerUpdate::keep();
                };
                if items.get(i).is_some_and(InlineContent::is_empty) {
                    let kind = *kind;
                    let after = items.split_off(i + 1);
                    items.truncate(i);
                    let exit = if items.is_empty() {
                        self.document.blocks_mut()[b] = Block::empty_paragraph();
                        b
                    } else {
                        self.document.blocks_mut().insert(b + 1, Block::empty_paragraph());
                        b + 1
                    };
                    if !after.is_empty() {
                        self.document.blocks_mut().insert(exit + 1, Block::list(kind, after));
                    }
                    Point::body(exit, 0)
                } else {
                    let tail = items[i].split_off(caret.offset);
                    items.insert(i + 1, tail);
                    Point::new(b, Slot::Item(i + 1), 0)
                }
            }
            Block::Media(_) | Block::HorizontalRule => {
                Point::body(self.paragraph_after(b), 0)
            }
            Block::Table(_) => return ComposerUpdate::keep(),
        };
        self.selection = Selection::caret(new_caret);
        self.finish_edit()
    }

    /// Delete the selection, or the grapheme before the caret. At the start
    /// of a block the block is merged with, or lifted out of, its
    /// surroundings.
    pub fn backspace(&mut self) -> ComposerUpdate {
        if self.document.selected_media().is_some() {
            return self.delete_block();
        }
        if !self.selection.is_collapsed() {
            return self.delete_range();
        }
        let caret = self.selection.focus;
        let Some(block) = self.document.block(caret.block) else {
            return ComposerUpdate::keep();
        };
        if let Some(slot) = block.text_slot(caret.slot) {
            if caret.offset > 0 {
                let text = slot.plain_text();
                let start = previous_grapheme(&text, caret.offset);
                return self.delete_in_slot(caret.with_offset(start), caret);
            }
        }
        self.begin_edit();
        if let Some(new_caret) = self.remove_empty_row(caret, false) {
            self.selection = Selection::caret(new_caret);
            return self.finish_edit();
        }
        let b = caret.block;
        let new_caret = match (&mut self.document.blocks_mut()[b], caret.slot) {
            (Block::Media(_), Slot::Body) => return self.delete_block(),
            (Block::HorizontalRule, _) => {
                self.document.blocks_mut().remove(b);
                self.document.clamp_point(Point::body(b, 0))
            }
            (Block::List { items, .. }, Slot::Item(i)) if i > 0 => {
                let tail = items.remove(i);
                let len = items[i - 1].len();
                items[i - 1].append(tail);
                Point::new(b, Slot::Item(i - 1), len)
            }
            (Block::List { items, .. }, Slot::Item(_)) => {
                let first = items.remove(0);
                self.document.blocks_mut().insert(b, Block::paragraph(first));
                Point::body(b, 0)
            }
            (Block::Heading { text, align, .. }, _)
            | (Block::Blockquote { text, align }, _) => {
                let paragraph = Block::Paragraph {
                    content: InlineContent::from_plain(text),
                    align: *align,
                };
                self.document.blocks_mut()[b] = paragraph;
                caret
            }
            (Block::Paragraph { .. }, _) if b > 0 => {
                let emptied = self.document.blocks()[b].is_empty_paragraph();
                match &mut self.document.blocks_mut()[b - 1] {
                    Block::Media(media) => {
                        media.selected = true;
                        if emptied {
                            self.document.blocks_mut().remove(b);
                        }
                        Point::body(b - 1, 0)
                    }
                    Block::HorizontalRule => {
                        self.document.blocks_mut().remove(b - 1);
                        Point::body(b - 1, 0)
                    }
                    Block::Table(_) if emptied => {
                        self.document.blocks_mut().remove(b);
                        self.document.last_point(b - 1)
                    }
                    Block::Table(_) => return ComposerUpdate::keep(),
                    _ => {
                        let start = self.document.last_point(b - 1);
                        self.delete_between(start, caret)
                    }
                }
            }
            _ => return ComposerUpdate::keep(),
        };
        self.selection = Selection::caret(new_caret);
        self.finish_edit()
    }

    /// Forward delete; the mirror image of [`Composer::backspace`].
    pub fn delete(&mut self) -> ComposerUpdate {
        if self.document.selected_media().is_some() {
            return self.delete_block();
        }
        if !self.selection.is_collapsed() {
            return self.delete_range();
        }
        let caret = self.selection.focus;
        let Some(block) = self.document.block(caret.block) else {
            return ComposerUpdate::keep();
        };
        if let Some(slot) = block.text_slot(caret.slot) {
            let text = slot.plain_text();
            if caret.offset < char_len(&text) {
                let end = next_grapheme(&text, caret.offset);
                return self.delete_in_slot(caret, caret.with_offset(end));
            }
        }
        self.begin_edit();
        if let Some(new_caret) = self.remove_empty_row(caret, true) {
            self.selection = Selection::caret(new_caret);
            return self.finish_edit();
        }
        let b = caret.block;
        let new_caret = match (&mut self.document.blocks_mut()[b], caret.slot) {
            (Block::Media(_), Slot::Body) => return self.delete_block(),
            (Block::HorizontalRule, _) => {
                self.document.blocks_mut().remove(b);
                self.document.clamp_point(Point::body(b, 0))
            }
            (Block::List { items, .. }, Slot::Item(i)) if i + 1 < items.len() => {
                let next = items.remove(i + 1);
                items[i].append(next);
                caret
            }
            (Block::Table(_), _) | (Block::Media(_), _) => {
                return ComposerUpdate::keep();
            }
            _ => {
                let emptied = self.document.blocks()[b].is_empty_paragraph();
                match self.document.blocks_mut().get_mut(b + 1) {
                    None => return ComposerUpdate::keep(),
                    Some(Block::Media(media)) => {
                        media.selected = true;
                        if emptied {
                            self.document.blocks_mut().remove(b);
                            Point::body(b, 0)
                        } else {
                            Point::body(b + 1, 0)
                        }
                    }
                    Some(Block::HorizontalRule) => {
                        self.document.blocks_mut().remove(b + 1);
                        caret
                    }
                    Some(Block::Table(_)) if emptied => {
                        self.document.blocks_mut().remove(b);
                        self.document.first_point(b)
                    }
                    Some(Block::Table(_)) => return ComposerUpdate::keep(),
                    Some(_) => {
                        let end = self.document.first_point(b + 1);
                        self.delete_between(caret, end)
                    }
                }
            }
        };
        self.selection = Selection::caret(new_caret);
        self.finish_edit()
    }

    /// Drop all content. One undo step.
    pub fn clear(&mut self) -> ComposerUpdate {
        debug!("clearing document");
        self.push_undo();
        self.document = Document::new();
        self.selection = Selection::default();
        self.pending_marks = None;
        self.finish_structural_edit()
    }

    /// Remove the body row under `caret` if all its cells are empty. The
    /// caret moves to the end of the previous row, or with `forward` to the
    /// start of the row that took its place. A table left without body rows
    /// is removed.
    fn remove_empty_row(&mut self, caret: Point, forward: bool) -> Option<Point> {
        let Slot::Cell { row, .. } = caret.slot else {
            return None;
        };
        let b = caret.block;
        let Some(Block::Table(table)) = self.document.blocks_mut().get_mut(b) else {
            return None;
        };
        if row == 0 || table.remove_emptied_rows(row..=row) == 0 {
            return None;
        }
        debug!(row, "removed empty table row");
        if table.body_row_count() == 0 {
            self.document.blocks_mut().remove(b);
            let point = if b > 0 {
                self.document.last_point(b - 1)
            } else {
                self.document.first_point(b)
            };
            return Some(self.document.clamp_point(point));
        }
        if forward && row <= table.body_row_count() {
            return Some(Point::new(b, Slot::Cell { row, column: 0 }, 0));
        }
        let column = table.column_count() - 1;
        let len = table.cell(row - 1, column).map_or(0, |c| char_len(c));
        Some(Point::new(b, Slot::Cell { row: row - 1, column }, len))
    }

    /// Marks the next typed character gets.
    pub(crate) fn insertion_marks(&self) -> Marks {
        if let Some(marks) = self.pending_marks {
            return marks;
        }
        let start = self.selection.start();
        self.rich_slot(start)
            .map(|content| content.marks_at(start.offset))
            .unwrap_or_default()
    }

    fn delete_range(&mut self) -> ComposerUpdate {
        self.begin_edit();
        let caret = self.delete_selection();
        self.selection = Selection::caret(caret);
        self.reset_if_emptied();
        self.finish_edit()
    }

    fn delete_in_slot(&mut self, start: Point, end: Point) -> ComposerUpdate {
        self.begin_edit();
        let caret = self.delete_between(start, end);
        self.selection = Selection::caret(caret);
        self.finish_edit()
    }

    /// Delete the current range, if any, returning where the caret lands.
    pub(crate) fn delete_selection(&mut self) -> Point {
        let (start, end) = (self.selection.start(), self.selection.end());
        if start == end {
            start
        } else {
            self.delete_between(start, end)
        }
    }

    /// Remove everything between two points and return the caret position.
    ///
    /// Text slots in the range are cleared first. Lists and tables cut by
    /// the range keep the part outside it; table body rows left with only
    /// empty cells are removed. Blocks entirely inside the range go, and
    /// when both ends are text blocks the text after `end` joins the slot
    /// at `start`.
    pub(crate) fn delete_between(&mut self, start: Point, end: Point) -> Point {
        let start = self.document.clamp_point(start);
        let end = self.document.clamp_point(end);
        if start.same_slot(&end) {
            if let Some(mut slot) = self
                .document
                .block_mut(start.block)
                .and_then(|b| b.text_slot_mut(start.slot))
            {
                slot.delete(start.offset, end.offset);
            }
            return start;
        }
        for (block, slot, from, to) in self.document.text_segments(start, end) {
            if let Some(mut text) = self
                .document
                .block_mut(block)
                .and_then(|b| b.text_slot_mut(slot))
            {
                text.delete(from, to);
            }
        }

        let blocks = self.document.blocks_mut();
        if start.block == end.block {
            join_slots(&mut blocks[start.block], start.slot, end.slot);
            return start;
        }

        let start_covered = is_wrapper(&blocks[start.block], start.slot);
        let end_covered = is_wrapper(&blocks[end.block], end.slot);
        if !start_covered {
            trim_back(&mut blocks[start.block], start.slot);
        }
        if !end_covered {
            trim_front(&mut blocks[end.block], end.slot);
        }

        let mut removed: Vec<usize> = (start.block + 1..end.block).collect();
        if start_covered {
            removed.push(start.block);
        }
        if end_covered {
            removed.push(end.block);
        } else if !start_covered
            && blocks[start.block].is_mergeable_text()
            && blocks[end.block].is_mergeable_text()
        {
            let (head, tail) = blocks.split_at_mut(end.block);
            let (moved, emptied) = take_first_slot(&mut tail[0]);
            if let Some(mut slot) = head[start.block].text_slot_mut(start.slot) {
                slot.insert_content(start.offset, moved);
            }
            if emptied {
                removed.push(end.block);
            }
        }
        let mut index = 0;
        blocks.retain(|_| {
            let keep = !removed.contains(&index);
            index += 1;
            keep
        });

        if start_covered {
            self.document.clamp_point(self.document.first_point(start.block))
        } else {
            start
        }
    }

    /// Put the caret in a text slot, adding a paragraph after a selected
    /// media block or a caret parked on a wrapper.
    pub(crate) fn ensure_text_caret(&mut self, caret: Point) -> Point {
        let target = match self.document.selected_media() {
            Some(index) => index,
            None => {
                let has_text = self
                    .document
                    .block(caret.block)
                    .and_then(|b| b.text_slot(caret.slot))
                    .is_some();
                if has_text {
                    return caret;
                }
                caret.block
            }
        };
        self.document.deselect_all();
        Point::body(self.paragraph_after(target), 0)
    }

    /// Index of an empty paragraph right after `index`, inserting one if
    /// needed.
    pub(crate) fn paragraph_after(&mut self, index: usize) -> usize {
        let next = index + 1;
        if !self.document.block(next).is_some_and(Block::is_empty_paragraph) {
            self.document.blocks_mut().insert(next, Block::empty_paragraph());
        }
        next
    }
}

fn previous_grapheme(text: &str, offset: usize) -> usize {
    let byte = char_to_byte(text, offset);
    text[..byte]
        .grapheme_indices(true)
        .next_back()
        .map_or(0, |(index, _)| char_len(&text[..index]))
}

fn next_grapheme(text: &str, offset: usize) -> usize {
    let byte = char_to_byte(text, offset);
    text[byte..]
        .graphemes(true)
        .next()
        .map_or(offset, |g| offset + char_len(g))
}

fn is_wrapper(block: &Block, slot: Slot) -> bool {
    slot == Slot::Body && block.text_slot(Slot::Body).is_none()
}

/// Split a heading or blockquote into two of the same kind.
fn split_plain_block(block: &mut Block, offset: usize) -> Block {
    let mut tail = block.clone();
    if let (Some(mut head), Some(mut rest)) = (
        block.text_slot_mut(Slot::Body),
        tail.text_slot_mut(Slot::Body),
    ) {
        head.split_off(offset);
        rest.delete(0, offset);
    }
    tail
}

/// Within one block, merge the slot at `end` into the one at `start`.
fn join_slots(block: &mut Block, start: Slot, end: Slot) {
    match (block, start, end) {
        (Block::List { items, .. }, Slot::Item(i), Slot::Item(j)) if i < j => {
            let tail = std::mem::take(&mut items[j]);
            items[i].append(tail);
            items.drain(i + 1..=j);
        }
        (Block::Table(table), Slot::Cell { row: first, .. }, Slot::Cell { row: last, .. }) => {
            table.remove_emptied_rows(first.max(1)..=last);
        }
        _ => {}
    }
}

/// Drop the parts of a block after the slot a deletion starts in.
fn trim_back(block: &mut Block, slot: Slot) {
    match (block, slot) {
        (Block::List { items, .. }, Slot::Item(i)) => items.truncate(i + 1),
        (Block::Table(table), Slot::Cell { row, .. }) => {
            table.remove_emptied_rows(row.max(1)..=MAX_ROWS);
        }
        _ => {}
    }
}

/// Drop the parts of a block before the slot a deletion ends in.
fn trim_front(block: &mut Block, slot: Slot) {
    match (block, slot) {
        (Block::List { items, .. }, Slot::Item(j)) => {
            items.drain(..j.min(items.len()));
        }
        (Block::Table(table), Slot::Cell { row, .. }) => {
            table.remove_emptied_rows(1..=row);
        }
        _ => {}
    }
}

/// Take the text of a block's first slot, returning it and whether the
/// block has nothing left.
fn take_first_slot(block: &mut Block) -> (InlineContent, bool) {
    match block {
        Block::Paragraph { content, .. } => (std::mem::take(content), true),
        Block::Heading { text, .. } | Block::Blockquote { text, .. } => {
            (InlineContent::from_plain(&std::mem::take(text)), true)
        }
        Block::List { items, .. } if !items.is_empty() => {
            let first = items.remove(0);
            (first, items.is_empty())
        }
        _ => (InlineContent::new(), false),
    }
}
