// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The typed block model.
//!
//! A [`Document`] is a flat, ordered list of [`Block`]s. Nested structure
//! exists only inside lists (items) and tables (cells); nothing can nest a
//! block inside another block.

mod block;
pub mod inline;
mod media;
mod point;
pub(crate) mod repair;
mod table;

pub use block::{
    Alignment, Block, BlockKind, HeadingLevel, ListKind, TextSlot, TextSlotMut,
};
pub use inline::{InlineContent, InlineMark, Marks, TextRun};
pub use media::{MediaBlock, MediaSource, UploadTicket};
pub(crate) use media::is_web_url;
pub use point::{Point, Selection, Slot};
pub use table::{Table, MAX_COLUMNS, MAX_ROWS, MIN_COLUMNS};

use content_policy::ContentStats;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding one empty paragraph.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::empty_paragraph()],
        }
    }

    /// Wrap the given blocks. An empty list becomes a single empty
    /// paragraph.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut document = Self { blocks };
        repair::repair(&mut document);
        document
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// True when the document holds no visible text and no media.
    pub fn is_content_empty(&self) -> bool {
        !self.has_text() && self.media_count() == 0
    }

    pub fn has_text(&self) -> bool {
        self.blocks.iter().any(Block::has_text)
    }

    pub fn media_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Media(_)))
            .count()
    }

    pub fn list_item_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| match b {
                Block::List { items, .. } => items.len(),
                _ => 0,
            })
            .sum()
    }

    /// Visible text, one line per text slot.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Measurements the content policy needs.
    pub fn content_stats(&self) -> ContentStats {
        ContentStats::new(self.plain_text())
            .with_media(self.media_count())
            .with_list_items(self.list_item_count())
    }

    /// Index of the selected media block, if any.
    pub fn selected_media(&self) -> Option<usize> {
        self.blocks
            .iter()
            .position(|b| b.as_media().is_some_and(MediaBlock::is_selected))
    }

    /// Clear the selection flag on every media block. Returns whether any
    /// flag changed.
    pub(crate) fn deselect_all(&mut self) -> bool {
        let mut changed = false;
        for media in self.blocks.iter_mut().filter_map(Block::as_media_mut) {
            changed |= media.selected;
            media.selected = false;
        }
        changed
    }

    pub fn first_point(&self, block: usize) -> Point {
        let slot = self
            .block(block)
            .and_then(|b| b.slots().first().copied())
            .unwrap_or(Slot::Body);
        Point::new(block, slot, 0)
    }

    pub fn last_point(&self, block: usize) -> Point {
        let Some(b) = self.block(block) else {
            return Point::default();
        };
        let slot = b
            .slots()
            .into_iter()
            .filter(|s| *s != Slot::Caption)
            .next_back()
            .unwrap_or(Slot::Body);
        Point::new(block, slot, b.slot_len(slot).unwrap_or(0))
    }

    pub fn end_point(&self) -> Point {
        self.last_point(self.blocks.len().saturating_sub(1))
    }

    /// Pull a point back inside the document.
    pub fn clamp_point(&self, point: Point) -> Point {
        if self.blocks.is_empty() {
            return Point::default();
        }
        if point.block >= self.blocks.len() {
            return self.end_point();
        }
        let block = &self.blocks[point.block];
        match block.slot_len(point.slot) {
            Some(len) => point.with_offset(point.offset.min(len)),
            None => {
                // The slot vanished (row or item removed); find the nearest
                // surviving slot before it.
                let slot = block
                    .slots()
                    .into_iter()
                    .filter(|s| *s <= point.slot)
                    .next_back()
                    .unwrap_or_else(|| self.first_point(point.block).slot);
                let len = block.slot_len(slot).unwrap_or(0);
                Point::new(point.block, slot, len)
            }
        }
    }

    pub fn clamp_selection(&self, selection: Selection) -> Selection {
        Selection::new(
            self.clamp_point(selection.anchor),
            self.clamp_point(selection.focus),
        )
    }

    /// Every text slot between two points, with the char range covered in
    /// each. Slots without text (media wrappers, rules) are skipped.
    pub fn text_segments(
        &self,
        start: Point,
        end: Point,
    ) -> Vec<(usize, Slot, usize, usize)> {
        let mut segments = Vec::new();
        let last_block = end.block.min(self.len().saturating_sub(1));
        for block_index in start.block..=last_block {
            let block = &self.blocks[block_index];
            for slot in block.slots() {
                if (block_index == start.block && slot < start.slot)
                    || (block_index == end.block && slot > end.slot)
                {
                    continue;
                }
                let Some(len) = block.text_slot(slot).map(|s| s.len()) else {
                    continue;
                };
                let here = Point::new(block_index, slot, 0);
                let from = if start.same_slot(&here) { start.offset } else { 0 };
                let to = if end.same_slot(&here) { end.offset } else { len };
                segments.push((block_index, slot, from.min(len), to.min(len)));
            }
        }
        segments
    }
}
