// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::{Display, EnumDiscriminants, EnumString};

use super::inline::{
    char_len, flatten_line_breaks, plain_delete, plain_insert, InlineContent,
    Marks,
};
use super::{MediaBlock, Slot, Table};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Only second and third level headings exist; the first level belongs to
/// the page title.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum HeadingLevel {
    H2,
    H3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ordered => "ol",
            Self::Unordered => "ul",
        }
    }
}

/// One top-level unit of the document.
///
/// Headings and blockquotes hold a plain `String`, so inline marks or links
/// inside them cannot be represented at all.
#[derive(Clone, Debug, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(BlockKind), derive(Hash, Display))]
pub enum Block {
    Paragraph {
        content: InlineContent,
        align: Alignment,
    },
    Heading {
        level: HeadingLevel,
        text: String,
        align: Alignment,
    },
    Blockquote {
        text: String,
        align: Alignment,
    },
    List {
        kind: ListKind,
        items: Vec<InlineContent>,
    },
    Table(Table),
    Media(MediaBlock),
    HorizontalRule,
}

/// Read access to the text of one slot.
#[derive(Clone, Copy, Debug)]
pub enum TextSlot<'a> {
    Rich(&'a InlineContent),
    Plain(&'a str),
}

impl TextSlot<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Rich(content) => content.len(),
            Self::Plain(text) => char_len(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn plain_text(&self) -> String {
        match self {
            Self::Rich(content) => content.plain_text(),
            Self::Plain(text) => (*text).to_owned(),
        }
    }
}

/// Write access to the text of one slot.
#[derive(Debug)]
pub enum TextSlotMut<'a> {
    Rich(&'a mut InlineContent),
    Plain(&'a mut String),
}

impl TextSlotMut<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Rich(content) => content.len(),
            Self::Plain(text) => char_len(text),
        }
    }

    pub fn is_rich(&self) -> bool {
        matches!(self, Self::Rich(_))
    }

    /// Insert text; marks are ignored by plain slots.
    pub fn insert(&mut self, offset: usize, text: &str, marks: Marks) {
        match self {
            Self::Rich(content) => content.insert(offset, text, marks, None),
            Self::Plain(target) => plain_insert(target, offset, text),
        }
    }

    /// Insert rich content; plain slots receive only its text.
    pub fn insert_content(&mut self, offset: usize, content: InlineContent) {
        match self {
            Self::Rich(target) => target.insert_content(offset, content),
            Self::Plain(target) => {
                plain_insert(target, offset, &content.plain_text())
            }
        }
    }

    pub fn delete(&mut self, start: usize, end: usize) {
        match self {
            Self::Rich(content) => content.delete(start, end),
            Self::Plain(text) => plain_delete(text, start, end),
        }
    }

    /// Split at `offset`, returning the tail as rich content.
    pub fn split_off(&mut self, offset: usize) -> InlineContent {
        match self {
            Self::Rich(content) => content.split_off(offset),
            Self::Plain(text) => InlineContent::from_plain(
                &super::inline::plain_split_off(text, offset),
            ),
        }
    }
}

impl Block {
    pub fn paragraph(content: InlineContent) -> Self {
        Self::Paragraph {
            content,
            align: Alignment::Left,
        }
    }

    pub fn empty_paragraph() -> Self {
        Self::paragraph(InlineContent::new())
    }

    pub fn plain_paragraph(text: &str) -> Self {
        Self::paragraph(InlineContent::from_plain(text))
    }

    pub fn heading(level: HeadingLevel, text: &str) -> Self {
        Self::Heading {
            level,
            text: flatten_line_breaks(text),
            align: Alignment::Left,
        }
    }

    pub fn blockquote(text: &str) -> Self {
        Self::Blockquote {
            text: flatten_line_breaks(text),
            align: Alignment::Left,
        }
    }

    pub fn list(kind: ListKind, items: Vec<InlineContent>) -> Self {
        Self::List { kind, items }
    }

    pub fn kind(&self) -> BlockKind {
        BlockKind::from(self)
    }

    pub fn is_empty_paragraph(&self) -> bool {
        matches!(self, Self::Paragraph { content, .. } if content.is_empty())
    }

    /// Headings, blockquotes and tables never take inline marks or links.
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Heading { .. } | Self::Blockquote { .. } | Self::Table(_))
    }

    /// Blocks whose text can be merged with a neighbour when the boundary
    /// between them is deleted.
    pub fn is_mergeable_text(&self) -> bool {
        matches!(
            self,
            Self::Paragraph { .. }
                | Self::Heading { .. }
                | Self::Blockquote { .. }
                | Self::List { .. }
        )
    }

    pub fn align(&self) -> Option<Alignment> {
        match self {
            Self::Paragraph { align, .. }
            | Self::Heading { align, .. }
            | Self::Blockquote { align, .. } => Some(*align),
            Self::Media(media) => Some(media.align),
            _ => None,
        }
    }

    /// Returns false for blocks without an alignment.
    pub fn set_align(&mut self, new_align: Alignment) -> bool {
        match self {
            Self::Paragraph { align, .. }
            | Self::Heading { align, .. }
            | Self::Blockquote { align, .. } => *align = new_align,
            Self::Media(media) => media.align = new_align,
            _ => return false,
        }
        true
    }

    /// Every slot of the block in document order.
    pub fn slots(&self) -> Vec<Slot> {
        match self {
            Self::Paragraph { .. }
            | Self::Heading { .. }
            | Self::Blockquote { .. }
            | Self::HorizontalRule => vec![Slot::Body],
            Self::List { items, .. } => {
                (0..items.len().max(1)).map(Slot::Item).collect()
            }
            Self::Table(table) => (0..table.row_count())
                .flat_map(|row| {
                    (0..table.column_count())
                        .map(move |column| Slot::Cell { row, column })
                })
                .collect(),
            Self::Media(_) => vec![Slot::Body, Slot::Caption],
        }
    }

    pub fn text_slot(&self, slot: Slot) -> Option<TextSlot<'_>> {
        match (self, slot) {
            (Self::Paragraph { content, .. }, Slot::Body) => {
                Some(TextSlot::Rich(content))
            }
            (Self::Heading { text, .. }, Slot::Body)
            | (Self::Blockquote { text, .. }, Slot::Body) => {
                Some(TextSlot::Plain(text))
            }
            (Self::List { items, .. }, Slot::Item(i)) => {
                items.get(i).map(TextSlot::Rich)
            }
            (Self::Table(table), Slot::Cell { row, column }) => {
                table.cell(row, column).map(|c| TextSlot::Plain(c))
            }
            (Self::Media(media), Slot::Caption) => {
                Some(TextSlot::Plain(&media.caption))
            }
            _ => None,
        }
    }

    pub fn text_slot_mut(&mut self, slot: Slot) -> Option<TextSlotMut<'_>> {
        match (self, slot) {
            (Self::Paragraph { content, .. }, Slot::Body) => {
                Some(TextSlotMut::Rich(content))
            }
            (Self::Heading { text, .. }, Slot::Body)
            | (Self::Blockquote { text, .. }, Slot::Body) => {
                Some(TextSlotMut::Plain(text))
            }
            (Self::List { items, .. }, Slot::Item(i)) => {
                items.get_mut(i).map(TextSlotMut::Rich)
            }
            (Self::Table(table), Slot::Cell { row, column }) => {
                table.cell_mut(row, column).map(TextSlotMut::Plain)
            }
            (Self::Media(media), Slot::Caption) => {
                Some(TextSlotMut::Plain(&mut media.caption))
            }
            _ => None,
        }
    }

    /// Length of a slot; 0 for the wrapper slot of media and rules, `None`
    /// if the slot does not exist.
    pub fn slot_len(&self, slot: Slot) -> Option<usize> {
        match (self, slot) {
            (Self::Media(_), Slot::Body) | (Self::HorizontalRule, Slot::Body) => {
                Some(0)
            }
            (Self::List { items, .. }, Slot::Item(0)) if items.is_empty() => {
                Some(0)
            }
            _ => self.text_slot(slot).map(|s| s.len()),
        }
    }

    /// All visible text of the block, slots separated by newlines.
    pub fn plain_text(&self) -> String {
        self.slots()
            .into_iter()
            .filter_map(|slot| self.text_slot(slot))
            .map(|s| s.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_text(&self) -> bool {
        self.slots()
            .into_iter()
            .filter_map(|slot| self.text_slot(slot))
            .any(|s| !s.plain_text().trim().is_empty())
    }

    pub fn as_media(&self) -> Option<&MediaBlock> {
        match self {
            Self::Media(media) => Some(media),
            _ => None,
        }
    }

    pub fn as_media_mut(&mut self) -> Option<&mut MediaBlock> {
        match self {
            Self::Media(media) => Some(media),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MediaSource;

    #[test]
    fn headings_flatten_line_breaks() {
        let block = Block::heading(HeadingLevel::H2, "one\ntwo");
        assert_eq!(block.plain_text(), "one two");
    }

    #[test]
    fn restricted_blocks() {
        assert!(Block::heading(HeadingLevel::H3, "x").is_restricted());
        assert!(Block::blockquote("x").is_restricted());
        assert!(Block::Table(Table::new(2, 1, "H")).is_restricted());
        assert!(!Block::plain_paragraph("x").is_restricted());
        assert!(!Block::HorizontalRule.is_restricted());
    }

    #[test]
    fn media_has_a_wrapper_and_a_caption_slot() {
        let block = Block::Media(
            MediaBlock::new(MediaSource::image("a.png")).with_caption("cap"),
        );
        assert_eq!(block.slots(), vec![Slot::Body, Slot::Caption]);
        assert_eq!(block.slot_len(Slot::Body), Some(0));
        assert_eq!(block.slot_len(Slot::Caption), Some(3));
        assert!(block.text_slot(Slot::Body).is_none());
    }

    #[test]
    fn table_slots_are_row_major() {
        let block = Block::Table(Table::new(2, 1, "H"));
        assert_eq!(
            block.slots(),
            vec![
                Slot::Cell { row: 0, column: 0 },
                Slot::Cell { row: 0, column: 1 },
                Slot::Cell { row: 1, column: 0 },
                Slot::Cell { row: 1, column: 1 },
            ]
        );
    }

    #[test]
    fn plain_slots_ignore_marks() {
        let mut block = Block::blockquote("ab");
        let mut slot = block.text_slot_mut(Slot::Body).unwrap();
        assert!(!slot.is_rich());
        slot.insert(1, "X\nY", Marks::default());
        assert_eq!(block.plain_text(), "aX Yb");
    }

    #[test]
    fn alignment_is_not_available_on_lists() {
        let mut list = Block::list(ListKind::Ordered, vec![InlineContent::new()]);
        assert!(!list.set_align(Alignment::Center));
        let mut p = Block::empty_paragraph();
        assert!(p.set_align(Alignment::Right));
        assert_eq!(p.align(), Some(Alignment::Right));
    }
}
