// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Positions inside a [`Document`](super::Document).
//!
//! A [`Point`] names a top-level block, the text slot inside that block and a
//! `char` offset inside the slot. Points order the way they appear in the
//! document, so a [`Selection`] can always be normalised to `start <= end`.

/// A text-bearing region inside a block.
///
/// The derived ordering follows document order within one block: a list's
/// items in sequence, a table's cells row by row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// The block's own text (paragraph, heading, blockquote), or the wrapper
    /// itself for media blocks and rules.
    Body,
    /// A list item.
    Item(usize),
    /// A table cell; row 0 is the header.
    Cell { row: usize, column: usize },
    /// A media block's caption.
    Caption,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub block: usize,
    pub slot: Slot,
    pub offset: usize,
}

impl Point {
    pub fn new(block: usize, slot: Slot, offset: usize) -> Self {
        Self {
            block,
            slot,
            offset,
        }
    }

    pub fn body(block: usize, offset: usize) -> Self {
        Self::new(block, Slot::Body, offset)
    }

    /// Whether both points sit in the same text slot.
    pub fn same_slot(&self, other: &Point) -> bool {
        self.block == other.block && self.slot == other.slot
    }

    pub(crate) fn with_offset(self, offset: usize) -> Self {
        Self { offset, ..self }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::body(0, 0)
    }
}

/// Anchor is where the selection started, focus where it ends; either may
/// come first in document order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(point: Point) -> Self {
        Self::new(point, point)
    }

    /// A selection within one slot.
    pub fn within(block: usize, slot: Slot, start: usize, end: usize) -> Self {
        Self::new(Point::new(block, slot, start), Point::new(block, slot, end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn start(&self) -> Point {
        self.anchor.min(self.focus)
    }

    pub fn end(&self) -> Point {
        self.anchor.max(self.focus)
    }
}
