// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Selection context: which block the user is in and whether inline
//! formatting is allowed there.

use crate::document::{Block, Point, Selection, Slot};
use crate::{Composer, ComposerUpdate};

impl Composer {
    /// Set the selection. Points outside the document are pulled back in.
    /// Moving the caret away from a selected media block, or into its
    /// caption, deselects it.
    pub fn select(&mut self, selection: Selection) -> ComposerUpdate {
        let selection = self.document.clamp_selection(selection);
        if let Some(index) = self.document.selected_media() {
            let on_wrapper = selection.is_collapsed()
                && selection.focus == Point::body(index, 0);
            if !on_wrapper {
                self.document.deselect_all();
            }
        }
        self.selection = selection;
        self.pending_marks = None;
        self.create_update_selection()
    }

    pub fn select_all(&mut self) -> ComposerUpdate {
        let start = self.document.first_point(0);
        let end = self.document.end_point();
        self.select(Selection::new(start, end))
    }

    /// The top-level block being edited: the selected media block if there
    /// is one, otherwise the block holding the start of the selection.
    pub fn current_block(&self) -> Option<usize> {
        if self.document.is_empty() {
            return None;
        }
        self.document
            .selected_media()
            .or(Some(self.selection.start().block))
    }

    /// Whether inline marks and links are forbidden for the selection.
    ///
    /// Both endpoints are checked, and so is every block the range passes
    /// through, since a range can start in ordinary text and end in (or
    /// cross) a heading.
    pub fn is_restricted_zone(&self) -> bool {
        let start = self.selection.start();
        let end = self.selection.end();
        self.is_restricted_point(start)
            || self.is_restricted_point(end)
            || (start.block..=end.block).any(|index| {
                self.document.block(index).is_some_and(Block::is_restricted)
            })
    }

    fn is_restricted_point(&self, point: Point) -> bool {
        matches!(point.slot, Slot::Caption | Slot::Cell { .. })
            || self
                .document
                .block(point.block)
                .is_some_and(Block::is_restricted)
    }

    /// Indices of the blocks the selection touches.
    pub(crate) fn selected_blocks(&self) -> std::ops::RangeInclusive<usize> {
        match self.document.selected_media() {
            Some(index) => index..=index,
            None => self.selection.start().block..=self.selection.end().block,
        }
    }
}
