// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Operations as values, for hosts that queue or replay them.

use strum_macros::AsRefStr;
use tracing::debug;

use crate::collaborators::EditableSurface;
use crate::document::{Alignment, HeadingLevel, MediaSource, Selection};
use crate::error::TableRejection;
use crate::{Composer, ComposerUpdate};

/// Every operation a host can ask of the composer, apart from pasting
/// and image files, which may start an upload (see
/// [`Composer::paste`] and [`Composer::insert_image_file`]).
#[derive(Clone, Debug, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum EditorCommand {
    ReplaceText(String),
    Enter,
    Backspace,
    Delete,
    Clear,
    Select(Selection),
    SelectAll,

    Bold,
    Italic,
    Underline,
    SetLink(String),
    SetLinkWithText { url: String, text: String },
    RemoveLink,

    Heading(HeadingLevel),
    Blockquote,
    OrderedList,
    UnorderedList,
    Align(Alignment),
    HorizontalRule,

    InsertTable,
    AddRow,
    AddColumn,
    RemoveRow,
    RemoveColumn,

    InsertMedia(MediaSource),
    SelectMedia(usize),
    DeselectAllMedia,
    SetCaption { index: usize, caption: String },
    DeleteBlock,
    MoveUp,
    MoveDown,

    Undo,
    Redo,
}

impl Composer {
    /// Run `command`. Rejected table edits come back as `keep`; the
    /// rejection has been logged and, for size caps, reported through the
    /// alert sink.
    pub fn execute(&mut self, command: EditorCommand) -> ComposerUpdate {
        debug!(command = command.as_ref(), "execute");
        match command {
            EditorCommand::ReplaceText(text) => self.replace_text(&text),
            EditorCommand::Enter => self.enter(),
            EditorCommand::Backspace => self.backspace(),
            EditorCommand::Delete => self.delete(),
            EditorCommand::Clear => self.clear(),
            EditorCommand::Select(selection) => self.select(selection),
            EditorCommand::SelectAll => self.select_all(),
            EditorCommand::Bold => self.bold(),
            EditorCommand::Italic => self.italic(),
            EditorCommand::Underline => self.underline(),
            EditorCommand::SetLink(url) => self.insert_link(&url),
            EditorCommand::SetLinkWithText { url, text } => {
                self.insert_link_with_text(&url, &text)
            }
            EditorCommand::RemoveLink => self.remove_link(),
            EditorCommand::Heading(level) => self.toggle_heading(level),
            EditorCommand::Blockquote => self.toggle_blockquote(),
            EditorCommand::OrderedList => self.ordered_list(),
            EditorCommand::UnorderedList => self.unordered_list(),
            EditorCommand::Align(align) => self.set_alignment(align),
            EditorCommand::HorizontalRule => self.insert_horizontal_rule(),
            EditorCommand::InsertTable => self.insert_table(),
            EditorCommand::AddRow => keep_rejected(self.add_row()),
            EditorCommand::AddColumn => keep_rejected(self.add_column()),
            EditorCommand::RemoveRow => keep_rejected(self.remove_row()),
            EditorCommand::RemoveColumn => keep_rejected(self.remove_column()),
            EditorCommand::InsertMedia(source) => self.insert_media(source),
            EditorCommand::SelectMedia(index) => self.select_media(index),
            EditorCommand::DeselectAllMedia => self.deselect_all_media(),
            EditorCommand::SetCaption { index, caption } => self.set_caption(index, &caption),
            EditorCommand::DeleteBlock => self.delete_block(),
            EditorCommand::MoveUp => self.move_up(),
            EditorCommand::MoveDown => self.move_down(),
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
        }
    }

    /// Run `command` against a live surface: the selection is read from
    /// the surface first and the resulting update is pushed back to it.
    pub fn drive(
        &mut self,
        surface: &mut impl EditableSurface,
        command: EditorCommand,
    ) -> ComposerUpdate {
        if let Some(selection) = surface.current_selection() {
            if selection != self.selection {
                self.select(selection);
            }
        }
        let update = self.execute(command);
        if !update.is_keep() {
            surface.apply(&update);
        }
        update
    }
}

fn keep_rejected(result: Result<ComposerUpdate, TableRejection>) -> ComposerUpdate {
    result.unwrap_or_else(|_| ComposerUpdate::keep())
}
