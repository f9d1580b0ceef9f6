// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Toolbar state for the current selection.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::document::{Block, HeadingLevel, InlineMark, ListKind};
use crate::{ActionState, Composer, ComposerAction};

impl Composer {
    /// State of every toolbar action at the current selection.
    pub fn action_states(&self) -> HashMap<ComposerAction, ActionState> {
        ComposerAction::iter()
            .map(|action| (action, self.compute_action_state(action)))
            .collect()
    }

    fn compute_action_state(&self, action: ComposerAction) -> ActionState {
        match action {
            ComposerAction::Bold => self.mark_state(InlineMark::Bold),
            ComposerAction::Italic => self.mark_state(InlineMark::Italic),
            ComposerAction::Underline => self.mark_state(InlineMark::Underline),
            ComposerAction::Link => {
                if !self.inline_allowed() {
                    ActionState::Disabled
                } else if self.current_link().is_some() {
                    ActionState::Reversed
                } else {
                    ActionState::Enabled
                }
            }
            ComposerAction::Heading2 => self.line_state(|block| {
                matches!(block, Block::Heading { level: HeadingLevel::H2, .. })
            }),
            ComposerAction::Heading3 => self.line_state(|block| {
                matches!(block, Block::Heading { level: HeadingLevel::H3, .. })
            }),
            ComposerAction::Blockquote => {
                self.line_state(|block| matches!(block, Block::Blockquote { .. }))
            }
            ComposerAction::OrderedList => self.line_state(|block| {
                matches!(block, Block::List { kind: ListKind::Ordered, .. })
            }),
            ComposerAction::UnorderedList => self.line_state(|block| {
                matches!(block, Block::List { kind: ListKind::Unordered, .. })
            }),
            ComposerAction::HorizontalRule | ComposerAction::Table => {
                if self.table_context().is_ok() {
                    ActionState::Disabled
                } else {
                    ActionState::Enabled
                }
            }
            ComposerAction::Undo => enabled_if(self.history.can_undo()),
            ComposerAction::Redo => enabled_if(self.history.can_redo()),
        }
    }

    fn inline_allowed(&self) -> bool {
        self.document.selected_media().is_none() && !self.is_restricted_zone()
    }

    fn mark_state(&self, mark: InlineMark) -> ActionState {
        if !self.inline_allowed() {
            ActionState::Disabled
        } else if self.mark_active(mark) {
            ActionState::Reversed
        } else {
            ActionState::Enabled
        }
    }

    /// Block toggles apply to text blocks only; `active` tells whether the
    /// block under the caret already has the format.
    fn line_state(&self, active: impl Fn(&Block) -> bool) -> ActionState {
        if self.document.selected_media().is_some() {
            return ActionState::Disabled;
        }
        let Some(block) = self.current_block().and_then(|i| self.document.block(i)) else {
            return ActionState::Disabled;
        };
        match block {
            Block::Table(_) | Block::Media(_) | Block::HorizontalRule => ActionState::Disabled,
            block if active(block) => ActionState::Reversed,
            _ => ActionState::Enabled,
        }
    }
}

fn enabled_if(condition: bool) -> ActionState {
    if condition {
        ActionState::Enabled
    } else {
        ActionState::Disabled
    }
}
