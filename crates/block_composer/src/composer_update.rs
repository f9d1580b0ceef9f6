// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;

use strum_macros::{AsRefStr, EnumIter};

use crate::document::Selection;

/// Toolbar actions whose state the composer reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ComposerAction {
    Bold,
    Italic,
    Underline,
    Link,
    Heading2,
    Heading3,
    Blockquote,
    OrderedList,
    UnorderedList,
    HorizontalRule,
    Table,
    Undo,
    Redo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionState {
    Enabled,
    /// The action is active and invoking it again turns it off.
    Reversed,
    Disabled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplaceAll {
    pub replacement_html: String,
    pub selection: Selection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextUpdate {
    Keep,
    ReplaceAll(ReplaceAll),
    Select(Selection),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuState {
    Keep,
    Update(HashMap<ComposerAction, ActionState>),
}

/// What the host has to redraw after an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposerUpdate {
    pub text_update: TextUpdate,
    pub menu_state: MenuState,
}

impl ComposerUpdate {
    pub fn keep() -> Self {
        Self {
            text_update: TextUpdate::Keep,
            menu_state: MenuState::Keep,
        }
    }

    pub fn replace_all(
        replacement_html: String,
        selection: Selection,
        action_states: HashMap<ComposerAction, ActionState>,
    ) -> Self {
        Self {
            text_update: TextUpdate::ReplaceAll(ReplaceAll {
                replacement_html,
                selection,
            }),
            menu_state: MenuState::Update(action_states),
        }
    }

    pub fn update_selection(
        selection: Selection,
        action_states: HashMap<ComposerAction, ActionState>,
    ) -> Self {
        Self {
            text_update: TextUpdate::Select(selection),
            menu_state: MenuState::Update(action_states),
        }
    }

    pub fn is_keep(&self) -> bool {
        self.text_update == TextUpdate::Keep
    }

    /// The html of a `ReplaceAll` update.
    pub fn replacement_html(&self) -> Option<&str> {
        match &self.text_update {
            TextUpdate::ReplaceAll(r) => Some(&r.replacement_html),
            _ => None,
        }
    }

    pub fn action_state(&self, action: ComposerAction) -> Option<ActionState> {
        match &self.menu_state {
            MenuState::Update(states) => states.get(&action).copied(),
            MenuState::Keep => None,
        }
    }
}
