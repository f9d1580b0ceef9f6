// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Keyboard shortcuts.
//!
//! `Mod` is the platform's primary modifier (Ctrl, or Cmd on Apple
//! platforms); the host folds whichever applies into
//! [`Modifiers::primary`].

use std::str::FromStr;

use strum_macros::{AsRefStr, EnumString};

use crate::command::EditorCommand;
use crate::document::HeadingLevel;
use crate::{Composer, ComposerUpdate};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable key, compared case-insensitively.
    Char(char),
    Enter,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub primary: bool,
    pub alt: bool,
    pub shift: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn primary(mut self) -> Self {
        self.modifiers.primary = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised key chord: {0}")]
pub struct KeyChordParseError(String);

/// Parses chords written like `Mod+Shift+Z`, `Alt+ArrowUp` or `Backspace`.
impl FromStr for KeyChord {
    type Err = KeyChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || KeyChordParseError(s.to_owned());
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = match parts.pop() {
            Some("Enter") => Key::Enter,
            Some("Backspace") => Key::Backspace,
            Some("Delete") => Key::Delete,
            Some("ArrowUp") | Some("Up") => Key::ArrowUp,
            Some("ArrowDown") | Some("Down") => Key::ArrowDown,
            Some(other) => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return Err(error()),
                }
            }
            None => return Err(error()),
        };
        let mut chord = KeyChord::new(key);
        for part in parts {
            chord = match part {
                "Mod" | "Ctrl" | "Cmd" => chord.primary(),
                "Alt" | "Option" => chord.alt(),
                "Shift" => chord.shift(),
                _ => return Err(error()),
            };
        }
        Ok(chord)
    }
}

/// Shortcuts the composer does not handle itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum HostRequest {
    Save,
    Publish,
    /// Open the host's link dialog.
    LinkRequest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyBinding {
    Command(EditorCommand),
    Host(HostRequest),
}

#[derive(Debug)]
pub enum KeyOutcome {
    Update(ComposerUpdate),
    Host(HostRequest),
    /// The surface should handle the key natively.
    Ignored,
}

/// What `chord` is bound to. Backspace, Delete and Alt+arrows only bind
/// while a media block is selected.
pub fn command_for(chord: &KeyChord, media_selected: bool) -> Option<KeyBinding> {
    use EditorCommand as C;
    use KeyBinding::{Command, Host};

    let Modifiers {
        primary,
        alt,
        shift,
    } = chord.modifiers;
    let key = match chord.key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        key => key,
    };
    let binding = match (primary, alt, shift, key) {
        (true, false, false, Key::Char('b')) => Command(C::Bold),
        (true, false, false, Key::Char('i')) => Command(C::Italic),
        (true, false, false, Key::Char('u')) => Command(C::Underline),
        (true, false, false, Key::Char('k')) => Host(HostRequest::LinkRequest),
        (true, true, false, Key::Char('1')) => Command(C::Heading(HeadingLevel::H2)),
        (true, true, false, Key::Char('2')) => Command(C::Heading(HeadingLevel::H3)),
        (true, false, true, Key::Char('7')) => Command(C::OrderedList),
        (true, false, true, Key::Char('8')) => Command(C::UnorderedList),
        (true, false, true, Key::Char('9')) => Command(C::Blockquote),
        (true, false, false, Key::Char('z')) => Command(C::Undo),
        (true, false, true, Key::Char('z')) | (true, false, false, Key::Char('y')) => {
            Command(C::Redo)
        }
        (true, false, false, Key::Char('s')) => Host(HostRequest::Save),
        (true, false, false, Key::Enter) => Host(HostRequest::Publish),
        (false, false, false, Key::Backspace | Key::Delete) if media_selected => {
            Command(C::DeleteBlock)
        }
        (false, true, false, Key::ArrowUp) if media_selected => Command(C::MoveUp),
        (false, true, false, Key::ArrowDown) if media_selected => Command(C::MoveDown),
        _ => return None,
    };
    Some(binding)
}

impl Composer {
    /// Handle a shortcut pressed in the surface.
    pub fn handle_key(&mut self, chord: &KeyChord) -> KeyOutcome {
        let media_selected = self.document.selected_media().is_some();
        match command_for(chord, media_selected) {
            Some(KeyBinding::Command(command)) => KeyOutcome::Update(self.execute(command)),
            Some(KeyBinding::Host(request)) => KeyOutcome::Host(request),
            None => KeyOutcome::Ignored,
        }
    }
}
