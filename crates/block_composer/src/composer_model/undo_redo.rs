// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Undo and redo over the snapshot history.
//!
//! Restoring a snapshot is itself a mutation of the live document; the
//! history is flagged as replaying meanwhile so it does not record it.

use tracing::debug;

use crate::history::Snapshot;
use crate::{Composer, ComposerUpdate};

impl Composer {
    pub fn undo(&mut self) -> ComposerUpdate {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(snapshot) => self.restore(snapshot),
            None => {
                debug!("nothing to undo");
                ComposerUpdate::keep()
            }
        }
    }

    pub fn redo(&mut self) -> ComposerUpdate {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(snapshot) => self.restore(snapshot),
            None => {
                debug!("nothing to redo");
                ComposerUpdate::keep()
            }
        }
    }

    fn restore(&mut self, snapshot: Snapshot) -> ComposerUpdate {
        self.history.set_replaying(true);
        self.document = snapshot.document;
        self.selection = self.document.clamp_selection(snapshot.selection);
        self.pending_marks = None;
        self.history.set_replaying(false);
        self.create_update_replace_all()
    }
}
