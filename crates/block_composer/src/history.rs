// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Snapshot-based undo/redo with a debounced commit.
//!
//! The history is a bounded list of snapshots plus a cursor pointing at the
//! entry that matches the live document once everything is committed.
//! Ordinary edits only *schedule* a commit; the snapshot is taken once no
//! further edit arrived for the debounce period. Structural edits commit
//! straight away, before they mutate anything.

use std::time::Duration;

use tracing::{debug, trace};

use crate::document::{Block, Document, Selection};

/// A captured copy of the document and selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub document: Document,
    pub selection: Selection,
}

impl Snapshot {
    /// Capture the current state. Media selection flags are transient and
    /// not part of the history.
    pub fn capture(document: &Document, selection: Selection) -> Self {
        let mut document = document.clone();
        document.deselect_all();
        Self {
            document,
            selection,
        }
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        self.document.blocks_mut()
    }
}

#[derive(Debug)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    limit: usize,
    debounce: Duration,
    pending_deadline: Option<Duration>,
    replaying: bool,
}

impl History {
    /// A history seeded with `initial` as entry 0.
    pub fn new(initial: Snapshot, limit: usize, debounce: Duration) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            limit: limit.max(1),
            debounce,
            pending_deadline: None,
            replaying: false,
        }
    }

    /// Drop everything and start again from `initial`.
    pub fn reset(&mut self, initial: Snapshot) {
        self.entries = vec![initial];
        self.cursor = 0;
        self.pending_deadline = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    pub fn has_pending(&self) -> bool {
        self.pending_deadline.is_some()
    }

    /// (Re)start the debounce window after an edit at `now`.
    pub fn schedule(&mut self, now: Duration) {
        if self.replaying {
            return;
        }
        let deadline = now + self.debounce;
        trace!(?deadline, "history commit scheduled");
        self.pending_deadline = Some(deadline);
    }

    /// Whether a scheduled commit has reached its deadline.
    pub fn due(&self, now: Duration) -> bool {
        self.pending_deadline.is_some_and(|deadline| now >= deadline)
    }

    pub fn cancel_pending(&mut self) {
        self.pending_deadline = None;
    }

    /// Record `snapshot` as the newest entry, discarding any redo entries.
    /// Returns false when nothing was recorded, either because a replay is
    /// in progress or the snapshot matches the current entry.
    pub fn commit(&mut self, snapshot: Snapshot) -> bool {
        self.pending_deadline = None;
        if self.replaying {
            return false;
        }
        if self.entries.get(self.cursor) == Some(&snapshot) {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        debug!(entries = self.entries.len(), "history entry committed");
        true
    }

    /// Step back one entry. `current` is committed first if it was not
    /// captured yet, so the step back is never lost on redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        self.cancel_pending();
        self.commit(current);
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Step forward one entry. Uncommitted edits count as a new mutation
    /// and therefore drop the redo entries.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        self.cancel_pending();
        self.commit(current);
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0 || self.has_pending()
    }

    pub fn can_redo(&self) -> bool {
        !self.has_pending() && self.cursor + 1 < self.entries.len()
    }

    pub fn set_replaying(&mut self, replaying: bool) {
        self.replaying = replaying;
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Apply `f` to every stored snapshot.
    pub(crate) fn rewrite(&mut self, mut f: impl FnMut(&mut Snapshot)) {
        self.entries.iter_mut().for_each(&mut f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Point};

    fn snap(text: &str) -> Snapshot {
        Snapshot::capture(
            &Document::from_blocks(vec![Block::plain_paragraph(text)]),
            Selection::caret(Point::body(0, text.chars().count())),
        )
    }

    fn history() -> History {
        History::new(snap(""), 100, Duration::from_millis(500))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn seeded_with_the_initial_state() {
        let h = history();
        assert_eq!(h.len(), 1);
        assert_eq!(h.current(), Some(&snap("")));
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn each_edit_pushes_the_deadline_back() {
        let mut h = history();
        h.schedule(ms(0));
        h.schedule(ms(400));
        assert!(!h.due(ms(600)));
        assert!(h.due(ms(900)));
    }

    #[test]
    fn identical_snapshots_are_not_recorded_twice() {
        let mut h = history();
        assert!(h.commit(snap("a")));
        assert!(!h.commit(snap("a")));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn undo_commits_uncaptured_state_first() {
        let mut h = history();
        h.commit(snap("a"));
        h.schedule(ms(0));
        assert_eq!(h.undo(snap("ab")), Some(snap("a")));
        assert_eq!(h.redo(snap("a")), Some(snap("ab")));
        assert_eq!(h.redo(snap("ab")), None);
    }

    #[test]
    fn undo_stops_at_the_oldest_entry() {
        let mut h = history();
        h.commit(snap("a"));
        assert_eq!(h.undo(snap("a")), Some(snap("")));
        assert_eq!(h.undo(snap("")), None);
        assert_eq!(h.cursor(), 0);
    }

    #[test]
    fn new_commit_truncates_redo_entries() {
        let mut h = history();
        h.commit(snap("a"));
        h.commit(snap("ab"));
        h.undo(snap("ab"));
        h.commit(snap("ax"));
        assert_eq!(h.len(), 3);
        assert!(!h.can_redo());
        assert_eq!(h.redo(snap("ax")), None);
    }

    #[test]
    fn oldest_entries_fall_off_at_the_limit() {
        let mut h = History::new(snap(""), 3, ms(500));
        for text in ["a", "b", "c", "d"] {
            h.commit(snap(text));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.undo(snap("d")), Some(snap("c")));
        assert_eq!(h.undo(snap("c")), Some(snap("b")));
        assert_eq!(h.undo(snap("b")), None);
    }

    #[test]
    fn replaying_suppresses_commits_and_scheduling() {
        let mut h = history();
        h.set_replaying(true);
        h.schedule(ms(0));
        assert!(!h.has_pending());
        assert!(!h.commit(snap("a")));
        h.set_replaying(false);
        assert_eq!(h.len(), 1);
    }
}
