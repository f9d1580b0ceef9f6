// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::collaborators::Collaborators;
use crate::config::ComposerConfig;
use crate::document::{
    repair, Document, InlineContent, Marks, Point, Selection, Slot, TextSlot,
    TextSlotMut,
};
use crate::history::{History, Snapshot};
use crate::ComposerUpdate;

/// A block-structured rich text composer.
///
/// Operations fall into two history classes. Text edits and formatting
/// commands only schedule a snapshot, so a burst of them becomes one undo
/// step once the debounce period has passed (see [`Composer::tick`]).
/// Structural edits (media, tables, paste, block deletion) commit the state
/// before and after themselves, so each one is exactly one undo step.
pub struct Composer {
    pub(crate) document: Document,
    pub(crate) selection: Selection,

    /// Marks toggled while the caret was collapsed; the next insertion
    /// uses them instead of the marks around the caret.
    pub(crate) pending_marks: Option<Marks>,

    pub(crate) history: History,
    pub(crate) config: ComposerConfig,
    pub(crate) collaborators: Collaborators,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) next_ticket: u64,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self::with_config(ComposerConfig::default())
    }

    pub fn with_config(config: ComposerConfig) -> Self {
        let document = Document::new();
        let selection = Selection::default();
        let history = History::new(
            Snapshot::capture(&document, selection),
            config.history_limit,
            config.history_debounce,
        );
        Self {
            document,
            selection,
            pending_marks: None,
            history,
            config,
            collaborators: Collaborators::default(),
            clock: Box::new(SystemClock::default()),
            next_ticket: 0,
        }
    }

    /// A composer showing persisted content. Unusable markup leaves it
    /// empty.
    pub fn from_html(html: &str) -> Self {
        let mut composer = Self::new();
        if let Err(error) = composer.set_content_from_html(html) {
            debug!(%error, "initial content ignored");
        }
        composer
    }

    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn collaborators_mut(&mut self) -> &mut Collaborators {
        &mut self.collaborators
    }

    /// Commit a debounced snapshot whose quiet period is over. Hosts call
    /// this from a timer; edits call it implicitly. Returns whether an
    /// entry was recorded.
    pub fn tick(&mut self) -> bool {
        if self.history.due(self.clock.now()) {
            self.history.commit(self.snapshot())
        } else {
            false
        }
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.document, self.selection)
    }

    /// Start a debounced edit. A burst that went quiet before this edit is
    /// committed first, so it stays a separate undo step.
    pub(crate) fn begin_edit(&mut self) {
        self.tick();
    }

    /// Commit the current state now, ahead of a structural edit.
    pub(crate) fn push_undo(&mut self) {
        self.history.commit(self.snapshot());
    }

    pub(crate) fn finish_edit(&mut self) -> ComposerUpdate {
        self.repair();
        self.history.schedule(self.clock.now());
        self.create_update_replace_all()
    }

    pub(crate) fn finish_structural_edit(&mut self) -> ComposerUpdate {
        self.repair();
        self.history.commit(self.snapshot());
        self.create_update_replace_all()
    }

    pub(crate) fn repair(&mut self) {
        repair::repair(&mut self.document);
        self.selection = self.document.clamp_selection(self.selection);
        #[cfg(any(test, feature = "assert-invariants"))]
        repair::assert_invariants(&self.document);
    }

    /// After a deletion: a document left without text and media goes back
    /// to a single empty paragraph with the caret inside it.
    pub(crate) fn reset_if_emptied(&mut self) {
        if self.document.is_content_empty() {
            debug!("document emptied");
            self.document = Document::new();
            self.selection = Selection::default();
        }
    }

    pub(crate) fn create_update_replace_all(&mut self) -> ComposerUpdate {
        let html = self.get_content_as_html();
        self.collaborators.emit(&html);
        ComposerUpdate::replace_all(html, self.selection, self.action_states())
    }

    pub(crate) fn create_update_selection(&self) -> ComposerUpdate {
        ComposerUpdate::update_selection(self.selection, self.action_states())
    }

    pub(crate) fn rich_slot(&self, point: Point) -> Option<&InlineContent> {
        match self.document.block(point.block)?.text_slot(point.slot)? {
            TextSlot::Rich(content) => Some(content),
            TextSlot::Plain(_) => None,
        }
    }

    pub(crate) fn rich_slot_mut(
        &mut self,
        block: usize,
        slot: Slot,
    ) -> Option<&mut InlineContent> {
        match self.document.block_mut(block)?.text_slot_mut(slot)? {
            TextSlotMut::Rich(content) => Some(content),
            TextSlotMut::Plain(_) => None,
        }
    }

    /// Move both ends of the selection through `f`.
    pub(crate) fn remap_selection(&mut self, f: impl Fn(Point) -> Point) {
        self.selection = Selection::new(f(self.selection.anchor), f(self.selection.focus));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::clock::ManualClock;
    use crate::collaborators::Collaborators;
    use crate::Composer;

    #[test]
    fn new_composer_is_empty() {
        let composer = Composer::new();
        assert_eq!(composer.get_content_as_html(), "");
        assert_eq!(composer.history().len(), 1);
    }

    #[test]
    fn every_mutation_is_emitted_to_the_listener() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut composer = Composer::new().with_collaborators(
            Collaborators::new()
                .with_listener(move |html: &str| sink.borrow_mut().push(html.to_owned())),
        );
        composer.replace_text("hi");
        composer.bold();
        assert_eq!(*seen.borrow(), vec!["<p>hi</p>".to_owned()]);
    }

    #[test]
    fn quiet_period_is_committed_on_tick() {
        let clock = ManualClock::new();
        let mut composer = Composer::new().with_clock(clock.clone());
        composer.replace_text("a");
        assert!(!composer.tick());
        clock.advance_ms(500);
        assert!(composer.tick());
        assert_eq!(composer.history().len(), 2);
    }
}
