// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A block-structured rich text composer.
//!
//! The [`Composer`] keeps a typed document (paragraphs, headings,
//! blockquotes, lists, tables, media and rules) together with the
//! selection and an undo history. Hosts feed it commands and render the
//! [`ComposerUpdate`]s it returns; persisted content is plain HTML in a
//! fixed vocabulary, read by [`parse_html`] and written by [`to_html`].

mod clock;
mod collaborators;
mod command;
mod composer_model;
mod composer_update;
mod config;
pub mod document;
mod dom;
mod error;
mod history;
pub mod keyboard;
mod validation;

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::collaborators::{
    AlertSink, ChangeListener, Collaborators, EditableSurface, HostAlert,
    ImageCompressor, ImageFile, ImageUploader, MarkupCleaner, PendingUpload,
    UploadFuture,
};
pub use crate::command::EditorCommand;
pub use crate::composer_model::{normalize_url, Composer, Insertion, InsertionEvent};
pub use crate::composer_update::{
    ActionState, ComposerAction, ComposerUpdate, MenuState, ReplaceAll,
    TextUpdate,
};
pub use crate::config::{
    ComposerConfig, CompressionOptions, DEFAULT_HISTORY_DEBOUNCE,
    DEFAULT_HISTORY_LIMIT,
};
pub use crate::document::{
    Alignment, Block, BlockKind, Document, HeadingLevel, InlineContent,
    InlineMark, ListKind, MediaBlock, MediaSource, Point, Selection, Slot,
    Table, UploadTicket,
};
pub use crate::dom::{parse_html, to_html, to_tree};
pub use crate::error::{
    CompressError, HtmlParseError, TableRejection, UploadError,
};
pub use crate::history::{History, Snapshot};
pub use crate::keyboard::{HostRequest, KeyChord};
pub use crate::validation::validate;

pub use content_policy::{ContentStats, PolicyViolation};
