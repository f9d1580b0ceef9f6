// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The editing engine.
//!
//! [`Composer`] owns the document, the selection and the history. Its
//! operations are spread over the files below by concern; every mutating
//! one returns a [`ComposerUpdate`](crate::ComposerUpdate) describing what
//! the host has to redraw.

mod base;
mod block_ops;
mod content_access;
mod formatting;
mod links;
mod media;
mod replace_html;
mod selection;
mod state_query;
mod table_ops;
mod text_ops;
mod undo_redo;

pub use base::Composer;
pub use links::normalize_url;
pub use replace_html::{Insertion, InsertionEvent};
