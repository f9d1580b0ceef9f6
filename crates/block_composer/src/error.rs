// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::AsRefStr;

use crate::document::{MAX_COLUMNS, MAX_ROWS, MIN_COLUMNS};

/// Why a table operation did not apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TableRejection {
    #[error("the cursor is not inside a table")]
    NotInTable,
    #[error("tables are limited to {} rows", MAX_ROWS)]
    RowLimit,
    #[error("tables are limited to {} columns", MAX_COLUMNS)]
    ColumnLimit,
    #[error("the header row cannot be removed")]
    HeaderRow,
    #[error("a table needs at least one body row")]
    LastBodyRow,
    #[error("a table needs at least {} columns", MIN_COLUMNS)]
    MinimumColumns,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("upload was cancelled")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("image compression failed: {reason}")]
pub struct CompressError {
    pub reason: String,
}

impl CompressError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Markup could not be turned into blocks.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HtmlParseError {
    #[error("html5ever reported {} parse errors", .parse_errors.len())]
    Malformed { parse_errors: Vec<String> },
    #[error("markup contained nothing usable")]
    Empty,
}
