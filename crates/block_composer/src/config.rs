// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::time::Duration;

/// Default number of undo entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;
/// Default quiet period before a burst of edits is committed to history.
pub const DEFAULT_HISTORY_DEBOUNCE: Duration = Duration::from_millis(500);

/// Limits handed to the image compressor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressionOptions {
    pub max_size_mb: f32,
    pub max_dimension: u32,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_size_mb: 1.0,
            max_dimension: 1920,
        }
    }
}

/// Tunables for a [`Composer`](crate::Composer).
#[derive(Clone, Debug, PartialEq)]
pub struct ComposerConfig {
    pub history_limit: usize,
    pub history_debounce: Duration,
    pub compression: CompressionOptions,
    pub default_table_columns: usize,
    pub default_table_body_rows: usize,
    /// Prefix of header cells created by table insertion and `add_column`.
    pub header_label: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_debounce: DEFAULT_HISTORY_DEBOUNCE,
            compression: CompressionOptions::default(),
            default_table_columns: 2,
            default_table_body_rows: 2,
            header_label: "Header".to_owned(),
        }
    }
}

impl ComposerConfig {
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn with_history_debounce(mut self, debounce: Duration) -> Self {
        self.history_debounce = debounce;
        self
    }

    pub fn with_compression(mut self, compression: CompressionOptions) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_table_size(mut self, columns: usize, body_rows: usize) -> Self {
        self.default_table_columns = columns;
        self.default_table_body_rows = body_rows;
        self
    }

    pub fn with_header_label(mut self, label: impl Into<String>) -> Self {
        self.header_label = label.into();
        self
    }
}
