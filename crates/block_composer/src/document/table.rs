// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::error::TableRejection;

/// Hard cap on columns.
pub const MAX_COLUMNS: usize = 6;
/// Hard cap on rows, header included.
pub const MAX_ROWS: usize = 20;
/// Columns can't be removed below this.
pub const MIN_COLUMNS: usize = 2;

/// A grid of plain-text cells: one fixed header row plus body rows.
///
/// Row indices used by the accessors count the header as row 0, so body
/// row `n` is row `n + 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// A table with labelled header cells and empty body rows. Sizes are
    /// clamped to the table caps.
    pub fn new(columns: usize, body_rows: usize, header_label: &str) -> Self {
        let columns = columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
        let body_rows = body_rows.clamp(1, MAX_ROWS - 1);
        Self {
            header: (1..=columns)
                .map(|n| default_header(header_label, n))
                .collect(),
            rows: vec![vec![String::new(); columns]; body_rows],
        }
    }

    /// Build from parsed cells. Rows are padded to a common width and cut
    /// down to the caps.
    pub fn from_cells(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let widest = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);
        let columns = widest.clamp(MIN_COLUMNS, MAX_COLUMNS);
        let fit = |mut row: Vec<String>| {
            row.resize(columns, String::new());
            row
        };
        Self {
            header: fit(header),
            rows: rows.into_iter().take(MAX_ROWS - 1).map(fit).collect(),
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn body(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Total rows including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    pub fn body_row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&String> {
        if row == 0 {
            self.header.get(column)
        } else {
            self.rows.get(row - 1)?.get(column)
        }
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut String> {
        if row == 0 {
            self.header.get_mut(column)
        } else {
            self.rows.get_mut(row - 1)?.get_mut(column)
        }
    }

    pub fn has_text(&self) -> bool {
        self.header
            .iter()
            .chain(self.rows.iter().flatten())
            .any(|c| !c.trim().is_empty())
    }

    /// Append an empty body row, returning its row index.
    pub fn add_row(&mut self) -> Result<usize, TableRejection> {
        if self.row_count() >= MAX_ROWS {
            return Err(TableRejection::RowLimit);
        }
        self.rows.push(vec![String::new(); self.column_count()]);
        Ok(self.rows.len())
    }

    /// Append a column to every row; header cells get a numbered label.
    pub fn add_column(&mut self, header_label: &str) -> Result<usize, TableRejection> {
        if self.column_count() >= MAX_COLUMNS {
            return Err(TableRejection::ColumnLimit);
        }
        let n = self.column_count() + 1;
        self.header.push(default_header(header_label, n));
        for row in &mut self.rows {
            row.push(String::new());
        }
        Ok(n - 1)
    }

    pub fn remove_row(&mut self, row: usize) -> Result<(), TableRejection> {
        if row == 0 {
            return Err(TableRejection::HeaderRow);
        }
        if self.rows.len() <= 1 {
            return Err(TableRejection::LastBodyRow);
        }
        if row > self.rows.len() {
            return Err(TableRejection::NotInTable);
        }
        self.rows.remove(row - 1);
        Ok(())
    }

    pub fn remove_column(&mut self, column: usize) -> Result<(), TableRejection> {
        if self.column_count() <= MIN_COLUMNS {
            return Err(TableRejection::MinimumColumns);
        }
        if column >= self.column_count() {
            return Err(TableRejection::NotInTable);
        }
        self.header.remove(column);
        for row in &mut self.rows {
            row.remove(column);
        }
        Ok(())
    }

    /// Drop the given body rows if all their cells are empty. Returns how
    /// many were removed.
    pub(crate) fn remove_emptied_rows(&mut self, rows: std::ops::RangeInclusive<usize>) -> usize {
        let before = self.rows.len();
        let mut index = 0;
        self.rows.retain(|cells| {
            index += 1;
            !(rows.contains(&index) && cells.iter().all(String::is_empty))
        });
        before - self.rows.len()
    }
}

fn default_header(label: &str, n: usize) -> String {
    format!("{label} {n}")
}
