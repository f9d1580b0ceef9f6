// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use tracing::debug;

use crate::collaborators::HostAlert;
use crate::document::{Block, Point, Selection, Slot, Table};
use crate::error::TableRejection;
use crate::{Composer, ComposerUpdate};

impl Composer {
    /// The table block, row and column under the caret.
    pub fn table_context(&self) -> Result<(usize, usize, usize), TableRejection> {
        let focus = self.selection.focus;
        match (self.document.block(focus.block), focus.slot) {
            (Some(Block::Table(_)), Slot::Cell { row, column }) => {
                Ok((focus.block, row, column))
            }
            _ => Err(TableRejection::NotInTable),
        }
    }

    /// Insert a table with the configured size at the caret and put the
    /// caret in its first body cell. Tables do not nest.
    pub fn insert_table(&mut self) -> ComposerUpdate {
        if self.table_context().is_ok() {
            debug!("table rejected inside a table");
            return ComposerUpdate::keep();
        }
        self.push_undo();
        let table = Table::new(
            self.config.default_table_columns,
            self.config.default_table_body_rows,
            &self.config.header_label,
        );
        let index = self.insert_block_at_caret(Block::Table(table));
        if self.document.block(index + 1).is_none() {
            self.document.blocks_mut().push(Block::empty_paragraph());
        }
        self.selection = Selection::caret(Point::new(index, Slot::Cell { row: 1, column: 0 }, 0));
        self.finish_structural_edit()
    }

    /// Append an empty body row and move the caret into it.
    pub fn add_row(&mut self) -> Result<ComposerUpdate, TableRejection> {
        let (_, _, column) = self.table_context()?;
        self.edit_table(|table| {
            let row = table.add_row()?;
            Ok(Slot::Cell { row, column })
        })
    }

    /// Append a column to every row; the header cell gets a numbered label.
    pub fn add_column(&mut self) -> Result<ComposerUpdate, TableRejection> {
        let (_, row, _) = self.table_context()?;
        let label = self.config.header_label.clone();
        self.edit_table(|table| {
            let column = table.add_column(&label)?;
            Ok(Slot::Cell { row, column })
        })
    }

    /// Remove the body row under the caret.
    pub fn remove_row(&mut self) -> Result<ComposerUpdate, TableRejection> {
        let (_, row, column) = self.table_context()?;
        self.edit_table(|table| {
            table.remove_row(row)?;
            Ok(Slot::Cell {
                row: row.min(table.row_count() - 1),
                column,
            })
        })
    }

    /// Remove the column under the caret.
    pub fn remove_column(&mut self) -> Result<ComposerUpdate, TableRejection> {
        let (_, row, column) = self.table_context()?;
        self.edit_table(|table| {
            table.remove_column(column)?;
            Ok(Slot::Cell {
                row,
                column: column.min(table.column_count() - 1),
            })
        })
    }

    /// Apply `op` to the table under the caret. A rejection leaves the
    /// document untouched; hitting a size cap is reported to the host.
    fn edit_table(
        &mut self,
        op: impl FnOnce(&mut Table) -> Result<Slot, TableRejection>,
    ) -> Result<ComposerUpdate, TableRejection> {
        let (index, _, _) = self.table_context()?;
        let Some(mut table) = self.document.block(index).and_then(Block::as_table).cloned() else {
            return Err(TableRejection::NotInTable);
        };
        let slot = match op(&mut table) {
            Ok(slot) => slot,
            Err(rejection) => {
                debug!(rejection = rejection.as_ref(), "table edit rejected");
                match rejection {
                    TableRejection::RowLimit => self.collaborators.alert(HostAlert::TableRowLimit),
                    TableRejection::ColumnLimit => {
                        self.collaborators.alert(HostAlert::TableColumnLimit)
                    }
                    _ => {}
                }
                return Err(rejection);
            }
        };
        self.push_undo();
        self.document.blocks_mut()[index] = Block::Table(table);
        self.selection = Selection::caret(Point::new(index, slot, 0));
        Ok(self.finish_structural_edit())
    }
}
