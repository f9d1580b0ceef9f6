// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::inline::flatten_line_breaks;
use super::{Block, Document};

/// Restore the structural invariants after an edit:
///
/// * inline content is normalised,
/// * plain-text slots hold a single line,
/// * lists have at least one item and tables at least one body row,
/// * at most one media block is selected,
/// * the document never has zero blocks.
pub(crate) fn repair(document: &mut Document) {
    let blocks = document.blocks_mut();
    blocks.retain(|block| match block {
        Block::List { items, .. } => !items.is_empty(),
        Block::Table(table) => table.body_row_count() > 0,
        _ => true,
    });

    let mut seen_selected = false;
    for block in blocks.iter_mut() {
        match block {
            Block::Paragraph { content, .. } => content.normalize(),
            Block::List { items, .. } => items.iter_mut().for_each(|i| i.normalize()),
            Block::Heading { text, .. } | Block::Blockquote { text, .. } => {
                if text.contains(['\n', '\r']) {
                    *text = flatten_line_breaks(text);
                }
            }
            Block::Media(media) => {
                if media.caption.contains(['\n', '\r']) {
                    media.caption = flatten_line_breaks(&media.caption);
                }
                if media.selected && seen_selected {
                    media.selected = false;
                }
                seen_selected |= media.selected;
            }
            Block::Table(_) | Block::HorizontalRule => {}
        }
    }

    if blocks.is_empty() {
        blocks.push(Block::empty_paragraph());
    }
}

/// Panic if the document breaks a structural invariant. Only compiled in
/// with the `assert-invariants` feature.
#[cfg(any(test, feature = "assert-invariants"))]
pub(crate) fn assert_invariants(document: &Document) {
    use super::{MAX_COLUMNS, MAX_ROWS, MIN_COLUMNS};

    assert!(!document.is_empty(), "document has no blocks");
    let mut selected = 0;
    for (index, block) in document.blocks().iter().enumerate() {
        match block {
            Block::Paragraph { content, .. } => {
                let runs = content.runs();
                assert!(
                    runs.iter().all(|r| !r.is_empty()),
                    "empty run in block {index}"
                );
                assert!(
                    runs.windows(2).all(|w| w[0].marks != w[1].marks || w[0].link != w[1].link),
                    "unmerged runs in block {index}"
                );
            }
            Block::Heading { text, .. } | Block::Blockquote { text, .. } => {
                assert!(!text.contains('\n'), "line break in block {index}");
            }
            Block::List { items, .. } => {
                assert!(!items.is_empty(), "empty list at block {index}");
            }
            Block::Table(table) => {
                assert!(
                    (MIN_COLUMNS..=MAX_COLUMNS).contains(&table.column_count()),
                    "table {index} has {} columns",
                    table.column_count()
                );
                assert!(
                    (2..=MAX_ROWS).contains(&table.row_count()),
                    "table {index} has {} rows",
                    table.row_count()
                );
            }
            Block::Media(media) => {
                selected += usize::from(media.is_selected());
            }
            Block::HorizontalRule => {}
        }
    }
    assert!(selected <= 1, "{selected} media blocks selected");
}
