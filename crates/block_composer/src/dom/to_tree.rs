// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::document::{
    Block, Document, InlineContent, MediaSource, Point, Selection, Slot,
};

struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn render(&self, prefix: &str, last: bool, out: &mut String) {
        out.push_str(prefix);
        out.push_str(if last { "└>" } else { "├>" });
        out.push_str(&self.label);
        out.push('\n');
        let child_prefix = format!("{prefix}{}", if last { "  " } else { "│ " });
        for (i, child) in self.children.iter().enumerate() {
            child.render(&child_prefix, i + 1 == self.children.len(), out);
        }
    }
}

/// Render the document as an indented tree, for debugging and tests.
///
/// The selection is drawn inside the text it covers: `|` for a caret,
/// `{` and `}` around a range with `|` on the focus side.
pub fn to_tree(document: &Document, selection: &Selection) -> String {
    let markers = Markers::new(selection);
    let mut out = String::from("\n");
    let blocks = document.blocks();
    for (index, block) in blocks.iter().enumerate() {
        block_node(index, block, &markers).render("", index + 1 == blocks.len(), &mut out);
    }
    out
}

struct Markers {
    selection: Selection,
}

impl Markers {
    fn new(selection: &Selection) -> Self {
        Self {
            selection: *selection,
        }
    }

    /// Markers falling in one slot, as (offset, text) pairs.
    fn in_slot(&self, block: usize, slot: Slot) -> Vec<(usize, &'static str)> {
        let here = Point::new(block, slot, 0);
        let (start, end) = (self.selection.start(), self.selection.end());
        if self.selection.is_collapsed() {
            return if start.same_slot(&here) {
                vec![(start.offset, "|")]
            } else {
                Vec::new()
            };
        }
        let focus_at_start = self.selection.focus == start;
        let mut markers = Vec::new();
        if start.same_slot(&here) {
            markers.push((start.offset, if focus_at_start { "|{" } else { "{" }));
        }
        if end.same_slot(&here) {
            markers.push((end.offset, if focus_at_start { "}" } else { "}|" }));
        }
        markers
    }

    fn mark_text(&self, block: usize, slot: Slot, text: &str) -> String {
        insert_markers(text, 0, true, &self.in_slot(block, slot))
    }
}

/// Quote `text`, inserting the markers whose offsets fall inside it.
/// `base` is the offset of the text's first char within its slot.
fn insert_markers(
    text: &str,
    base: usize,
    owns_end: bool,
    markers: &[(usize, &str)],
) -> String {
    let len = text.chars().count();
    let mut out = String::from("\"");
    for (i, ch) in text.chars().enumerate() {
        for (offset, marker) in markers {
            if *offset == base + i {
                out.push_str(marker);
            }
        }
        match ch {
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    if owns_end {
        for (offset, marker) in markers {
            if *offset >= base + len {
                out.push_str(marker);
            }
        }
    }
    out.push('"');
    out
}

fn inline_children(
    content: &InlineContent,
    block: usize,
    slot: Slot,
    markers: &Markers,
) -> Vec<TreeNode> {
    let in_slot = markers.in_slot(block, slot);
    if content.is_empty() {
        return vec![TreeNode::leaf(insert_markers("", 0, true, &in_slot))];
    }
    let runs = content.runs();
    let mut base = 0;
    runs.iter()
        .enumerate()
        .map(|(i, run)| {
            let mut label: Vec<String> = Vec::new();
            if run.marks.bold {
                label.push("strong".into());
            }
            if run.marks.italic {
                label.push("em".into());
            }
            if run.marks.underline {
                label.push("u".into());
            }
            if let Some(link) = &run.link {
                label.push(format!("a href={link:?}"));
            }
            label.push(insert_markers(&run.text, base, i + 1 == runs.len(), &in_slot));
            base += run.len();
            TreeNode::leaf(label.join(" "))
        })
        .collect()
}

fn with_align(tag: &str, block: &Block) -> String {
    match block.align() {
        Some(align) if align != Default::default() => format!("{tag} align={align}"),
        _ => tag.to_owned(),
    }
}

fn block_node(index: usize, block: &Block, markers: &Markers) -> TreeNode {
    match block {
        Block::Paragraph { content, .. } => TreeNode {
            label: with_align("p", block),
            children: inline_children(content, index, Slot::Body, markers),
        },
        Block::Heading { level, text, .. } => TreeNode::leaf(format!(
            "{} {}",
            with_align(&level.to_string(), block),
            markers.mark_text(index, Slot::Body, text)
        )),
        Block::Blockquote { text, .. } => TreeNode::leaf(format!(
            "{} {}",
            with_align("blockquote", block),
            markers.mark_text(index, Slot::Body, text)
        )),
        Block::List { kind, items } => TreeNode {
            label: kind.tag().to_owned(),
            children: items
                .iter()
                .enumerate()
                .map(|(i, item)| TreeNode {
                    label: "li".to_owned(),
                    children: inline_children(item, index, Slot::Item(i), markers),
                })
                .collect(),
        },
        Block::Table(table) => TreeNode {
            label: "table".to_owned(),
            children: (0..table.row_count())
                .map(|row| TreeNode {
                    label: "tr".to_owned(),
                    children: (0..table.column_count())
                        .map(|column| {
                            let tag = if row == 0 { "th" } else { "td" };
                            let text = table.cell(row, column).map_or("", String::as_str);
                            TreeNode::leaf(format!(
                                "{tag} {}",
                                markers.mark_text(index, Slot::Cell { row, column }, text)
                            ))
                        })
                        .collect(),
                })
                .collect(),
        },
        Block::Media(media) => {
            let source = match &media.source {
                MediaSource::Image { src, .. } => format!("image {:?}", truncate(src)),
                MediaSource::Embed { url } => format!("embed {url:?}"),
            };
            let mut label = format!("{} {source}", with_align("figure", block));
            if media.is_selected() {
                label.push_str(" selected");
            }
            if !markers.in_slot(index, Slot::Body).is_empty() {
                label.push_str(" |");
            }
            let caption_markers = markers.in_slot(index, Slot::Caption);
            let children = if media.caption.is_empty() && caption_markers.is_empty() {
                Vec::new()
            } else {
                vec![TreeNode::leaf(format!(
                    "figcaption {}",
                    markers.mark_text(index, Slot::Caption, &media.caption)
                ))]
            };
            TreeNode { label, children }
        }
        Block::HorizontalRule => {
            let mut label = "hr".to_owned();
            if !markers.in_slot(index, Slot::Body).is_empty() {
                label.push_str(" |");
            }
            TreeNode::leaf(label)
        }
    }
}

/// Data URLs are long; keep the tree readable.
fn truncate(src: &str) -> String {
    const MAX: usize = 40;
    if src.chars().count() > MAX {
        format!("{}…", src.chars().take(MAX).collect::<String>())
    } else {
        src.to_owned()
    }
}
