// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The persisted HTML form of a document.
//!
//! Output only ever uses the tags the parser maps back onto blocks, so
//! serializing a parsed serialization reproduces it exactly.

use html_escape::{encode_double_quoted_attribute_to_string, encode_text_to_string};

use crate::document::{
    Alignment, Block, Document, HeadingLevel, InlineContent, InlineMark,
    MediaBlock, MediaSource, Table, TextRun,
};

const MARK_TAGS: [(InlineMark, &str); 3] = [
    (InlineMark::Bold, "strong"),
    (InlineMark::Italic, "em"),
    (InlineMark::Underline, "u"),
];

/// Serialize a document. A document without text and durable media
/// serializes to the empty string.
pub fn to_html(document: &Document) -> String {
    let written: Vec<&Block> = document
        .blocks()
        .iter()
        .filter(|block| block.as_media().is_none_or(|m| m.source.is_durable()))
        .collect();
    if !written
        .iter()
        .any(|block| block.has_text() || block.as_media().is_some())
    {
        return String::new();
    }
    let mut html = String::new();
    let mut previous_empty = false;
    for block in written {
        let empty = block.is_empty_paragraph();
        if !(empty && previous_empty) {
            write_block(&mut html, block);
        }
        previous_empty = empty;
    }
    html
}

fn write_block(html: &mut String, block: &Block) {
    match block {
        Block::Paragraph { content, align } => {
            open_tag(html, "p", *align);
            write_inline(html, content);
            html.push_str("</p>");
        }
        Block::Heading { level, text, align } => {
            let tag = match level {
                HeadingLevel::H2 => "h2",
                HeadingLevel::H3 => "h3",
            };
            open_tag(html, tag, *align);
            write_plain(html, text);
            close_tag(html, tag);
        }
        Block::Blockquote { text, align } => {
            open_tag(html, "blockquote", *align);
            write_plain(html, text);
            html.push_str("</blockquote>");
        }
        Block::List { kind, items } => {
            open_tag(html, kind.tag(), Alignment::Left);
            for item in items {
                html.push_str("<li>");
                write_inline(html, item);
                html.push_str("</li>");
            }
            close_tag(html, kind.tag());
        }
        Block::Table(table) => write_table(html, table),
        Block::Media(media) => write_media(html, media),
        Block::HorizontalRule => html.push_str("<hr>"),
    }
}

fn open_tag(html: &mut String, tag: &str, align: Alignment) {
    html.push('<');
    html.push_str(tag);
    if align != Alignment::Left {
        html.push_str(&format!(r#" class="align-{align}""#));
    }
    html.push('>');
}

fn close_tag(html: &mut String, tag: &str) {
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

fn write_inline(html: &mut String, content: &InlineContent) {
    let mut text = SlotText::new(content.len());
    let runs = content.runs();
    let mut index = 0;
    while index < runs.len() {
        let link = runs[index].link.as_deref();
        let end = runs[index..]
            .iter()
            .position(|r| r.link.as_deref() != link)
            .map_or(runs.len(), |p| index + p);
        if let Some(href) = link {
            html.push_str(r#"<a href=""#);
            encode_double_quoted_attribute_to_string(href, html);
            html.push_str(r#"">"#);
        }
        for run in &runs[index..end] {
            write_run(html, &mut text, run);
        }
        if link.is_some() {
            html.push_str("</a>");
        }
        index = end;
    }
    text.finish(html);
}

fn write_run(html: &mut String, text: &mut SlotText, run: &TextRun) {
    for (mark, tag) in MARK_TAGS {
        if run.marks.has(mark) {
            html.push('<');
            html.push_str(tag);
            html.push('>');
        }
    }
    text.write(html, &run.text);
    for (mark, tag) in MARK_TAGS.iter().rev() {
        if run.marks.has(*mark) {
            close_tag(html, tag);
        }
    }
}

fn write_plain(html: &mut String, text: &str) {
    let mut slot = SlotText::new(text.chars().count());
    slot.write(html, text);
    slot.finish(html);
}

fn write_table(html: &mut String, table: &Table) {
    html.push_str("<table><thead><tr>");
    for cell in table.header() {
        html.push_str("<th>");
        write_plain(html, cell);
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");
    for row in table.body() {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            write_plain(html, cell);
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
}

/// Media blocks become a `<figure>`; references that would not survive a
/// reload are left out entirely.
fn write_media(html: &mut String, media: &MediaBlock) {
    if !media.source.is_durable() {
        return;
    }
    match &media.source {
        MediaSource::Image { src, alt } => {
            html.push_str(&format!(r#"<figure class="image align-{}">"#, media.align));
            html.push_str(r#"<img src=""#);
            encode_double_quoted_attribute_to_string(src, html);
            html.push_str(r#"" alt=""#);
            encode_double_quoted_attribute_to_string(alt, html);
            html.push_str(r#"">"#);
        }
        MediaSource::Embed { url } => {
            html.push_str(&format!(r#"<figure class="embed align-{}" data-embed=""#, media.align));
            encode_double_quoted_attribute_to_string(url, html);
            html.push_str(r#""><iframe src=""#);
            encode_double_quoted_attribute_to_string(url, html);
            html.push_str(r#""></iframe>"#);
        }
    }
    if !media.caption.is_empty() {
        html.push_str("<figcaption>");
        write_plain(html, &media.caption);
        html.push_str("</figcaption>");
    }
    html.push_str("</figure>");
}

/// Writes the text of one slot.
///
/// HTML collapses whitespace, so a space that would be lost (at either edge
/// of the slot, or after another space or a line break) is written as
/// `&nbsp;`. A trailing line break needs a second `<br>` to render.
struct SlotText {
    len: usize,
    position: usize,
    after_space: bool,
    ends_with_break: bool,
}

impl SlotText {
    fn new(len: usize) -> Self {
        Self {
            len,
            position: 0,
            after_space: true,
            ends_with_break: false,
        }
    }

    fn write(&mut self, html: &mut String, text: &str) {
        let mut plain = String::new();
        for ch in text.chars() {
            self.position += 1;
            self.ends_with_break = ch == '\n';
            match ch {
                '\n' => {
                    flush_plain(html, &mut plain);
                    html.push_str("<br>");
                    self.after_space = true;
                }
                '\u{a0}' => {
                    flush_plain(html, &mut plain);
                    html.push_str("&nbsp;");
                    self.after_space = false;
                }
                c if c.is_ascii_whitespace() => {
                    if self.after_space || self.position == self.len {
                        flush_plain(html, &mut plain);
                        html.push_str("&nbsp;");
                        self.after_space = false;
                    } else {
                        plain.push(' ');
                        self.after_space = true;
                    }
                }
                c => {
                    plain.push(c);
                    self.after_space = false;
                }
            }
        }
        flush_plain(html, &mut plain);
    }

    fn finish(&self, html: &mut String) {
        if self.ends_with_break {
            html.push_str("<br>");
        }
    }
}

fn flush_plain(html: &mut String, plain: &mut String) {
    if !plain.is_empty() {
        encode_text_to_string(plain.as_str(), html);
        plain.clear();
    }
}
