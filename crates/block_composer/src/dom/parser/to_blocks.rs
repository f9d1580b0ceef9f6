// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{PaDom, PaDomCreator, PaDomHandle, PaDomNode, PaNodeContainer};
use crate::composer_model::normalize_url;
use crate::document::{
    Alignment, Block, HeadingLevel, InlineContent, InlineMark,
    ListKind, Marks, MediaBlock, MediaSource, Table,
};
use crate::error::HtmlParseError;

static META_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<meta[^>]*>").expect("valid regex"));

/// Google Docs wraps the whole clipboard in `<b id="docs-internal-guid-…">`.
static GOOGLE_DOCS_WRAPPER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)^\s*<b[^>]*id="docs-internal-guid[^"]*"[^>]*>(.*)</b>\s*$"#)
        .expect("valid regex")
});

/// Elements dropped together with everything inside them.
const SKIPPED_TAGS: &[&str] = &[
    "#ignored", "audio", "button", "canvas", "embed", "form", "head", "iframe",
    "input", "link", "math", "meta", "noscript", "object", "script", "select",
    "style", "svg", "template", "textarea", "title", "video",
];

/// Containers that end the paragraph before and after them.
const BLOCK_BOUNDARIES: &[&str] = &[
    "address", "article", "aside", "center", "dd", "div", "dl", "dt",
    "figcaption", "footer", "header", "li", "main", "nav", "pre", "section",
];

/// Parse HTML into blocks.
///
/// Anything outside the block grammar is discarded: unknown wrappers are
/// looked through and unsupported elements are dropped. Only the `href`,
/// `src`, `alt`, `class` and `data-embed` attributes are read, plus the
/// `style` of a `<span>`, whose weight, slant and underline become marks.
pub fn parse_html(html: &str) -> Result<Vec<Block>, HtmlParseError> {
    let cleaned = clean_markup(html);
    let (padom, parse_errors) = match PaDomCreator::parse(&cleaned) {
        Ok(dom) => (dom, Vec::new()),
        Err(err) => (err.dom, err.parse_errors),
    };
    if !parse_errors.is_empty() {
        debug!(count = parse_errors.len(), "html5ever reported parse errors");
    }
    let blocks = Converter::new(&padom).convert();
    if blocks.is_empty() {
        return Err(if parse_errors.is_empty() {
            HtmlParseError::Empty
        } else {
            HtmlParseError::Malformed { parse_errors }
        });
    }
    Ok(blocks)
}

/// Strip clipboard scaffolding that confuses the tree builder.
fn clean_markup(html: &str) -> String {
    let without_meta = META_TAG.replace_all(html, "");
    GOOGLE_DOCS_WRAPPER
        .replace(&without_meta, "$1")
        .into_owned()
}

struct OpenParagraph {
    content: InlineContent,
    align: Alignment,
    /// Came from a `<p>`, so it survives even when empty.
    explicit: bool,
    last_space: bool,
}

impl OpenParagraph {
    fn new(align: Alignment, explicit: bool) -> Self {
        Self {
            content: InlineContent::new(),
            align,
            explicit,
            last_space: true,
        }
    }
}

struct Converter<'a> {
    padom: &'a PaDom,
    blocks: Vec<Block>,
    open: Option<OpenParagraph>,
    marks: Marks,
    link: Option<String>,
}

impl<'a> Converter<'a> {
    fn new(padom: &'a PaDom) -> Self {
        Self {
            padom,
            blocks: Vec::new(),
            open: None,
            marks: Marks::default(),
            link: None,
        }
    }

    fn convert(mut self) -> Vec<Block> {
        let document = self.padom.document_handle().clone();
        self.walk_children(&document);
        self.flush();
        self.blocks
    }

    fn walk_children(&mut self, handle: &PaDomHandle) {
        let padom = self.padom;
        for child in padom.get_node(handle).children() {
            match padom.get_node(child) {
                PaDomNode::Text(text) => self.push_text(&text.content),
                PaDomNode::Container(node) => self.convert_container(child, node),
                PaDomNode::Document(_) => {}
            }
        }
    }

    fn convert_container(&mut self, handle: &PaDomHandle, node: &PaNodeContainer) {
        let tag = node.tag();
        match tag {
            _ if SKIPPED_TAGS.contains(&tag) => {}
            "p" => {
                self.flush();
                self.open = Some(OpenParagraph::new(
                    node.alignment().unwrap_or_default(),
                    true,
                ));
                self.walk_children(handle);
                self.flush();
            }
            _ if BLOCK_BOUNDARIES.contains(&tag) => {
                self.break_paragraph();
                if let Some(align) = node.alignment() {
                    self.open = Some(OpenParagraph::new(align, false));
                }
                self.walk_children(handle);
                self.break_paragraph();
            }
            "h1" | "h2" => self.push_heading(HeadingLevel::H2, handle, node),
            "h3" | "h4" | "h5" | "h6" => {
                self.push_heading(HeadingLevel::H3, handle, node)
            }
            "blockquote" => {
                let text = self.plain_text_of(handle);
                self.push_block(Block::Blockquote {
                    text,
                    align: node.alignment().unwrap_or_default(),
                });
            }
            "ul" => self.convert_list(handle, ListKind::Unordered),
            "ol" => self.convert_list(handle, ListKind::Ordered),
            "table" => self.convert_table(handle),
            "img" => {
                if let Some(source) = image_source(node) {
                    self.push_block(Block::Media(
                        MediaBlock::new(source)
                            .with_align(node.alignment().unwrap_or(Alignment::Center)),
                    ));
                }
            }
            "figure" => self.convert_figure(handle, node),
            "hr" => self.push_block(Block::HorizontalRule),
            "br" => self.push_break(),
            "b" | "strong" => self.with_marks(handle, self.marks.with(InlineMark::Bold)),
            "i" | "em" => self.with_marks(handle, self.marks.with(InlineMark::Italic)),
            "u" | "ins" => {
                self.with_marks(handle, self.marks.with(InlineMark::Underline))
            }
            "span" => self.with_marks(handle, marks_from_style(node, self.marks)),
            "a" => {
                let saved = self.link.clone();
                if let Some(href) = node.get_attr("href").and_then(normalize_url) {
                    self.link = Some(href);
                }
                self.walk_children(handle);
                self.link = saved;
            }
            // html, body, font, code, del, … are looked through
            _ => self.walk_children(handle),
        }
    }

    fn with_marks(&mut self, handle: &PaDomHandle, marks: Marks) {
        let saved = self.marks;
        self.marks = marks;
        self.walk_children(handle);
        self.marks = saved;
    }

    fn push_text(&mut self, text: &str) {
        let paragraph = self
            .open
            .get_or_insert_with(|| OpenParagraph::new(Alignment::Left, false));
        let mut collapsed = String::with_capacity(text.len());
        for ch in text.chars() {
            if ch.is_ascii_whitespace() {
                if !paragraph.last_space {
                    collapsed.push(' ');
                    paragraph.last_space = true;
                }
            } else {
                collapsed.push(ch);
                paragraph.last_space = false;
            }
        }
        let end = paragraph.content.len();
        paragraph
            .content
            .insert(end, &collapsed, self.marks, self.link.clone());
    }

    fn push_break(&mut self) {
        let paragraph = self
            .open
            .get_or_insert_with(|| OpenParagraph::new(Alignment::Left, false));
        let end = paragraph.content.len();
        paragraph
            .content
            .insert(end, "\n", self.marks, self.link.clone());
        paragraph.last_space = true;
    }

    /// Close the open paragraph, keeping it if it came from a `<p>`.
    fn flush(&mut self) {
        self.close_paragraph(true);
    }

    /// Close the open paragraph because a block interrupts it; an empty
    /// remainder is dropped.
    fn break_paragraph(&mut self) {
        self.close_paragraph(false);
    }

    fn close_paragraph(&mut self, keep_explicit: bool) {
        let Some(mut paragraph) = self.open.take() else {
            return;
        };
        paragraph.content.trim_edges();
        if !paragraph.content.is_empty() || (keep_explicit && paragraph.explicit) {
            self.blocks.push(Block::Paragraph {
                content: paragraph.content,
                align: paragraph.align,
            });
        }
    }

    fn push_block(&mut self, block: Block) {
        self.break_paragraph();
        self.blocks.push(block);
    }

    fn push_heading(
        &mut self,
        level: HeadingLevel,
        handle: &PaDomHandle,
        node: &PaNodeContainer,
    ) {
        let text = self.plain_text_of(handle);
        self.push_block(Block::Heading {
            level,
            text,
            align: node.alignment().unwrap_or_default(),
        });
    }

    fn convert_list(&mut self, handle: &PaDomHandle, kind: ListKind) {
        self.break_paragraph();
        let items = self.list_items(handle);
        if !items.is_empty() {
            self.blocks.push(Block::list(kind, items));
        }
    }

    /// Items of a list. Nested lists are flattened into the outer one, right
    /// after the item that held them.
    fn list_items(&self, handle: &PaDomHandle) -> Vec<InlineContent> {
        let padom = self.padom;
        let mut items = Vec::new();
        for child in padom.get_node(handle).children() {
            let PaDomNode::Container(node) = padom.get_node(child) else {
                continue;
            };
            match node.tag() {
                tag if SKIPPED_TAGS.contains(&tag) => {}
                "ul" | "ol" => items.extend(self.list_items(child)),
                tag => {
                    let (item, nested) = self.list_item(child);
                    if tag == "li" || !item.is_empty() {
                        items.push(item);
                    }
                    items.extend(nested);
                }
            }
        }
        items
    }

    fn list_item(&self, handle: &PaDomHandle) -> (InlineContent, Vec<InlineContent>) {
        let mut inner = Converter::new(self.padom);
        inner.marks = self.marks;
        inner.link = self.link.clone();
        inner.walk_children(handle);
        inner.flush();

        let mut item = InlineContent::new();
        let mut nested = Vec::new();
        let add_line = |item: &mut InlineContent, line: InlineContent| {
            if line.is_empty() {
                return;
            }
            if !item.is_empty() {
                let end = item.len();
                item.insert(end, "\n", Marks::default(), None);
            }
            item.append(line);
        };
        for block in inner.blocks {
            match block {
                Block::Paragraph { content, .. } => add_line(&mut item, content),
                Block::Heading { text, .. } | Block::Blockquote { text, .. } => {
                    add_line(&mut item, InlineContent::from_plain(&text))
                }
                Block::List { items, .. } => nested.extend(items),
                Block::Table(_) | Block::Media(_) | Block::HorizontalRule => {}
            }
        }
        (item, nested)
    }

    fn convert_table(&mut self, handle: &PaDomHandle) {
        self.break_paragraph();
        let mut header = None;
        let mut rows = Vec::new();
        self.collect_rows(handle, false, &mut header, &mut rows);
        let header = match header {
            Some(header) => header,
            None if !rows.is_empty() => rows.remove(0),
            None => return,
        };
        if rows.is_empty() {
            rows.push(Vec::new());
        }
        self.blocks.push(Block::Table(Table::from_cells(header, rows)));
    }

    fn collect_rows(
        &self,
        handle: &PaDomHandle,
        in_head: bool,
        header: &mut Option<Vec<String>>,
        rows: &mut Vec<Vec<String>>,
    ) {
        let padom = self.padom;
        for child in padom.get_node(handle).children() {
            let PaDomNode::Container(node) = padom.get_node(child) else {
                continue;
            };
            match node.tag() {
                "thead" => self.collect_rows(child, true, header, rows),
                "tbody" | "tfoot" => self.collect_rows(child, false, header, rows),
                "tr" => {
                    let mut all_th = true;
                    let mut cells = Vec::new();
                    for cell in padom.get_node(child).children() {
                        if let PaDomNode::Container(c) = padom.get_node(cell) {
                            match c.tag() {
                                "th" => cells.push(self.plain_text_of(cell)),
                                "td" => {
                                    all_th = false;
                                    cells.push(self.plain_text_of(cell));
                                }
                                _ => {}
                            }
                        }
                    }
                    let is_header = in_head || (rows.is_empty() && all_th && !cells.is_empty());
                    if header.is_none() && is_header {
                        *header = Some(cells);
                    } else {
                        rows.push(cells);
                    }
                }
                _ => {}
            }
        }
    }

    fn convert_figure(&mut self, handle: &PaDomHandle, node: &PaNodeContainer) {
        self.break_paragraph();
        let mut source = node
            .get_attr("data-embed")
            .map(|url| MediaSource::embed(url.trim()));
        let mut caption = String::new();
        self.figure_parts(handle, &mut source, &mut caption);
        match source {
            Some(source) => self.blocks.push(Block::Media(
                MediaBlock::new(source)
                    .with_caption(caption)
                    .with_align(node.alignment().unwrap_or(Alignment::Center)),
            )),
            None => {
                self.walk_children(handle);
                self.break_paragraph();
            }
        }
    }

    fn figure_parts(
        &self,
        handle: &PaDomHandle,
        source: &mut Option<MediaSource>,
        caption: &mut String,
    ) {
        let padom = self.padom;
        for child in padom.get_node(handle).children() {
            let PaDomNode::Container(node) = padom.get_node(child) else {
                continue;
            };
            match node.tag() {
                "img" if source.is_none() => *source = image_source(node),
                "iframe" | "video" | "embed" if source.is_none() => {
                    *source = node
                        .get_attr("src")
                        .map(|url| MediaSource::embed(url.trim()));
                }
                "figcaption" => *caption = self.plain_text_of(child),
                tag if SKIPPED_TAGS.contains(&tag) => {}
                _ => self.figure_parts(child, source, caption),
            }
        }
    }

    /// The visible text below `handle` on a single line, whitespace
    /// collapsed and trimmed.
    fn plain_text_of(&self, handle: &PaDomHandle) -> String {
        let mut out = String::new();
        let mut last_space = true;
        self.collect_text(handle, &mut out, &mut last_space);
        out.trim_end_matches(' ').to_owned()
    }

    fn collect_text(&self, handle: &PaDomHandle, out: &mut String, last_space: &mut bool) {
        let padom = self.padom;
        for child in padom.get_node(handle).children() {
            match padom.get_node(child) {
                PaDomNode::Text(text) => push_collapsed(out, last_space, &text.content),
                PaDomNode::Container(node) => match node.tag() {
                    tag if SKIPPED_TAGS.contains(&tag) => {}
                    "br" => push_collapsed(out, last_space, " "),
                    tag => {
                        let separate = tag == "p"
                            || BLOCK_BOUNDARIES.contains(&tag)
                            || matches!(tag, "td" | "th" | "tr");
                        if separate {
                            push_collapsed(out, last_space, " ");
                        }
                        self.collect_text(child, out, last_space);
                        if separate {
                            push_collapsed(out, last_space, " ");
                        }
                    }
                },
                PaDomNode::Document(_) => {}
            }
        }
    }
}

fn push_collapsed(out: &mut String, last_space: &mut bool, text: &str) {
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !*last_space {
                out.push(' ');
                *last_space = true;
            }
        } else {
            out.push(ch);
            *last_space = false;
        }
    }
}

fn image_source(node: &PaNodeContainer) -> Option<MediaSource> {
    let source = MediaSource::Image {
        src: node.get_attr("src")?.trim().to_owned(),
        alt: node.get_attr("alt").unwrap_or_default().to_owned(),
    };
    source.is_durable().then_some(source)
}

/// Office suites put formatting on spans as inline style.
fn marks_from_style(node: &PaNodeContainer, mut marks: Marks) -> Marks {
    if ["bold", "700", "600", "800", "900", "bolder"]
        .iter()
        .any(|v| node.contains_style("font-weight", v))
    {
        marks.set(InlineMark::Bold, true);
    }
    if node.contains_style("font-style", "italic") {
        marks.set(InlineMark::Italic, true);
    }
    if node.contains_style("text-decoration", "underline")
        || node.contains_style("text-decoration-line", "underline")
    {
        marks.set(InlineMark::Underline, true);
    }
    marks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Slot, TextRun};

    fn parse(html: &str) -> Vec<Block> {
        parse_html(html).unwrap()
    }

    fn bold() -> Marks {
        Marks::default().with(InlineMark::Bold)
    }

    #[test]
    fn paragraphs_and_marks() {
        let blocks = parse("<p>a <strong>b</strong></p><p></p>");
        assert_eq!(
            blocks,
            vec![
                Block::paragraph(InlineContent::from_runs(vec![
                    TextRun::plain("a "),
                    TextRun::new("b", bold(), None),
                ])),
                Block::empty_paragraph(),
            ]
        );
    }

    #[test]
    fn loose_text_is_wrapped_in_a_paragraph() {
        assert_eq!(parse("hello   world"), vec![Block::plain_paragraph("hello world")]);
    }

    #[test]
    fn whitespace_between_blocks_does_not_create_paragraphs() {
        let blocks = parse("<h2>T</h2>\n  \n<hr>\n");
        assert_eq!(blocks, vec![Block::heading(HeadingLevel::H2, "T"), Block::HorizontalRule]);
    }

    #[test]
    fn headings_map_to_two_levels_and_drop_marks() {
        let blocks = parse("<h1><b>A</b></h1><h4><a href='https://x.org'>B</a></h4>");
        assert_eq!(
            blocks,
            vec![
                Block::heading(HeadingLevel::H2, "A"),
                Block::heading(HeadingLevel::H3, "B"),
            ]
        );
    }

    #[test]
    fn blockquote_is_plain_text() {
        let blocks = parse("<blockquote><p><em>quoted</em></p><p>text</p></blockquote>");
        assert_eq!(blocks, vec![Block::blockquote("quoted text")]);
    }

    #[test]
    fn scripts_and_styles_are_dropped() {
        let blocks = parse("<p>a<script>alert(1)</script><style>p{}</style>b</p>");
        assert_eq!(blocks, vec![Block::plain_paragraph("ab")]);
    }

    #[test]
    fn javascript_links_lose_their_href() {
        let blocks = parse("<p><a href='javascript:alert(1)'>x</a></p>");
        assert_eq!(blocks, vec![Block::plain_paragraph("x")]);
    }

    #[test]
    fn links_are_kept() {
        let blocks = parse("<p><a href='https://example.com'>x</a></p>");
        let Block::Paragraph { content, .. } = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(content.link_at(0).map(|l| l.2), Some("https://example.com".to_owned()));
    }

    #[test]
    fn nested_lists_are_flattened() {
        let blocks = parse("<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>");
        assert_eq!(
            blocks,
            vec![Block::list(
                ListKind::Unordered,
                vec![
                    InlineContent::from_plain("a"),
                    InlineContent::from_plain("b"),
                    InlineContent::from_plain("c"),
                ]
            )]
        );
    }

    #[test]
    fn tables_take_their_header_from_thead_or_th() {
        let blocks = parse(
            "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>",
        );
        let Block::Table(table) = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.header(), &["A", "B"]);
        assert_eq!(table.body(), &[vec!["1".to_owned(), "2".to_owned()]]);
    }

    #[test]
    fn single_row_table_gets_an_empty_body_row() {
        let blocks = parse("<table><tr><td>only</td></tr></table>");
        let Block::Table(table) = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.header(), &["only", ""]);
        assert_eq!(table.body_row_count(), 1);
    }

    #[test]
    fn figures_become_media_blocks() {
        let blocks = parse(
            r#"<figure class="image align-right"><img src="https://x.org/a.png" alt="A"><figcaption>Cap</figcaption></figure>"#,
        );
        assert_eq!(
            blocks,
            vec![Block::Media(
                MediaBlock::new(MediaSource::Image {
                    src: "https://x.org/a.png".into(),
                    alt: "A".into()
                })
                .with_caption("Cap")
                .with_align(Alignment::Right)
            )]
        );
        assert_eq!(blocks[0].slot_len(Slot::Caption), Some(3));
    }

    #[test]
    fn embeds_read_data_embed() {
        let blocks = parse(
            r#"<figure class="embed" data-embed="https://video.example/v/1"><iframe src="https://video.example/v/1"></iframe></figure>"#,
        );
        assert_eq!(
            blocks,
            vec![Block::Media(MediaBlock::new(MediaSource::embed(
                "https://video.example/v/1"
            )))]
        );
    }

    #[test]
    fn images_inside_paragraphs_split_them() {
        let blocks = parse(r#"<p>a<img src="https://x.org/a.png">b</p>"#);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], Block::plain_paragraph("a"));
        assert!(matches!(blocks[1], Block::Media(_)));
        assert_eq!(blocks[2], Block::plain_paragraph("b"));
    }

    #[test]
    fn relative_images_are_dropped() {
        assert_eq!(parse_html(r#"<img src="/a.png">"#), Err(HtmlParseError::Empty));
    }

    #[test]
    fn office_spans_carry_marks() {
        let blocks = parse(r#"<p><span style="font-weight:700">B</span></p>"#);
        assert_eq!(
            blocks,
            vec![Block::paragraph(InlineContent::from_runs(vec![TextRun::new(
                "B",
                bold(),
                None
            )]))]
        );
    }

    #[test]
    fn style_is_only_read_on_spans() {
        let blocks = parse(r#"<p style="font-weight:700"><em style="font-weight:700">B</em></p>"#);
        assert_eq!(
            blocks,
            vec![Block::paragraph(InlineContent::from_runs(vec![TextRun::new(
                "B",
                Marks::default().with(InlineMark::Italic),
                None
            )]))]
        );
    }

    #[test]
    fn google_docs_wrapper_and_meta_are_stripped() {
        let html = r#"<meta charset="utf-8"><b style="font-weight:normal;" id="docs-internal-guid-123"><p><span>Doc</span></p></b>"#;
        assert_eq!(parse(html), vec![Block::plain_paragraph("Doc")]);
    }

    #[test]
    fn alignment_classes_are_read() {
        let blocks = parse(r#"<p class="align-center">c</p>"#);
        assert_eq!(blocks[0].align(), Some(Alignment::Center));
    }

    #[test]
    fn line_breaks_and_nbsp() {
        let blocks = parse("<p>a<br>b&nbsp;&nbsp;c</p>");
        assert_eq!(blocks, vec![Block::plain_paragraph("a\nb\u{a0}\u{a0}c")]);
    }

    #[test]
    fn nothing_usable_is_an_error() {
        assert_eq!(parse_html("<script>x</script>"), Err(HtmlParseError::Empty));
        assert_eq!(parse_html("   "), Err(HtmlParseError::Empty));
    }
}
