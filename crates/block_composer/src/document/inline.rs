// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Inline rich text: a sequence of text runs, each carrying a set of
//! [`Marks`] and an optional link target.
//!
//! All offsets are in `char`s. Line breaks are stored as `'\n'` inside run
//! text and rendered as `<br>`.

use strum_macros::{Display, EnumIter};

/// An inline formatting mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum InlineMark {
    Bold,
    Italic,
    Underline,
}

/// The set of marks active on a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Marks {
    pub fn has(&self, mark: InlineMark) -> bool {
        match mark {
            InlineMark::Bold => self.bold,
            InlineMark::Italic => self.italic,
            InlineMark::Underline => self.underline,
        }
    }

    pub fn set(&mut self, mark: InlineMark, on: bool) {
        match mark {
            InlineMark::Bold => self.bold = on,
            InlineMark::Italic => self.italic = on,
            InlineMark::Underline => self.underline = on,
        }
    }

    pub fn with(mut self, mark: InlineMark) -> Self {
        self.set(mark, true);
        self
    }

    pub fn toggled(mut self, mark: InlineMark) -> Self {
        self.set(mark, !self.has(mark));
        self
    }

    pub fn is_empty(&self) -> bool {
        !(self.bold || self.italic || self.underline)
    }
}

/// A maximal stretch of text sharing the same marks and link.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub marks: Marks,
    pub link: Option<String>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn new(
        text: impl Into<String>,
        marks: Marks,
        link: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            marks,
            link,
        }
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn same_attributes(&self, other: &TextRun) -> bool {
        self.marks == other.marks && self.link == other.link
    }

    fn with_text(&self, text: String) -> Self {
        Self {
            text,
            marks: self.marks,
            link: self.link.clone(),
        }
    }
}

/// Rich inline content of a paragraph or list item.
///
/// Invariant: no run is empty and no two neighbouring runs share the same
/// attributes. Every mutating method restores it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineContent {
    runs: Vec<TextRun>,
}

impl InlineContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_plain(text: &str) -> Self {
        Self::from_runs(vec![TextRun::plain(text)])
    }

    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        let mut content = Self { runs };
        content.normalize();
        content
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.iter().map(TextRun::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The text with all marks and links dropped.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn has_links(&self) -> bool {
        self.runs.iter().any(|r| r.link.is_some())
    }

    pub fn has_marks(&self) -> bool {
        self.runs.iter().any(|r| !r.marks.is_empty())
    }

    /// Insert `text` at `offset` with the given attributes.
    pub fn insert(
        &mut self,
        offset: usize,
        text: &str,
        marks: Marks,
        link: Option<String>,
    ) {
        if text.is_empty() {
            return;
        }
        let index = self.split_at(offset);
        self.runs.insert(index, TextRun::new(text, marks, link));
        self.normalize();
    }

    /// Insert another piece of content at `offset`, keeping its attributes.
    pub fn insert_content(&mut self, offset: usize, other: InlineContent) {
        let index = self.split_at(offset);
        let tail = self.runs.split_off(index);
        self.runs.extend(other.runs);
        self.runs.extend(tail);
        self.normalize();
    }

    /// Remove the characters in `start..end`.
    pub fn delete(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        self.runs.drain(first..last);
        self.normalize();
    }

    /// Split the content at `offset`, returning everything after it.
    pub fn split_off(&mut self, offset: usize) -> InlineContent {
        let index = self.split_at(offset);
        let tail = self.runs.split_off(index);
        self.normalize();
        InlineContent::from_runs(tail)
    }

    pub fn append(&mut self, other: InlineContent) {
        self.runs.extend(other.runs);
        self.normalize();
    }

    /// Attributes that text typed at `offset` should inherit: those of the
    /// character before the cursor, or of the first character at the start.
    /// Links are never inherited.
    pub fn marks_at(&self, offset: usize) -> Marks {
        let probe = offset.saturating_sub(1);
        self.run_containing(probe)
            .map(|(index, _)| self.runs[index].marks)
            .unwrap_or_default()
    }

    /// Whether every character in `start..end` carries `mark`. An empty
    /// range looks at the character before `start`.
    pub fn has_mark(&self, start: usize, end: usize, mark: InlineMark) -> bool {
        if start >= end {
            return self.marks_at(start).has(mark);
        }
        let mut position = 0;
        let mut seen = false;
        for run in &self.runs {
            let run_end = position + run.len();
            if run_end > start && position < end {
                if !run.marks.has(mark) {
                    return false;
                }
                seen = true;
            }
            position = run_end;
        }
        seen
    }

    /// Turn `mark` on or off over `start..end`.
    pub fn apply_mark(
        &mut self,
        start: usize,
        end: usize,
        mark: InlineMark,
        on: bool,
    ) {
        if start >= end {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        for run in &mut self.runs[first..last] {
            run.marks.set(mark, on);
        }
        self.normalize();
    }

    /// Set (or with `None`, clear) the link over `start..end`.
    pub fn set_link(&mut self, start: usize, end: usize, link: Option<&str>) {
        if start >= end {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        for run in &mut self.runs[first..last] {
            run.link = link.map(str::to_owned);
        }
        self.normalize();
    }

    /// The extent and target of the link touching `offset`, preferring the
    /// character at the cursor over the one before it.
    pub fn link_at(&self, offset: usize) -> Option<(usize, usize, String)> {
        let (index, _) = self
            .run_containing(offset)
            .filter(|(i, _)| self.runs[*i].link.is_some())
            .or_else(|| {
                offset
                    .checked_sub(1)
                    .and_then(|o| self.run_containing(o))
                    .filter(|(i, _)| self.runs[*i].link.is_some())
            })?;
        let url = self.runs[index].link.clone()?;
        // Neighbouring runs with the same link differ only in marks.
        let mut first = index;
        while first > 0 && self.runs[first - 1].link.as_ref() == Some(&url) {
            first -= 1;
        }
        let mut last = index;
        while last + 1 < self.runs.len()
            && self.runs[last + 1].link.as_ref() == Some(&url)
        {
            last += 1;
        }
        let start: usize = self.runs[..first].iter().map(TextRun::len).sum();
        let end: usize =
            start + self.runs[first..=last].iter().map(TextRun::len).sum::<usize>();
        Some((start, end, url))
    }

    /// Drop spaces and tabs from the very start and end. Leading line breaks
    /// are kept; one trailing line break goes since it would not render.
    pub fn trim_edges(&mut self) {
        if let Some(first) = self.runs.first_mut() {
            first.text = first
                .text
                .trim_start_matches(|c: char| c == ' ' || c == '\t')
                .to_owned();
        }
        if let Some(last) = self.runs.last_mut() {
            last.text = last
                .text
                .trim_end_matches(|c: char| c == ' ' || c == '\t')
                .to_owned();
            if last.text.ends_with('\n') {
                last.text.pop();
            }
        }
        self.normalize();
    }

    /// Re-establish the run invariant.
    pub fn normalize(&mut self) {
        self.runs.retain(|r| !r.is_empty());
        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(previous) if previous.same_attributes(&run) => {
                    previous.text.push_str(&run.text)
                }
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }

    /// Index of the run containing the character at `offset`, together with
    /// the run's start offset.
    fn run_containing(&self, offset: usize) -> Option<(usize, usize)> {
        let mut position = 0;
        for (index, run) in self.runs.iter().enumerate() {
            let len = run.len();
            if offset < position + len {
                return Some((index, position));
            }
            position += len;
        }
        None
    }

    /// Make sure a run boundary exists at `offset` and return the index of
    /// the first run starting there. Offsets past the end clamp to it.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut position = 0;
        for index in 0..self.runs.len() {
            if offset == position {
                return index;
            }
            let len = self.runs[index].len();
            if offset < position + len {
                let byte = char_to_byte(&self.runs[index].text, offset - position);
                let tail = self.runs[index].text.split_off(byte);
                let tail_run = self.runs[index].with_text(tail);
                self.runs.insert(index + 1, tail_run);
                return index + 1;
            }
            position += len;
        }
        self.runs.len()
    }
}

/// Byte index of the `offset`th char, or the length if out of range.
pub(crate) fn char_to_byte(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(index, _)| index)
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Insert into a plain-text slot. Line breaks are not allowed there.
pub(crate) fn plain_insert(target: &mut String, offset: usize, text: &str) {
    let byte = char_to_byte(target, offset);
    target.insert_str(byte, &flatten_line_breaks(text));
}

pub(crate) fn plain_delete(target: &mut String, start: usize, end: usize) {
    if start >= end {
        return;
    }
    let from = char_to_byte(target, start);
    let to = char_to_byte(target, end);
    target.replace_range(from..to, "");
}

pub(crate) fn plain_split_off(target: &mut String, offset: usize) -> String {
    let byte = char_to_byte(target, offset);
    target.split_off(byte)
}

/// Plain-text zones hold a single line.
pub(crate) fn flatten_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> Marks {
        Marks::default().with(InlineMark::Bold)
    }

    fn content(runs: &[(&str, Marks)]) -> InlineContent {
        InlineContent::from_runs(
            runs.iter()
                .map(|(t, m)| TextRun::new(*t, *m, None))
                .collect(),
        )
    }

    #[test]
    fn from_runs_merges_neighbours_and_drops_empty_runs() {
        let c = content(&[
            ("ab", bold()),
            ("", Marks::default()),
            ("cd", bold()),
            ("ef", Marks::default()),
        ]);
        assert_eq!(c.runs().len(), 2);
        assert_eq!(c.runs()[0].text, "abcd");
        assert_eq!(c.len(), 6);
    }

    #[test]
    fn apply_mark_splits_runs() {
        let mut c = InlineContent::from_plain("aabbcc");
        c.apply_mark(2, 4, InlineMark::Bold, true);
        let texts: Vec<&str> = c.runs().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["aa", "bb", "cc"]);
        assert!(c.runs()[1].marks.bold);
        assert!(c.has_mark(2, 4, InlineMark::Bold));
        assert!(!c.has_mark(1, 4, InlineMark::Bold));
    }

    #[test]
    fn removing_a_mark_merges_back() {
        let mut c = InlineContent::from_plain("aabbcc");
        c.apply_mark(2, 4, InlineMark::Italic, true);
        c.apply_mark(0, 6, InlineMark::Italic, false);
        assert_eq!(c, InlineContent::from_plain("aabbcc"));
    }

    #[test]
    fn insert_inside_a_run_keeps_the_sides() {
        let mut c = content(&[("hello", bold())]);
        c.insert(2, "XY", Marks::default(), None);
        assert_eq!(c.plain_text(), "heXYllo");
        assert_eq!(c.runs().len(), 3);
    }

    #[test]
    fn delete_across_runs() {
        let mut c = content(&[("abc", bold()), ("def", Marks::default())]);
        c.delete(1, 5);
        assert_eq!(c.plain_text(), "af");
        assert_eq!(c.runs().len(), 2);
    }

    #[test]
    fn split_off_and_append_round_trip() {
        let original = content(&[("abc", bold()), ("def", Marks::default())]);
        let mut head = original.clone();
        let tail = head.split_off(4);
        assert_eq!(head.plain_text(), "abcd");
        assert_eq!(tail.plain_text(), "ef");
        head.append(tail);
        assert_eq!(head, original);
    }

    #[test]
    fn link_at_spans_runs_with_different_marks() {
        let url = Some("https://example.com".to_owned());
        let c = InlineContent::from_runs(vec![
            TextRun::plain("see "),
            TextRun::new("the", bold(), url.clone()),
            TextRun::new(" docs", Marks::default(), url),
            TextRun::plain("!"),
        ]);
        assert_eq!(
            c.link_at(5),
            Some((4, 12, "https://example.com".to_owned()))
        );
        // Cursor right after the link still finds it
        assert_eq!(c.link_at(12).map(|l| l.0), Some(4));
        assert_eq!(c.link_at(1), None);
    }

    #[test]
    fn marks_at_uses_the_previous_character() {
        let c = content(&[("ab", bold()), ("cd", Marks::default())]);
        assert!(c.marks_at(2).bold);
        assert!(!c.marks_at(3).bold);
        assert!(c.marks_at(0).bold);
    }

    #[test]
    fn trim_edges_removes_spaces_and_trailing_break() {
        let mut c = InlineContent::from_plain("  hello \n");
        c.trim_edges();
        assert_eq!(c.plain_text(), "hello ");
        let mut c = InlineContent::from_plain("\u{a0}x");
        c.trim_edges();
        assert_eq!(c.plain_text(), "\u{a0}x");
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        let mut c = InlineContent::from_plain("héllo");
        c.apply_mark(1, 2, InlineMark::Underline, true);
        assert_eq!(c.runs()[1].text, "é");
        let mut s = String::from("héllo");
        plain_delete(&mut s, 1, 3);
        assert_eq!(s, "hlo");
    }
}
