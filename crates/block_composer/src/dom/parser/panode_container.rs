// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::QualName;
use regex::Regex;

use super::PaDomHandle;
use crate::document::Alignment;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeContainer {
    pub(crate) name: QualName,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<PaDomHandle>,
}

impl PaNodeContainer {
    pub(crate) fn tag(&self) -> &str {
        self.name.local.as_ref()
    }

    pub(crate) fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _v)| n == name)
            .map(|(_n, v)| v.as_str())
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    /// Inline style check used for markup pasted from office suites, which
    /// carry formatting on `<span style=…>` rather than on tags. Styles are
    /// only read, never kept.
    pub(crate) fn contains_style(&self, name: &str, value: &str) -> bool {
        self.get_attr("style")
            .map(|v| {
                Regex::new(&format!(
                    r"(?i)(^|;)\s*{}:\s*{}\s*(;|$)",
                    regex::escape(name),
                    regex::escape(value)
                ))
                .map(|re| re.is_match(v))
                .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    /// Alignment from an `align-center` / `align-right` class.
    pub(crate) fn alignment(&self) -> Option<Alignment> {
        if self.has_class("align-center") {
            Some(Alignment::Center)
        } else if self.has_class("align-right") {
            Some(Alignment::Right)
        } else if self.has_class("align-left") {
            Some(Alignment::Left)
        } else {
            None
        }
    }
}
