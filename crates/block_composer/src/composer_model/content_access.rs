// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use content_policy::{check, PolicyViolation};

use crate::dom::{to_html, to_tree};
use crate::Composer;

impl Composer {
    /// The persisted form of the document.
    pub fn get_content_as_html(&self) -> String {
        to_html(&self.document)
    }

    pub fn get_content_as_plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Debug rendering of the block tree with the selection marked.
    pub fn to_tree(&self) -> String {
        to_tree(&self.document, &self.selection)
    }

    /// Check the document against the save-time content policy.
    pub fn validate(&self, max_words: usize) -> Result<(), PolicyViolation> {
        check(&self.document.content_stats(), max_words)
    }
}

#[cfg(test)]
mod tests {
    use content_policy::PolicyViolation;

    use crate::Composer;

    #[test]
    fn plain_text_joins_blocks() {
        let model = Composer::from_html("<h2>Title</h2><p>Some <em>body</em></p>");
        assert_eq!(model.get_content_as_plain_text(), "Title\nSome body");
    }

    #[test]
    fn empty_document_needs_content() {
        let model = Composer::new();
        assert_eq!(model.validate(5000), Err(PolicyViolation::ContentRequired));
    }

    #[test]
    fn an_image_is_enough_content() {
        let model = Composer::from_html(
            "<figure class=\"image\"><img src=\"https://x.org/a.png\" alt=\"\"></figure>",
        );
        assert_eq!(model.validate(5000), Ok(()));
    }
}
