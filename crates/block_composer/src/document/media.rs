// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use url::Url;

use super::Alignment;

/// Identifies an image whose upload is still in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadTicket(pub(crate) u64);

/// What a media block shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaSource {
    Image { src: String, alt: String },
    Embed { url: String },
}

impl MediaSource {
    pub fn image(src: impl Into<String>) -> Self {
        Self::Image {
            src: src.into(),
            alt: String::new(),
        }
    }

    pub fn embed(url: impl Into<String>) -> Self {
        Self::Embed { url: url.into() }
    }

    /// Whether the reference survives being saved: a web URL, or for images
    /// also the inline preview shown while an upload is pending.
    pub fn is_durable(&self) -> bool {
        match self {
            Self::Image { src, .. } => {
                is_web_url(src) || src.starts_with("data:image/")
            }
            Self::Embed { url } => is_web_url(url),
        }
    }
}

/// A non-editable wrapper around one image or embed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaBlock {
    pub source: MediaSource,
    /// Plain text, edited in place.
    pub caption: String,
    pub align: Alignment,
    pub(crate) selected: bool,
    pub(crate) upload: Option<UploadTicket>,
}

impl MediaBlock {
    pub fn new(source: MediaSource) -> Self {
        Self {
            source,
            caption: String::new(),
            align: Alignment::Center,
            selected: false,
            upload: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn pending_upload(&self) -> Option<UploadTicket> {
        self.upload
    }
}

pub(crate) fn is_web_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_need_a_web_url_to_be_durable() {
        assert!(MediaSource::embed("https://video.example/watch?v=1").is_durable());
        assert!(!MediaSource::embed("blob:https://example.com/123").is_durable());
        assert!(!MediaSource::embed("not a url").is_durable());
    }

    #[test]
    fn images_are_durable_even_while_uploading() {
        assert!(MediaSource::image("data:image/png;base64,AAAA").is_durable());
        assert!(!MediaSource::image("").is_durable());
        assert!(!MediaSource::image("/relative.png").is_durable());
    }
}
