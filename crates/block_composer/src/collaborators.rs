// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The host-side services the composer talks to.
//!
//! Every collaborator is optional. Without an uploader pasted image files
//! are ignored, without a compressor images are used as they are, and
//! without a markup cleaner pasted HTML goes straight to the built-in tag
//! mapping.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::config::CompressionOptions;
use crate::document::{Selection, UploadTicket};
use crate::error::{CompressError, UploadError};
use crate::ComposerUpdate;

/// The future an [`ImageUploader`] hands back. Resolves to the durable URL.
pub type UploadFuture = Pin<Box<dyn Future<Output = Result<String, UploadError>>>>;

/// An image picked, dropped or pasted by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// Inline preview shown while the upload runs.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

pub trait ImageCompressor {
    fn compress(
        &self,
        file: ImageFile,
        options: &CompressionOptions,
    ) -> Result<ImageFile, CompressError>;
}

impl<F> ImageCompressor for F
where
    F: Fn(ImageFile, &CompressionOptions) -> Result<ImageFile, CompressError>,
{
    fn compress(
        &self,
        file: ImageFile,
        options: &CompressionOptions,
    ) -> Result<ImageFile, CompressError> {
        self(file, options)
    }
}

pub trait ImageUploader {
    fn upload(&self, file: ImageFile) -> UploadFuture;
}

impl<F, Fut> ImageUploader for F
where
    F: Fn(ImageFile) -> Fut,
    Fut: Future<Output = Result<String, UploadError>> + 'static,
{
    fn upload(&self, file: ImageFile) -> UploadFuture {
        Box::pin(self(file))
    }
}

/// First-pass cleaning of pasted HTML. `None` means "use plain text".
pub trait MarkupCleaner {
    fn sanitize(&self, raw_html: &str) -> Option<String>;
}

impl<F> MarkupCleaner for F
where
    F: Fn(&str) -> Option<String>,
{
    fn sanitize(&self, raw_html: &str) -> Option<String> {
        self(raw_html)
    }
}

/// Non-fatal problems the user should hear about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostAlert {
    UploadFailed { reason: String },
    CompressionFailed { reason: String },
    TableRowLimit,
    TableColumnLimit,
}

pub trait AlertSink {
    fn alert(&self, alert: HostAlert);
}

impl<F> AlertSink for F
where
    F: Fn(HostAlert),
{
    fn alert(&self, alert: HostAlert) {
        self(alert)
    }
}

/// Receives the serialized content after every successful mutation.
pub trait ChangeListener {
    fn content_changed(&mut self, html: &str);
}

impl<F> ChangeListener for F
where
    F: FnMut(&str),
{
    fn content_changed(&mut self, html: &str) {
        self(html)
    }
}

/// The live editable surface the composer renders into.
///
/// The composer owns the document; the surface only reports where the user
/// put the caret and shows whatever update it is handed.
pub trait EditableSurface {
    fn current_selection(&self) -> Option<Selection>;
    fn apply(&mut self, update: &ComposerUpdate);
}

#[derive(Default)]
pub struct Collaborators {
    pub(crate) compressor: Option<Box<dyn ImageCompressor>>,
    pub(crate) uploader: Option<Box<dyn ImageUploader>>,
    pub(crate) cleaner: Option<Box<dyn MarkupCleaner>>,
    pub(crate) alerts: Option<Box<dyn AlertSink>>,
    pub(crate) listener: Option<Box<dyn ChangeListener>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compressor(mut self, compressor: impl ImageCompressor + 'static) -> Self {
        self.compressor = Some(Box::new(compressor));
        self
    }

    pub fn with_uploader(mut self, uploader: impl ImageUploader + 'static) -> Self {
        self.uploader = Some(Box::new(uploader));
        self
    }

    pub fn with_cleaner(mut self, cleaner: impl MarkupCleaner + 'static) -> Self {
        self.cleaner = Some(Box::new(cleaner));
        self
    }

    pub fn with_alerts(mut self, alerts: impl AlertSink + 'static) -> Self {
        self.alerts = Some(Box::new(alerts));
        self
    }

    pub fn with_listener(mut self, listener: impl ChangeListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn has_uploader(&self) -> bool {
        self.uploader.is_some()
    }

    pub(crate) fn alert(&self, alert: HostAlert) {
        if let Some(alerts) = &self.alerts {
            alerts.alert(alert);
        }
    }

    pub(crate) fn emit(&mut self, html: &str) {
        if let Some(listener) = self.listener.as_mut() {
            listener.content_changed(html);
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("compressor", &self.compressor.is_some())
            .field("uploader", &self.uploader.is_some())
            .field("cleaner", &self.cleaner.is_some())
            .field("alerts", &self.alerts.is_some())
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

/// An upload started by the composer. The host drives `future` and reports
/// the outcome with [`Composer::finish_upload`](crate::Composer::finish_upload).
pub struct PendingUpload {
    pub ticket: UploadTicket,
    pub future: UploadFuture,
}

impl PendingUpload {
    /// Await the upload, keeping the ticket alongside the result.
    pub async fn resolve(self) -> (UploadTicket, Result<String, UploadError>) {
        (self.ticket, self.future.await)
    }
}

impl fmt::Debug for PendingUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingUpload")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_is_base64() {
        let file = ImageFile::new("a.png", "image/png", vec![0, 1, 2]);
        assert_eq!(file.to_data_url(), "data:image/png;base64,AAEC");
        assert!(file.is_image());
    }

    #[test]
    fn closures_are_collaborators() {
        let cleaner = |raw: &str| Some(raw.to_uppercase());
        assert_eq!(cleaner.sanitize("<p>"), Some("<P>".to_owned()));

        let mut seen = Vec::new();
        {
            let mut listener = |html: &str| seen.push(html.to_owned());
            listener.content_changed("<p>x</p>");
        }
        assert_eq!(seen, vec!["<p>x</p>"]);
    }

    #[test]
    fn debug_hides_image_bytes() {
        let file = ImageFile::new("a.png", "image/png", vec![0; 4096]);
        assert!(!format!("{file:?}").contains("0, 0"));
    }
}
