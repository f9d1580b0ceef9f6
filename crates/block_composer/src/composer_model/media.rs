// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Image and embed blocks: insertion, the upload pipeline, selection,
//! captions, deletion and reordering.
//!
//! Insertion, deletion and moves commit history immediately, before and
//! after the change.

use tracing::{debug, warn};

use crate::collaborators::{
    HostAlert, ImageCompressor, ImageFile, ImageUploader, PendingUpload,
};
use crate::document::{
    inline::flatten_line_breaks, Block, MediaBlock, MediaSource, Point,
    Selection, Slot, UploadTicket,
};
use crate::error::UploadError;
use crate::{Composer, ComposerUpdate, Insertion};

impl Composer {
    /// Append a media block at the end of the document, reusing a trailing
    /// empty paragraph, and put the caret in a paragraph after it.
    pub fn insert_media(&mut self, source: MediaSource) -> ComposerUpdate {
        self.push_undo();
        self.insert_media_block(MediaBlock::new(source));
        self.finish_structural_edit()
    }

    /// Insert a picked, dropped or pasted image file.
    ///
    /// The file is compressed first. With an uploader the block shows the
    /// file's data URL until [`Composer::finish_upload`] reports the
    /// outcome; without one the data URL is the final source.
    pub fn insert_image_file(&mut self, file: ImageFile) -> Insertion {
        if !file.is_image() {
            debug!(mime = %file.mime, "not an image");
            return Insertion::keep();
        }
        let file = match &self.collaborators.compressor {
            Some(compressor) => match compressor.compress(file, &self.config.compression) {
                Ok(file) => file,
                Err(error) => {
                    warn!(%error, "image compression failed");
                    self.collaborators.alert(HostAlert::CompressionFailed {
                        reason: error.reason,
                    });
                    return Insertion::keep();
                }
            },
            None => file,
        };
        let mut block = MediaBlock::new(MediaSource::image(file.to_data_url()));
        let upload = self.collaborators.uploader.as_ref().map(|uploader| {
            self.next_ticket += 1;
            let ticket = UploadTicket(self.next_ticket);
            block.upload = Some(ticket);
            PendingUpload {
                ticket,
                future: uploader.upload(file),
            }
        });
        self.push_undo();
        self.insert_media_block(block);
        Insertion {
            update: self.finish_structural_edit(),
            upload,
        }
    }

    /// Record the outcome of an upload. Success replaces the placeholder
    /// everywhere it appears, including the history; failure keeps the
    /// placeholder and alerts the user.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<String, UploadError>,
    ) -> ComposerUpdate {
        match result {
            Ok(url) => {
                debug!(?ticket, "upload finished");
                let found = settle_upload(self.document.blocks_mut(), ticket, Some(&url));
                self.history.rewrite(|snapshot| {
                    settle_upload(snapshot.blocks_mut(), ticket, Some(&url));
                });
                if found {
                    self.create_update_replace_all()
                } else {
                    ComposerUpdate::keep()
                }
            }
            Err(error) => {
                warn!(?ticket, %error, "image upload failed");
                settle_upload(self.document.blocks_mut(), ticket, None);
                self.history.rewrite(|snapshot| {
                    settle_upload(snapshot.blocks_mut(), ticket, None);
                });
                self.collaborators.alert(HostAlert::UploadFailed {
                    reason: error.to_string(),
                });
                ComposerUpdate::keep()
            }
        }
    }

    /// Mark the media block at `index` as the keyboard target.
    pub fn select_media(&mut self, index: usize) -> ComposerUpdate {
        if self.document.block(index).and_then(Block::as_media).is_none() {
            return ComposerUpdate::keep();
        }
        self.document.deselect_all();
        if let Some(media) = self.document.block_mut(index).and_then(Block::as_media_mut) {
            media.selected = true;
        }
        self.selection = Selection::caret(Point::body(index, 0));
        self.pending_marks = None;
        self.create_update_selection()
    }

    pub fn deselect_all_media(&mut self) -> ComposerUpdate {
        if self.document.deselect_all() {
            self.create_update_selection()
        } else {
            ComposerUpdate::keep()
        }
    }

    /// Replace the caption of the media block at `index`.
    pub fn set_caption(&mut self, index: usize, caption: &str) -> ComposerUpdate {
        let caption = flatten_line_breaks(caption);
        let unchanged = match self.document.block(index).and_then(Block::as_media) {
            Some(media) => media.caption == caption,
            None => return ComposerUpdate::keep(),
        };
        if unchanged {
            return ComposerUpdate::keep();
        }
        self.begin_edit();
        self.document.deselect_all();
        let len = caption.chars().count();
        if let Some(media) = self.document.block_mut(index).and_then(Block::as_media_mut) {
            media.caption = caption;
        }
        self.selection = Selection::caret(Point::new(index, Slot::Caption, len));
        self.finish_edit()
    }

    /// Replace the selected media block, or the block under the caret, with
    /// an empty paragraph.
    pub fn delete_block(&mut self) -> ComposerUpdate {
        let Some(index) = self.current_block() else {
            return ComposerUpdate::keep();
        };
        debug!(index, "deleting block");
        self.push_undo();
        self.document.blocks_mut()[index] = Block::empty_paragraph();
        self.selection = Selection::caret(Point::body(index, 0));
        self.pending_marks = None;
        self.reset_if_emptied();
        self.finish_structural_edit()
    }

    pub fn move_up(&mut self) -> ComposerUpdate {
        match self.current_block() {
            Some(index) if index > 0 => self.swap_blocks(index - 1),
            _ => ComposerUpdate::keep(),
        }
    }

    pub fn move_down(&mut self) -> ComposerUpdate {
        match self.current_block() {
            Some(index) if index + 1 < self.document.len() => self.swap_blocks(index),
            _ => ComposerUpdate::keep(),
        }
    }

    /// Swap blocks `upper` and `upper + 1`, keeping the caret in the block
    /// it was in.
    fn swap_blocks(&mut self, upper: usize) -> ComposerUpdate {
        debug!(upper, "swapping blocks");
        self.push_undo();
        self.document.blocks_mut().swap(upper, upper + 1);
        self.remap_selection(|p| match p.block {
            b if b == upper => Point { block: upper + 1, ..p },
            b if b == upper + 1 => Point { block: upper, ..p },
            _ => p,
        });
        self.finish_structural_edit()
    }

    fn insert_media_block(&mut self, block: MediaBlock) {
        self.document.deselect_all();
        self.pending_marks = None;
        let blocks = self.document.blocks_mut();
        let index = if blocks.last().is_some_and(Block::is_empty_paragraph) {
            let last = blocks.len() - 1;
            blocks[last] = Block::Media(block);
            last
        } else {
            blocks.push(Block::Media(block));
            blocks.len() - 1
        };
        let next = self.paragraph_after(index);
        self.selection = Selection::caret(Point::body(next, 0));
    }
}

/// Resolve the block waiting on `ticket`: with `url` its source is
/// replaced, without it the placeholder stays. Returns whether the ticket
/// was found.
fn settle_upload(blocks: &mut [Block], ticket: UploadTicket, url: Option<&str>) -> bool {
    let mut found = false;
    for media in blocks.iter_mut().filter_map(Block::as_media_mut) {
        if media.upload != Some(ticket) {
            continue;
        }
        media.upload = None;
        if let (Some(url), MediaSource::Image { src, .. }) = (url, &mut media.source) {
            *src = url.to_owned();
        }
        found = true;
    }
    found
}
