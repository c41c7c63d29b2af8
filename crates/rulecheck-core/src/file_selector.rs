//! PDF selection and screening
//!
//! Click-to-browse and drag-and-drop both end up in [`screen_file`], so the
//! acceptance rules live in exactly one place. A rejected candidate never
//! touches the current selection.

use serde::{Deserialize, Serialize};
use shared_types::{MAX_PDF_BYTES, PDF_MIME_TYPE};
use tracing::{debug, warn};

use crate::error::FileRejection;

/// What the browser reports about a candidate file before it is read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }
}

/// An accepted PDF together with the bytes that will be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    meta: FileMeta,
    contents: Vec<u8>,
}

impl SelectedFile {
    pub fn new(meta: FileMeta, contents: Vec<u8>) -> Self {
        Self { meta, contents }
    }

    pub fn meta(&self) -> &FileMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn size(&self) -> u64 {
        self.meta.size
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

/// Check a candidate against the upload constraints
///
/// The MIME type must be exactly `application/pdf` and the size at most
/// 10 MiB. Type is checked first, so an oversized non-PDF reports `NotPdf`.
pub fn screen_file(meta: &FileMeta) -> Result<(), FileRejection> {
    if meta.mime_type != PDF_MIME_TYPE {
        return Err(FileRejection::NotPdf);
    }
    if meta.size > MAX_PDF_BYTES {
        return Err(FileRejection::TooLarge);
    }
    Ok(())
}

/// Size label for the selected file card, e.g. `12.50 KB`
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Current selection plus the inline error of the last rejected candidate
#[derive(Debug, Clone, Default)]
pub struct FileSelector {
    selected: Option<SelectedFile>,
    rejection: Option<FileRejection>,
    dragging: bool,
}

impl FileSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn rejection(&self) -> Option<FileRejection> {
        self.rejection
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Screen a candidate, recording the rejection for inline display.
    pub fn screen(&mut self, meta: &FileMeta) -> Result<(), FileRejection> {
        match screen_file(meta) {
            Ok(()) => Ok(()),
            Err(rejection) => {
                warn!(
                    name = %meta.name,
                    size = meta.size,
                    mime_type = %meta.mime_type,
                    "rejected file: {}",
                    rejection
                );
                self.rejection = Some(rejection);
                Err(rejection)
            }
        }
    }

    /// Offer a file for selection; replaces the current one on acceptance.
    pub fn offer(&mut self, file: SelectedFile) -> Result<(), FileRejection> {
        self.screen(file.meta())?;
        debug!(name = %file.name(), size = file.size(), "file selected");
        self.selected = Some(file);
        self.rejection = None;
        Ok(())
    }

    /// Drop the inline rejection without touching the selection.
    pub fn dismiss_rejection(&mut self) {
        self.rejection = None;
    }

    pub fn drag_over(&mut self) {
        self.dragging = true;
    }

    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    /// A drop ends the drag; the dropped file (if any) goes through `offer`.
    pub fn drop_received(&mut self) {
        self.dragging = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
