//! Per-session state.
//!
//! One [`SessionState`] belongs to exactly one user session. It holds the
//! decoded upload, the persisted transform result, and the UI selections the
//! user has made so far. Absent selections mean "fall back to the default".
//!
//! # Lifecycle
//!
//! ```text
//! NoUpload ──upload──▶ Unprocessed ──resize──▶ Resized ──rotate──▶ ResizedRotated
//!    ▲                      │                     │                      │
//!    └──────────────────────┴───── remove upload (full reset) ───────────┘
//! ```

use log::trace;
use serde::Serialize;

use crate::decode::{ChannelOrder, ImageMetadata, PixelBuffer};
use crate::encode::{JpegQuality, OutputFormat};
use crate::transform::{ResizeTarget, Rotation};

/// The decoded original of the current upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub image: PixelBuffer,
    pub metadata: ImageMetadata,
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NoUpload,
    Unprocessed,
    Resized,
    ResizedRotated,
}

impl SessionPhase {
    pub fn name(self) -> &'static str {
        match self {
            SessionPhase::NoUpload => "no_upload",
            SessionPhase::Unprocessed => "unprocessed",
            SessionPhase::Resized => "resized",
            SessionPhase::ResizedRotated => "resized_rotated",
        }
    }
}

/// Names of the remembered UI selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKey {
    RotationChoice,
    ResizeWidth,
    ResizeHeight,
    DownloadFormat,
    JpegQuality,
}

impl SelectionKey {
    pub const ALL: [SelectionKey; 5] = [
        SelectionKey::RotationChoice,
        SelectionKey::ResizeWidth,
        SelectionKey::ResizeHeight,
        SelectionKey::DownloadFormat,
        SelectionKey::JpegQuality,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SelectionKey::RotationChoice => "rotation_choice",
            SelectionKey::ResizeWidth => "resize_width",
            SelectionKey::ResizeHeight => "resize_height",
            SelectionKey::DownloadFormat => "download_format",
            SelectionKey::JpegQuality => "jpeg_quality",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Selections {
    rotation_choice: Option<Rotation>,
    resize_width: Option<u32>,
    resize_height: Option<u32>,
    download_format: Option<OutputFormat>,
    jpeg_quality: Option<JpegQuality>,
}

/// Typed state of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    upload: Option<Upload>,
    resized_image: Option<PixelBuffer>,
    display_image: Option<PixelBuffer>,
    resize_status: bool,
    rotation_applied: bool,
    revision: u64,
    selections: Selections,
}

impl SessionState {
    /// An empty session: no upload, nothing persisted, no selections.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    pub fn set_upload(&mut self, upload: Upload) {
        self.upload = Some(upload);
    }

    /// Drop the upload. Transform state is left alone; see
    /// [`clear_all_transform_state`](Self::clear_all_transform_state).
    pub fn clear_upload(&mut self) {
        self.upload = None;
    }

    /// The persisted transform output.
    pub fn resized_image(&self) -> Option<&PixelBuffer> {
        self.resized_image.as_ref()
    }

    /// The persisted output in RGB order, as displayed and downloaded.
    pub fn display_image(&self) -> Option<&PixelBuffer> {
        self.display_image.as_ref()
    }

    /// True once a resize has succeeded and until the next reset.
    pub fn resize_status(&self) -> bool {
        self.resize_status
    }

    pub fn set_resize_status(&mut self, succeeded: bool) {
        self.resize_status = succeeded;
    }

    pub fn rotation_applied(&self) -> bool {
        self.rotation_applied
    }

    pub fn set_rotation_applied(&mut self, applied: bool) {
        self.rotation_applied = applied;
    }

    /// Identity of the persisted image. Bumped on every [`persist_image`](Self::persist_image).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Overwrite both image slots with `image`.
    pub fn persist_image(&mut self, image: PixelBuffer) {
        self.display_image = Some(image.to_order(ChannelOrder::Rgb));
        self.resized_image = Some(image);
        self.revision += 1;
    }

    /// Whether anything from a previous transform is still held: a persisted
    /// image or any remembered selection.
    pub fn has_transform_state(&self) -> bool {
        self.resized_image.is_some()
            || self.display_image.is_some()
            || SelectionKey::ALL.iter().any(|key| self.is_set(*key))
    }

    pub fn resize_width_or(&self, default: u32) -> u32 {
        self.selections.resize_width.unwrap_or(default)
    }

    pub fn resize_height_or(&self, default: u32) -> u32 {
        self.selections.resize_height.unwrap_or(default)
    }

    pub fn rotation_or(&self, default: Rotation) -> Rotation {
        self.selections.rotation_choice.unwrap_or(default)
    }

    pub fn download_format_or(&self, default: OutputFormat) -> OutputFormat {
        self.selections.download_format.unwrap_or(default)
    }

    pub fn jpeg_quality_or(&self, default: JpegQuality) -> JpegQuality {
        self.selections.jpeg_quality.unwrap_or(default)
    }

    /// Remember the last width/height the user entered.
    pub fn set_resize_target(&mut self, target: ResizeTarget) {
        self.selections.resize_width = Some(target.width);
        self.selections.resize_height = Some(target.height);
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.selections.rotation_choice = Some(rotation);
    }

    pub fn set_download(&mut self, format: OutputFormat, quality: JpegQuality) {
        self.selections.download_format = Some(format);
        self.selections.jpeg_quality = Some(quality);
    }

    /// Whether a selection is currently remembered.
    pub fn is_set(&self, key: SelectionKey) -> bool {
        let s = &self.selections;
        match key {
            SelectionKey::RotationChoice => s.rotation_choice.is_some(),
            SelectionKey::ResizeWidth => s.resize_width.is_some(),
            SelectionKey::ResizeHeight => s.resize_height.is_some(),
            SelectionKey::DownloadFormat => s.download_format.is_some(),
            SelectionKey::JpegQuality => s.jpeg_quality.is_some(),
        }
    }

    /// Forget the named selections so they fall back to their defaults.
    pub fn clear(&mut self, keys: &[SelectionKey]) {
        let s = &mut self.selections;
        for key in keys {
            trace!("clearing selection {}", key.name());
            match key {
                SelectionKey::RotationChoice => s.rotation_choice = None,
                SelectionKey::ResizeWidth => s.resize_width = None,
                SelectionKey::ResizeHeight => s.resize_height = None,
                SelectionKey::DownloadFormat => s.download_format = None,
                SelectionKey::JpegQuality => s.jpeg_quality = None,
            }
        }
    }

    /// Reset every transform slot and every selection in one step.
    ///
    /// The upload itself and the revision counter are kept.
    pub fn clear_all_transform_state(&mut self) {
        self.resized_image = None;
        self.display_image = None;
        self.resize_status = false;
        self.rotation_applied = false;
        self.clear(&SelectionKey::ALL);
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.upload, &self.resized_image) {
            (None, _) => SessionPhase::NoUpload,
            (Some(_), None) => SessionPhase::Unprocessed,
            (Some(_), Some(_)) if self.rotation_applied => SessionPhase::ResizedRotated,
            (Some(_), Some(_)) => SessionPhase::Resized,
        }
    }
}
