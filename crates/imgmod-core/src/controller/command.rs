//! Commands, notices and transitions.

use serde::Serialize;

use crate::encode::OutputFormat;
use crate::session::SessionState;
use crate::transform::Rotation;

/// A discrete user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A file was put into the uploader.
    Upload { file_name: String, bytes: Vec<u8> },
    /// The uploader was emptied.
    RemoveUpload,
    /// The width/height inputs changed without pressing resize.
    EditResizeTarget { width: i64, height: i64 },
    /// The resize button was pressed with these input values.
    Resize { width: i64, height: i64 },
    /// The apply-rotation button was pressed with this selection.
    Rotate(Rotation),
    /// The download format or JPEG quality selection changed.
    ChangeDownloadFormat { format: OutputFormat, quality: u8 },
}

impl Command {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Upload { .. } => "upload",
            Command::RemoveUpload => "remove_upload",
            Command::EditResizeTarget { .. } => "edit_resize_target",
            Command::Resize { .. } => "resize",
            Command::Rotate(_) => "rotate",
            Command::ChangeDownloadFormat { .. } => "change_download_format",
        }
    }
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Outcome of one reducer step.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: SessionState,
    pub notices: Vec<Notice>,
}
