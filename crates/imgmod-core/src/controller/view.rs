//! What the UI shows for a given session state.

use std::collections::BTreeMap;
use std::rc::Rc;

use log::error;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::decode::{PixelBuffer, SourceFormat};
use crate::encode::{EncodeError, JpegQuality, OutputFormat};
use crate::session::{SessionPhase, SessionState};
use crate::transform::Rotation;

use super::Notice;

/// The original upload and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginalInfo {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub format: SourceFormat,
    pub color_type: String,
    /// Embedded tags; empty when metadata is unavailable.
    pub metadata: BTreeMap<String, String>,
    pub metadata_available: bool,
}

/// Values and limits for the width/height inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizeForm {
    pub width: u32,
    pub height: u32,
    pub min: u32,
    pub step: u32,
}

/// The rotation selector, shown once a resize is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RotationControls {
    pub choice: Rotation,
}

/// Dimensions of the persisted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultInfo {
    pub width: u32,
    pub height: u32,
}

/// A ready-to-download encoding of the persisted result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadOffer {
    pub file_name: String,
    pub mime_type: &'static str,
    pub format: OutputFormat,
    /// Only set for formats that use it.
    pub quality: Option<JpegQuality>,
    pub label: String,
    /// Encoded file contents; handed over separately from the serialized view.
    #[serde(skip)]
    pub bytes: Rc<[u8]>,
}

/// One entry of the download format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatOption {
    pub format: OutputFormat,
    pub label: &'static str,
}

/// The format selector and JPEG quality slider, shown with the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadControls {
    pub format: OutputFormat,
    pub formats: Vec<FormatOption>,
    pub quality: JpegQuality,
    /// The slider is only live while the selected format uses it.
    pub quality_enabled: bool,
    pub min: u8,
    pub max: u8,
    pub step: u8,
}

impl DownloadControls {
    fn new(format: OutputFormat, quality: JpegQuality, config: &PipelineConfig) -> Self {
        Self {
            format,
            formats: OutputFormat::ALL
                .iter()
                .map(|&format| FormatOption {
                    format,
                    label: format.label(),
                })
                .collect(),
            quality,
            quality_enabled: format.uses_quality(),
            min: JpegQuality::MIN,
            max: JpegQuality::MAX,
            step: config.jpeg_quality_step,
        }
    }
}

/// Everything one render cycle shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub phase: SessionPhase,
    pub original: Option<OriginalInfo>,
    pub resize_form: Option<ResizeForm>,
    pub rotation_controls: Option<RotationControls>,
    pub result: Option<ResultInfo>,
    pub download_controls: Option<DownloadControls>,
    pub download: Option<DownloadOffer>,
    pub notices: Vec<Notice>,
}

/// Everything the user has chosen for one pass through the pipeline, with
/// defaults filled in. Built fresh on every render and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformRequest {
    pub width: u32,
    pub height: u32,
    pub rotation: Rotation,
    pub format: OutputFormat,
    pub quality: JpegQuality,
}

impl TransformRequest {
    /// Combine the remembered selections with the defaults for `original`.
    pub fn from_selections(
        original: &PixelBuffer,
        state: &SessionState,
        config: &PipelineConfig,
    ) -> Self {
        let (width, height) = default_resize_target(original, state, config);
        Self {
            width,
            height,
            rotation: state.rotation_or(Rotation::None),
            format: state.download_format_or(OutputFormat::default()),
            quality: state.jpeg_quality_or(config.default_jpeg_quality),
        }
    }
}

/// Default width/height for the resize inputs.
///
/// Without remembered values this is the original scaled down by
/// `config.default_scale_divisor` with its aspect ratio kept:
/// `width = ⌊W / d⌋`, `height = ⌊H × width / W⌋`, each at least 1.
/// A remembered width also feeds the derived height when no height is
/// remembered.
pub fn default_resize_target(
    original: &PixelBuffer,
    state: &SessionState,
    config: &PipelineConfig,
) -> (u32, u32) {
    let (w, h) = (original.width.max(1), original.height);
    let divisor = config.default_scale_divisor.max(1);

    let width = state.resize_width_or((w / divisor).max(1));
    let derived_height = (u64::from(h) * u64::from(width) / u64::from(w)).max(1);
    let height = state.resize_height_or(u32::try_from(derived_height).unwrap_or(u32::MAX));
    (width, height)
}

/// `{prefix}_{width}x{height}.{ext}`
pub fn download_file_name(prefix: &str, width: u32, height: u32, format: OutputFormat) -> String {
    format!("{}_{}x{}.{}", prefix, width, height, format.extension())
}

/// Build the view, encoding the download with `encoder`.
///
/// The download is rebuilt on every call from the current format and quality
/// selection; `encoder` decides whether bytes are reused.
pub(crate) fn render_with<E>(state: &SessionState, config: &PipelineConfig, mut encoder: E) -> View
where
    E: FnMut(&PixelBuffer, OutputFormat, JpegQuality) -> Result<Rc<[u8]>, EncodeError>,
{
    let mut view = View {
        phase: state.phase(),
        original: None,
        resize_form: None,
        rotation_controls: None,
        result: None,
        download_controls: None,
        download: None,
        notices: Vec::new(),
    };

    let Some(upload) = state.upload() else {
        return view;
    };

    let (height, width, channels) = upload.image.shape();
    view.original = Some(OriginalInfo {
        file_name: upload.file_name.clone(),
        width,
        height,
        channels,
        format: upload.metadata.format,
        color_type: upload.metadata.color_type.clone(),
        metadata: upload.metadata.tags.clone(),
        metadata_available: !upload.metadata.is_unavailable(),
    });

    let request = TransformRequest::from_selections(&upload.image, state, config);
    view.resize_form = Some(ResizeForm {
        width: request.width,
        height: request.height,
        min: 1,
        step: config.dimension_step,
    });

    if state.resized_image().is_some() {
        view.rotation_controls = Some(RotationControls {
            choice: request.rotation,
        });
    }

    let Some(display) = state.display_image() else {
        return view;
    };
    view.result = Some(ResultInfo {
        width: display.width,
        height: display.height,
    });

    let (format, quality) = (request.format, request.quality);
    view.download_controls = Some(DownloadControls::new(format, quality, config));
    match encoder(display, format, quality) {
        Ok(bytes) => {
            view.download = Some(DownloadOffer {
                file_name: download_file_name(
                    &config.download_prefix,
                    display.width,
                    display.height,
                    format,
                ),
                mime_type: format.mime_type(),
                format,
                quality: format.uses_quality().then_some(quality),
                label: format!("Download modified image ({})", format),
                bytes,
            });
        }
        Err(e) => {
            error!("download encoding failed: {}", e);
            view.notices
                .push(Notice::error(format!("Could not prepare the download: {}", e)));
        }
    }

    view
}
