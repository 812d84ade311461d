//! The session reducer.

use log::{error, info, warn};

use crate::config::PipelineConfig;
use crate::decode::{decode_image, DecodedUpload};
use crate::encode::{JpegQuality, OutputFormat};
use crate::session::{SessionState, Upload};
use crate::transform::{resize_with_filter, rotate, ResizeTarget, Rotation, TransformError};

use super::{Command, Notice, Transition};

/// Apply one command to a session.
///
/// This is a pure function: the new state and the notices to show are
/// returned, nothing else is touched. Every failure is turned into a notice;
/// commands that fail validation hand back `state` unchanged.
pub fn reduce(state: SessionState, command: Command, config: &PipelineConfig) -> Transition {
    let mut state = state;
    let name = command.name();

    let notice = match command {
        Command::Upload { file_name, bytes } => apply_upload(&mut state, file_name, &bytes),
        Command::RemoveUpload => apply_remove_upload(&mut state),
        Command::EditResizeTarget { width, height } => {
            apply_edit_resize_target(&mut state, width, height, config)
        }
        Command::Resize { width, height } => apply_resize(&mut state, width, height, config),
        Command::Rotate(rotation) => apply_rotate(&mut state, rotation),
        Command::ChangeDownloadFormat { format, quality } => {
            apply_change_download(&mut state, format, quality)
        }
    };

    info!("{} -> {:?}", name, state.phase());
    Transition {
        state,
        notices: notice.into_iter().collect(),
    }
}

fn no_upload(action: &str) -> Option<Notice> {
    warn!("{} ignored: no upload", action);
    Some(Notice::warning("Upload an image first."))
}

fn apply_upload(state: &mut SessionState, file_name: String, bytes: &[u8]) -> Option<Notice> {
    // A new file never inherits anything from the previous one.
    state.clear_all_transform_state();
    state.clear_upload();

    match decode_image(bytes) {
        Ok(DecodedUpload { image, metadata }) => {
            let (width, height) = (image.width, image.height);
            info!("upload {} accepted: {}x{}", file_name, width, height);
            let notice = Notice::info(format!("Loaded {}: {} x {} px.", file_name, width, height));
            state.set_upload(Upload {
                file_name,
                image,
                metadata,
            });
            Some(notice)
        }
        Err(e) => {
            warn!("upload {} rejected: {}", file_name, e);
            Some(Notice::error(format!("Could not read {}: {}", file_name, e)))
        }
    }
}

fn apply_remove_upload(state: &mut SessionState) -> Option<Notice> {
    if state.upload().is_none() && !state.has_transform_state() {
        return None;
    }
    if state.has_transform_state() {
        info!("upload removed with transform state present, resetting session");
        state.clear_all_transform_state();
    }
    state.clear_upload();
    Some(Notice::info("Upload removed."))
}

/// Validate width/height input against positivity and the pixel budget.
fn checked_target(
    width: i64,
    height: i64,
    config: &PipelineConfig,
) -> Result<ResizeTarget, Notice> {
    ResizeTarget::new(width, height)
        .and_then(|target| target.within_limit(config.max_output_pixels))
        .map_err(|e| {
            warn!("resize target rejected: {}", e);
            match e {
                TransformError::TooLarge {
                    width,
                    height,
                    max_pixels,
                } => Notice::warning(format!(
                    "{} x {} px is too large. The limit is {} pixels.",
                    width, height, max_pixels
                )),
                _ => Notice::warning("Width and height must be greater than 0."),
            }
        })
}

fn apply_edit_resize_target(
    state: &mut SessionState,
    width: i64,
    height: i64,
    config: &PipelineConfig,
) -> Option<Notice> {
    if state.upload().is_none() {
        return no_upload("edit_resize_target");
    }
    match checked_target(width, height, config) {
        Ok(target) => {
            state.set_resize_target(target);
            None
        }
        Err(notice) => Some(notice),
    }
}

fn apply_resize(
    state: &mut SessionState,
    width: i64,
    height: i64,
    config: &PipelineConfig,
) -> Option<Notice> {
    let Some(upload) = state.upload() else {
        return no_upload("resize");
    };

    let target = match checked_target(width, height, config) {
        Ok(target) => target,
        Err(notice) => return Some(notice),
    };

    let result = resize_with_filter(&upload.image, target.width, target.height, config.resize_filter);

    state.set_resize_status(false);
    match result {
        Ok(resized) => {
            state.persist_image(resized);
            state.set_resize_status(true);
            state.set_rotation_applied(false);
            state.set_resize_target(target);
            Some(Notice::success(format!(
                "Image resized to {} x {} px.",
                target.width, target.height
            )))
        }
        Err(e) => {
            error!("resize failed: {}", e);
            Some(Notice::error(format!("Resize failed: {}", e)))
        }
    }
}

fn apply_rotate(state: &mut SessionState, rotation: Rotation) -> Option<Notice> {
    if state.upload().is_none() {
        return no_upload("rotate");
    }
    let Some(current) = state.resized_image() else {
        warn!("rotate ignored: nothing resized yet");
        return Some(Notice::warning("Resize the image before applying a rotation."));
    };

    let rotated = match rotate(current, rotation) {
        Ok(rotated) => rotated,
        Err(e) => {
            error!("rotation failed: {}", e);
            return Some(Notice::error(format!("Rotation failed: {}", e)));
        }
    };
    let (width, height) = (rotated.width, rotated.height);

    state.set_rotation(rotation);
    state.persist_image(rotated);
    if rotation != Rotation::None {
        state.set_rotation_applied(true);
    }

    Some(Notice::success(format!(
        "Image rotated {}. New dimensions: {} x {} px.",
        rotation.label(),
        width,
        height
    )))
}

fn apply_change_download(
    state: &mut SessionState,
    format: OutputFormat,
    quality: u8,
) -> Option<Notice> {
    if state.upload().is_none() {
        return no_upload("change_download_format");
    }
    state.set_download(format, JpegQuality::new(quality));
    None
}
