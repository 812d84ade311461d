//! A session bundled with its configuration and download cache.

use std::rc::Rc;

use log::debug;

use crate::config::{ConfigError, PipelineConfig};
use crate::encode::{encode, JpegQuality, OutputFormat};
use crate::session::SessionState;

use super::view::render_with;
use super::{reduce, Command, Notice, View};

/// Encoded bytes for one (revision, format, quality) combination.
#[derive(Debug, Clone)]
struct CachedDownload {
    revision: u64,
    format: OutputFormat,
    quality: Option<JpegQuality>,
    bytes: Rc<[u8]>,
}

/// One user's session: state, configuration and the last encoded download.
#[derive(Debug)]
pub struct ImageSession {
    state: SessionState,
    config: PipelineConfig,
    cache: Option<CachedDownload>,
}

impl Default for ImageSession {
    fn default() -> Self {
        Self {
            state: SessionState::new(),
            config: PipelineConfig::default(),
            cache: None,
        }
    }
}

impl ImageSession {
    /// Start an empty session.
    ///
    /// # Errors
    ///
    /// Returns the first problem [`PipelineConfig::validate`] finds.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: SessionState::new(),
            config,
            cache: None,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one command through the reducer and return its notices.
    pub fn dispatch(&mut self, command: Command) -> Vec<Notice> {
        let state = std::mem::take(&mut self.state);
        let transition = reduce(state, command, &self.config);
        self.state = transition.state;

        if self.state.display_image().is_none() {
            self.cache = None;
        }
        transition.notices
    }

    /// Compute the current view, including a fresh download offer.
    pub fn render(&mut self) -> View {
        let use_cache = self.config.cache_downloads;
        let revision = self.state.revision();
        let cache = &mut self.cache;

        render_with(&self.state, &self.config, |image, format, quality| {
            let quality_key = format.uses_quality().then_some(quality);
            if use_cache {
                if let Some(hit) = cache.as_ref().filter(|c| {
                    c.revision == revision && c.format == format && c.quality == quality_key
                }) {
                    debug!("download cache hit for revision {}", revision);
                    return Ok(Rc::clone(&hit.bytes));
                }
            }

            let bytes: Rc<[u8]> = encode(image, format, quality)?.into();
            if use_cache {
                *cache = Some(CachedDownload {
                    revision,
                    format,
                    quality: quality_key,
                    bytes: Rc::clone(&bytes),
                });
            }
            Ok(bytes)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NoticeLevel;
    use crate::decode::decode_image;
    use crate::encode::encode_png;
    use crate::session::SessionPhase;
    use crate::transform::Rotation;

    fn png_upload(width: u32, height: u32) -> Command {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        Command::Upload {
            file_name: "photo.png".to_string(),
            bytes: encode_png(&pixels, width, height).unwrap(),
        }
    }

    fn levels(notices: &[Notice]) -> Vec<NoticeLevel> {
        notices.iter().map(|n| n.level).collect()
    }

    #[test]
    fn test_full_resize_rotate_download_flow() {
        let mut session = ImageSession::default();

        let notices = session.dispatch(png_upload(400, 300));
        assert_eq!(levels(&notices), vec![NoticeLevel::Info]);

        let view = session.render();
        assert_eq!(view.phase, SessionPhase::Unprocessed);
        let form = view.resize_form.unwrap();
        assert_eq!((form.width, form.height), (200, 150));
        assert_eq!((form.min, form.step), (1, 10));
        assert!(view.rotation_controls.is_none());
        assert!(view.download_controls.is_none());
        assert!(view.download.is_none());

        let notices = session.dispatch(Command::Resize {
            width: form.width.into(),
            height: form.height.into(),
        });
        assert_eq!(notices, vec![Notice::success("Image resized to 200 x 150 px.")]);
        assert!(session.state().resize_status());
        let resized = session.state().display_image().unwrap();
        assert_eq!((resized.width, resized.height), (200, 150));
        assert_eq!(session.render().phase, SessionPhase::Resized);

        let notices = session.dispatch(Command::Rotate(Rotation::Right90));
        assert_eq!(
            notices,
            vec![Notice::success(
                "Image rotated 90° Right. New dimensions: 150 x 200 px."
            )]
        );

        session.dispatch(Command::ChangeDownloadFormat {
            format: OutputFormat::Jpeg,
            quality: 80,
        });
        let view = session.render();
        assert_eq!(view.phase, SessionPhase::ResizedRotated);
        assert_eq!(view.result.unwrap().width, 150);
        assert_eq!(view.result.unwrap().height, 200);
        assert_eq!(view.rotation_controls.unwrap().choice, Rotation::Right90);

        let controls = view.download_controls.unwrap();
        assert_eq!(controls.format, OutputFormat::Jpeg);
        assert_eq!(controls.quality, JpegQuality::new(80));
        assert!(controls.quality_enabled);
        assert_eq!(controls.formats.len(), 2);
        assert_eq!((controls.min, controls.max, controls.step), (10, 100, 5));

        let download = view.download.unwrap();
        assert_eq!(download.file_name, "gambar_modifikasi_150x200.jpeg");
        assert_eq!(download.mime_type, "image/jpeg");
        assert_eq!(download.quality, Some(JpegQuality::new(80)));
        let decoded = decode_image(&download.bytes).unwrap().image;
        assert_eq!((decoded.width, decoded.height), (150, 200));
    }

    #[test]
    fn test_download_defaults_to_png() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(40, 30));
        session.dispatch(Command::Resize {
            width: 20,
            height: 15,
        });

        let view = session.render();
        let controls = view.download_controls.unwrap();
        assert_eq!(controls.format, OutputFormat::Png);
        assert_eq!(controls.quality, JpegQuality::new(95));
        assert!(!controls.quality_enabled);

        let download = view.download.unwrap();
        assert_eq!(download.format, OutputFormat::Png);
        assert_eq!(download.quality, None);
        assert_eq!(download.file_name, "gambar_modifikasi_20x15.png");
        assert_eq!(download.mime_type, "image/png");

        let decoded = decode_image(&download.bytes).unwrap().image;
        assert_eq!(&decoded, session.state().display_image().unwrap());
    }

    #[test]
    fn test_huge_resize_target_is_a_warning_not_an_abort() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(4, 4));
        let before = session.state().clone();

        let max = i64::from(u32::MAX);
        let notices = session.dispatch(Command::Resize {
            width: max,
            height: max,
        });

        assert_eq!(levels(&notices), vec![NoticeLevel::Warning]);
        assert!(notices[0].message.contains("too large"));
        assert_eq!(session.state(), &before);
        assert!(session.render().download.is_none());
    }

    #[test]
    fn test_zero_width_resize_leaves_state_untouched() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(40, 30));
        session.dispatch(Command::Resize {
            width: 20,
            height: 15,
        });
        let before = session.state().clone();

        let notices = session.dispatch(Command::Resize {
            width: 0,
            height: 15,
        });

        assert_eq!(levels(&notices), vec![NoticeLevel::Warning]);
        assert_eq!(session.state(), &before);
        let kept = session.state().display_image().unwrap();
        assert_eq!((kept.width, kept.height), (20, 15));
    }

    #[test]
    fn test_negative_resize_before_any_resize() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(40, 30));
        let before = session.state().clone();

        let notices = session.dispatch(Command::Resize {
            width: 20,
            height: -5,
        });

        assert_eq!(levels(&notices), vec![NoticeLevel::Warning]);
        assert_eq!(session.state(), &before);
        assert!(!session.state().resize_status());
    }

    #[test]
    fn test_remove_upload_resets_everything_at_once() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(40, 30));
        session.dispatch(Command::Resize {
            width: 20,
            height: 16,
        });
        session.dispatch(Command::Rotate(Rotation::HalfTurn));
        session.dispatch(Command::ChangeDownloadFormat {
            format: OutputFormat::Jpeg,
            quality: 50,
        });
        assert!(session.render().download.is_some());

        session.dispatch(Command::RemoveUpload);

        let state = session.state();
        assert_eq!(state.phase(), SessionPhase::NoUpload);
        assert!(!state.has_transform_state());
        assert!(state.resized_image().is_none());
        assert!(state.display_image().is_none());
        assert!(!state.resize_status());

        // A fresh upload of a different size gets fresh defaults.
        session.dispatch(png_upload(60, 40));
        let view = session.render();
        let form = view.resize_form.unwrap();
        assert_eq!((form.width, form.height), (30, 20));
        assert!(view.rotation_controls.is_none());
        assert!(view.download_controls.is_none());
        assert!(view.download.is_none());
    }

    #[test]
    fn test_new_upload_discards_previous_result() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(40, 30));
        session.dispatch(Command::Resize {
            width: 10,
            height: 10,
        });

        session.dispatch(png_upload(80, 60));

        assert_eq!(session.state().phase(), SessionPhase::Unprocessed);
        assert!(session.render().download.is_none());
    }

    #[test]
    fn test_unreadable_upload_is_reported() {
        let mut session = ImageSession::default();
        let notices = session.dispatch(Command::Upload {
            file_name: "broken.png".to_string(),
            bytes: vec![0x00, 0x01, 0x02],
        });

        assert_eq!(levels(&notices), vec![NoticeLevel::Error]);
        assert!(notices[0].message.starts_with("Could not read broken.png"));
        assert_eq!(session.state().phase(), SessionPhase::NoUpload);
    }

    #[test]
    fn test_rotate_requires_resize() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(40, 30));
        let before = session.state().clone();

        let notices = session.dispatch(Command::Rotate(Rotation::Left90));

        assert_eq!(levels(&notices), vec![NoticeLevel::Warning]);
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_rotate_applies_to_persisted_result() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(40, 30));
        session.dispatch(Command::Resize {
            width: 20,
            height: 10,
        });

        session.dispatch(Command::Rotate(Rotation::Right90));
        session.dispatch(Command::Rotate(Rotation::Right90));

        // Two quarter turns of the 20x10 result, not of the 40x30 original
        let current = session.state().display_image().unwrap();
        assert_eq!((current.width, current.height), (20, 10));
        assert_eq!(session.state().phase(), SessionPhase::ResizedRotated);
    }

    #[test]
    fn test_rotation_none_keeps_resized_phase() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(40, 30));
        session.dispatch(Command::Resize {
            width: 20,
            height: 10,
        });
        let before = session.state().display_image().cloned();

        session.dispatch(Command::Rotate(Rotation::None));

        assert_eq!(session.state().display_image().cloned(), before);
        assert_eq!(session.state().phase(), SessionPhase::Resized);
    }

    #[test]
    fn test_resize_after_rotation_starts_from_original() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(40, 30));
        session.dispatch(Command::Resize {
            width: 20,
            height: 10,
        });
        session.dispatch(Command::Rotate(Rotation::Left90));

        session.dispatch(Command::Resize {
            width: 8,
            height: 6,
        });

        let current = session.state().display_image().unwrap();
        assert_eq!((current.width, current.height), (8, 6));
        assert_eq!(session.state().phase(), SessionPhase::Resized);
    }

    #[test]
    fn test_edited_inputs_become_defaults() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(400, 300));

        let notices = session.dispatch(Command::EditResizeTarget {
            width: 123,
            height: 45,
        });
        assert!(notices.is_empty());

        let form = session.render().resize_form.unwrap();
        assert_eq!((form.width, form.height), (123, 45));

        let notices = session.dispatch(Command::EditResizeTarget {
            width: 0,
            height: 45,
        });
        assert_eq!(levels(&notices), vec![NoticeLevel::Warning]);
        let form = session.render().resize_form.unwrap();
        assert_eq!((form.width, form.height), (123, 45));
    }

    #[test]
    fn test_commands_without_upload_warn() {
        let mut session = ImageSession::default();
        for command in [
            Command::Resize {
                width: 10,
                height: 10,
            },
            Command::Rotate(Rotation::Right90),
            Command::ChangeDownloadFormat {
                format: OutputFormat::Jpeg,
                quality: 90,
            },
        ] {
            let notices = session.dispatch(command);
            assert_eq!(levels(&notices), vec![NoticeLevel::Warning]);
        }
        assert_eq!(session.state(), &SessionState::new());

        // Nothing to remove: silent no-op
        assert!(session.dispatch(Command::RemoveUpload).is_empty());
    }

    #[test]
    fn test_download_is_recomputed_when_selection_changes() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(40, 30));
        session.dispatch(Command::Resize {
            width: 40,
            height: 30,
        });

        let png = session.render().download.unwrap();
        session.dispatch(Command::ChangeDownloadFormat {
            format: OutputFormat::Jpeg,
            quality: 10,
        });
        let low = session.render().download.unwrap();
        session.dispatch(Command::ChangeDownloadFormat {
            format: OutputFormat::Jpeg,
            quality: 100,
        });
        let high = session.render().download.unwrap();

        assert_eq!(png.format, OutputFormat::Png);
        assert_ne!(png.bytes, low.bytes);
        assert!(high.bytes.len() > low.bytes.len());
    }

    #[test]
    fn test_cached_download_matches_fresh_encode() {
        let mut cached = ImageSession::default();
        let mut config = PipelineConfig::default();
        config.cache_downloads = false;
        let mut fresh = ImageSession::new(config).unwrap();

        for session in [&mut cached, &mut fresh] {
            session.dispatch(png_upload(32, 24));
            session.dispatch(Command::Resize {
                width: 16,
                height: 12,
            });
            session.dispatch(Command::ChangeDownloadFormat {
                format: OutputFormat::Jpeg,
                quality: 75,
            });
        }

        let first = cached.render().download.unwrap();
        let second = cached.render().download.unwrap();
        assert!(Rc::ptr_eq(&first.bytes, &second.bytes));
        assert_eq!(first, fresh.render().download.unwrap());
    }

    #[test]
    fn test_quality_clamped_on_selection() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(20, 20));
        session.dispatch(Command::Resize {
            width: 10,
            height: 10,
        });
        session.dispatch(Command::ChangeDownloadFormat {
            format: OutputFormat::Jpeg,
            quality: 3,
        });

        let download = session.render().download.unwrap();
        assert_eq!(download.quality.map(JpegQuality::value), Some(10));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PipelineConfig::default();
        config.dimension_step = 0;
        assert!(ImageSession::new(config).is_err());
    }

    #[test]
    fn test_custom_prefix_and_divisor() {
        let mut config = PipelineConfig::default();
        config.download_prefix = "resized".to_string();
        config.default_scale_divisor = 4;
        let mut session = ImageSession::new(config).unwrap();

        session.dispatch(png_upload(80, 40));
        let form = session.render().resize_form.unwrap();
        assert_eq!((form.width, form.height), (20, 10));

        session.dispatch(Command::Resize {
            width: 20,
            height: 10,
        });
        let download = session.render().download.unwrap();
        assert_eq!(download.file_name, "resized_20x10.png");
    }

    #[test]
    fn test_original_info_in_view() {
        let mut session = ImageSession::default();
        session.dispatch(png_upload(12, 8));

        let original = session.render().original.unwrap();
        assert_eq!(original.file_name, "photo.png");
        assert_eq!((original.width, original.height), (12, 8));
        assert_eq!(original.channels, 3);
        assert_eq!(original.color_type, "Rgb8");
        assert!(!original.metadata_available);
    }
}
