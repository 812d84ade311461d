//! WASM bindings for the interactive resize/rotate session.
//!
//! A `JsImageSession` owns one user's state. Every user action is a method
//! call that returns the notices to show; `render()` returns the whole view
//! as a plain JS object, and `download_bytes()` the encoded file.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsImageSession();
//! session.upload(file.name, new Uint8Array(await file.arrayBuffer()));
//! session.resize(200, 150);
//! session.rotate('right90');
//! session.change_download_format('jpeg', 80);
//! const view = session.render();
//! const blob = new Blob([session.download_bytes()], { type: view.download.mime_type });
//! ```

use imgmod_core::{Command, ImageSession, Notice, OutputFormat, PipelineConfig, Rotation};
use wasm_bindgen::prelude::*;

use crate::types::{dimension_from_js, quality_from_js, to_js};

#[wasm_bindgen]
pub struct JsImageSession {
    inner: ImageSession,
}

#[wasm_bindgen]
impl JsImageSession {
    /// Start an empty session.
    ///
    /// `config` is optional; missing fields take their defaults, e.g.
    /// `{ download_prefix: "resized", cache_downloads: false }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsImageSession, JsValue> {
        let config: PipelineConfig = if config.is_undefined() || config.is_null() {
            PipelineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        JsImageSession::with_config(config).map_err(|e| JsValue::from_str(&e))
    }

    /// Load a new file, replacing anything from a previous one.
    pub fn upload(&mut self, file_name: String, bytes: Vec<u8>) -> Result<JsValue, JsValue> {
        notices_to_js(self.inner.dispatch(Command::Upload { file_name, bytes }))
    }

    pub fn remove_upload(&mut self) -> Result<JsValue, JsValue> {
        notices_to_js(self.inner.dispatch(Command::RemoveUpload))
    }

    /// Remember the width/height inputs without resizing.
    pub fn edit_resize_target(&mut self, width: f64, height: f64) -> Result<JsValue, JsValue> {
        notices_to_js(self.inner.dispatch(Command::EditResizeTarget {
            width: dimension_from_js(width),
            height: dimension_from_js(height),
        }))
    }

    /// Resize the original upload to exactly `width` x `height`.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<JsValue, JsValue> {
        notices_to_js(self.inner.dispatch(Command::Resize {
            width: dimension_from_js(width),
            height: dimension_from_js(height),
        }))
    }

    /// Rotate the resized image. `rotation` is one of `none`, `right90`,
    /// `left90` or `half_turn`.
    pub fn rotate(&mut self, rotation: &str) -> Result<JsValue, JsValue> {
        let notices = self.rotate_by_id(rotation).map_err(|e| JsValue::from_str(&e))?;
        notices_to_js(notices)
    }

    /// Pick the download format (`png` or `jpeg`) and JPEG quality.
    ///
    /// Any number is accepted for `quality`; it is clamped to 10..=100.
    pub fn change_download_format(&mut self, format: &str, quality: f64) -> Result<JsValue, JsValue> {
        let notices = self
            .change_download_by_id(format, quality_from_js(quality))
            .map_err(|e| JsValue::from_str(&e))?;
        notices_to_js(notices)
    }

    /// The current view as a plain object. Download bytes are not included;
    /// fetch them with `download_bytes()`.
    pub fn render(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.render())
    }

    /// Encoded bytes of the current download, or `undefined` before the
    /// first resize.
    pub fn download_bytes(&mut self) -> Option<Vec<u8>> {
        self.inner.render().download.map(|offer| offer.bytes.to_vec())
    }

    /// Lifecycle phase: `no_upload`, `unprocessed`, `resized` or
    /// `resized_rotated`.
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.inner.state().phase().name().to_string()
    }
}

impl JsImageSession {
    pub(crate) fn with_config(config: PipelineConfig) -> Result<Self, String> {
        ImageSession::new(config)
            .map(|inner| Self { inner })
            .map_err(|e| e.to_string())
    }

    pub(crate) fn rotate_by_id(&mut self, id: &str) -> Result<Vec<Notice>, String> {
        let rotation: Rotation = id.parse().map_err(|e| format!("{}", e))?;
        Ok(self.inner.dispatch(Command::Rotate(rotation)))
    }

    pub(crate) fn change_download_by_id(
        &mut self,
        format: &str,
        quality: u8,
    ) -> Result<Vec<Notice>, String> {
        let format: OutputFormat = format.parse().map_err(|e| format!("{}", e))?;
        Ok(self
            .inner
            .dispatch(Command::ChangeDownloadFormat { format, quality }))
    }
}

fn notices_to_js(notices: Vec<Notice>) -> Result<JsValue, JsValue> {
    to_js(&notices)
}
