//! imgmod Core - image resize/rotate pipeline
//!
//! This crate provides the core of imgmod: decoding an uploaded JPEG/PNG,
//! resizing and rotating it, re-encoding it for download, and the per-session
//! state machine that ties those steps to user commands.

pub mod config;
pub mod controller;
pub mod decode;
pub mod encode;
pub mod session;
pub mod transform;

pub use config::PipelineConfig;
pub use controller::{reduce, Command, ImageSession, Notice, NoticeLevel, View};
pub use decode::{decode_image, ChannelOrder, DecodeError, ImageMetadata, PixelBuffer};
pub use encode::{encode, EncodeError, JpegQuality, OutputFormat};
pub use session::{SessionPhase, SessionState};
pub use transform::{resize, rotate, Rotation, TransformError};
