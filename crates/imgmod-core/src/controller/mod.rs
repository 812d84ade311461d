//! Session orchestration: decode → resize → rotate → encode.
//!
//! User interactions arrive as discrete [`Command`]s. [`reduce`] turns the
//! current [`SessionState`](crate::session::SessionState) and a command into
//! a new state plus user-visible [`Notice`]s. [`ImageSession::render`]
//! computes the [`View`] for the current state, including a download that is
//! re-encoded from the current format/quality selection on every render
//! (served from a cache while nothing relevant changed).
//!
//! # Example
//!
//! ```ignore
//! use imgmod_core::controller::{Command, ImageSession};
//!
//! let mut session = ImageSession::default();
//! session.dispatch(Command::Upload { file_name: "photo.png".into(), bytes });
//! session.dispatch(Command::Resize { width: 200, height: 150 });
//! let view = session.render();
//! ```

mod app;
mod command;
mod reducer;
mod view;

pub use app::ImageSession;
pub use command::{Command, Notice, NoticeLevel, Transition};
pub use reducer::reduce;
pub use view::{
    default_resize_target, download_file_name, DownloadControls, DownloadOffer, FormatOption,
    OriginalInfo, ResizeForm, ResultInfo, RotationControls, TransformRequest, View,
};
