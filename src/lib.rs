//! Webcam-driven "air drawing": a pretrained hand landmark network tracks the
//! user's hand, finger poses are interpreted as gesture commands, and freehand
//! strokes are composited onto a persistent canvas over the live camera feed.
//!
//! # Gestures
//!
//! * Index finger raised: draw a line following the fingertip.
//! * Index + middle finger raised: cycle through the color palette.
//! * Index + middle + ring finger raised: undo the most recent stroke.
//!
//! # Environment Variables
//!
//! Some parts of the pipeline can be overridden by setting environment
//! variables:
//!
//! * `AIRCANVAS_HAND_MODEL`: Path of the hand landmark ONNX model to load when
//!   no path is given on the command line.
//! * `AIRCANVAS_WEBCAM_NAME`: Forces the device to use for [`Webcam`]s created
//!   without an explicit device name. If unset, the first device that supports
//!   a compatible image format will be used.
//! * `AIRCANVAS_JPEG_BACKEND`: Configures the JPEG decoder used for camera
//!   frames. Allowed values are `mozjpeg` and `jpeg-decoder`.
//!
//! [`Webcam`]: video::webcam::Webcam

use log::LevelFilter;

pub mod canvas;
pub mod filter;
pub mod gesture;
pub mod gui;
pub mod hand;
pub mod image;
pub mod landmark;
pub mod termination;
pub mod timer;
pub mod video;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .filter(Some("wgpu"), LevelFilter::Warn)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and `aircanvas` will log at *debug* level, `wgpu` at
/// *warn* level. `RUST_LOG` overrides these defaults.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
