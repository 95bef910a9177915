// SPDX-License-Identifier: GPL-3.0-only

//! Frame capture sources
//!
//! Every source implements [`CaptureBackend`] and yields frames in one
//! of the layouts in [`PixelFormat`]. The monitor loop never cares
//! which backend produced a frame.

use std::path::Path;

pub mod file_source;
pub mod synthetic;
pub mod types;

pub use file_source::FileCapture;
pub use synthetic::SyntheticCapture;
pub use types::{BackendError, BackendResult, CameraFrame, PixelFormat};

use crate::constants::synthetic as synthetic_defaults;

/// Name selecting the built-in synthetic source
pub const SYNTHETIC_SOURCE: &str = "synthetic";

/// A source of camera frames
pub trait CaptureBackend {
    /// Produce the next frame
    fn capture_frame(&mut self) -> BackendResult<CameraFrame>;

    /// Human-readable source description for logs and status output
    fn name(&self) -> &str;
}

/// Build a capture backend from a source selector
///
/// `"synthetic"` selects the built-in pattern generator; anything else
/// is treated as a path to an image file or directory.
pub fn create_backend(source: &str) -> BackendResult<Box<dyn CaptureBackend>> {
    if source.eq_ignore_ascii_case(SYNTHETIC_SOURCE) {
        Ok(Box::new(SyntheticCapture::new(
            synthetic_defaults::SENSOR_WIDTH,
            synthetic_defaults::SENSOR_HEIGHT,
        )))
    } else {
        let backend = FileCapture::open(Path::new(source))?;
        Ok(Box::new(backend))
    }
}
