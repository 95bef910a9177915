// SPDX-License-Identifier: GPL-3.0-only

//! Geometric normalization onto the fixed processing canvas

use image::imageops::{self, FilterType};
use tracing::trace;

use super::types::FrameImage;
use crate::constants::frame;

/// Resample a frame to the 640x480 processing canvas
///
/// Uses Lanczos resampling in both directions. A frame already at
/// canvas size passes through untouched, so repeated processing of the
/// same buffer stays byte-stable.
pub fn normalize(image: FrameImage) -> FrameImage {
    let (width, height) = image.dimensions();
    if width == frame::TARGET_WIDTH && height == frame::TARGET_HEIGHT {
        return image;
    }

    trace!(width, height, "resampling frame to processing canvas");
    match image {
        FrameImage::Rgb(img) => FrameImage::Rgb(imageops::resize(
            &img,
            frame::TARGET_WIDTH,
            frame::TARGET_HEIGHT,
            FilterType::Lanczos3,
        )),
        FrameImage::Gray(img) => FrameImage::Gray(imageops::resize(
            &img,
            frame::TARGET_WIDTH,
            frame::TARGET_HEIGHT,
            FilterType::Lanczos3,
        )),
    }
}
