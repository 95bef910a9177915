// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic capture source emulating a night-time IR sensor
//!
//! Produces a dark monochrome field with a few near-saturated spots,
//! the way insect reflections appear under active IR illumination.
//! Frames are a pure function of the frame counter, so runs are
//! reproducible.

use image::{GrayImage, Luma};
use tracing::debug;

use super::CaptureBackend;
use super::types::{BackendResult, CameraFrame};

/// Background intensity of the emulated sensor field
const BACKGROUND_LEVEL: u8 = 30;

/// Radius of each emulated reflection spot in sensor pixels
const SPOT_RADIUS: i64 = 14;

/// Fractional anchor positions of the emulated spots
const SPOT_ANCHORS: [(f64, f64); 3] = [(0.30, 0.40), (0.62, 0.55), (0.45, 0.75)];

/// Period of the spot drift cycle in frames
const DRIFT_PERIOD: u64 = 60;

/// Deterministic synthetic frame source
pub struct SyntheticCapture {
    width: u32,
    height: u32,
    frame_index: u64,
}

impl SyntheticCapture {
    /// Create a source emulating a sensor of the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        debug!(width, height, "creating synthetic capture source");
        Self {
            width,
            height,
            frame_index: 0,
        }
    }

    /// Triangle-wave drift offset for the current frame
    fn drift(frame_index: u64) -> i64 {
        let phase = frame_index % DRIFT_PERIOD;
        let half = (DRIFT_PERIOD / 2) as i64;
        let ramp = phase as i64;
        let offset = if ramp < half { ramp } else { DRIFT_PERIOD as i64 - ramp };
        offset - half / 2
    }

    fn render(&self) -> GrayImage {
        let mut image =
            GrayImage::from_pixel(self.width, self.height, Luma([BACKGROUND_LEVEL]));
        let drift = Self::drift(self.frame_index);

        for (i, &(fx, fy)) in SPOT_ANCHORS.iter().enumerate() {
            let cx = (fx * self.width as f64) as i64 + drift * (i as i64 + 1);
            let cy = (fy * self.height as f64) as i64;
            fill_disk(&mut image, cx, cy, SPOT_RADIUS);
        }

        image
    }
}

impl CaptureBackend for SyntheticCapture {
    fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        let image = self.render();
        self.frame_index += 1;
        Ok(CameraFrame::from_gray_image(image))
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// Fill a saturated disk, clipped to the image bounds
fn fill_disk(image: &mut GrayImage, cx: i64, cy: i64, radius: i64) {
    let (width, height) = image.dimensions();
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                continue;
            }
            let dx = x - cx;
            let dy = y - cy;
            if dx * dx + dy * dy <= radius * radius {
                image.put_pixel(x as u32, y as u32, Luma([255]));
            }
        }
    }
}
