// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the frame processing pipeline

use std::fmt;

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::capture::{CameraFrame, PixelFormat};
use crate::constants::{detection, enhancement};
use crate::pipeline::palette::Palette;

/// Errors produced by pipeline construction or processing
#[derive(Debug, Clone)]
pub enum PipelineError {
    /// Frame buffer length does not match its declared geometry
    MalformedFrame { expected: usize, actual: usize },
    /// Pipeline settings failed validation
    InvalidConfiguration(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MalformedFrame { expected, actual } => write!(
                f,
                "Malformed frame: expected {} bytes, got {}",
                expected, actual
            ),
            PipelineError::InvalidConfiguration(msg) => {
                write!(f, "Invalid pipeline configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// A decoded frame in one of the layouts the pipeline understands
#[derive(Debug, Clone)]
pub enum FrameImage {
    /// Three-channel color frame
    Rgb(RgbImage),
    /// Single-channel intensity frame
    Gray(GrayImage),
}

impl FrameImage {
    /// Decode a captured frame into an owned image buffer
    pub fn from_frame(frame: &CameraFrame) -> Result<Self, PipelineError> {
        let expected = frame.expected_len();
        let actual = frame.data.len();
        if actual != expected {
            return Err(PipelineError::MalformedFrame { expected, actual });
        }

        let data = frame.data.to_vec();
        match frame.format {
            PixelFormat::Rgb8 => RgbImage::from_raw(frame.width, frame.height, data)
                .map(FrameImage::Rgb)
                .ok_or(PipelineError::MalformedFrame { expected, actual }),
            PixelFormat::Gray8 => GrayImage::from_raw(frame.width, frame.height, data)
                .map(FrameImage::Gray)
                .ok_or(PipelineError::MalformedFrame { expected, actual }),
        }
    }

    /// Width and height of the underlying buffer
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            FrameImage::Rgb(img) => img.dimensions(),
            FrameImage::Gray(img) => img.dimensions(),
        }
    }
}

/// Tonal enhancement settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Apply global histogram equalization before smoothing
    pub equalize: bool,
    /// Gaussian kernel side length (odd; 1 disables smoothing)
    pub blur_kernel: u32,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            equalize: enhancement::EQUALIZE,
            blur_kernel: enhancement::BLUR_KERNEL,
        }
    }
}

impl EnhanceConfig {
    /// Check settings for contradictions
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.blur_kernel == 0 || self.blur_kernel % 2 == 0 {
            return Err(PipelineError::InvalidConfiguration(format!(
                "blur kernel must be odd and positive, got {}",
                self.blur_kernel
            )));
        }
        Ok(())
    }
}

/// Blob detection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Run detection at all; disabled leaves frames unannotated
    pub enabled: bool,
    /// Intensity a pixel must exceed to join the candidate mask
    pub intensity_cutoff: u8,
    /// Smallest accepted blob area in pixels
    pub min_area: u32,
    /// Largest accepted blob area in pixels
    pub max_area: u32,
    /// Circularity a blob must exceed to be accepted
    pub min_circularity: f64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity_cutoff: detection::INTENSITY_CUTOFF,
            min_area: detection::MIN_AREA,
            max_area: detection::MAX_AREA,
            min_circularity: detection::MIN_CIRCULARITY,
        }
    }
}

impl DetectConfig {
    /// Check settings for contradictions
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.min_area == 0 {
            return Err(PipelineError::InvalidConfiguration(
                "minimum area must be positive".to_string(),
            ));
        }
        if self.min_area >= self.max_area {
            return Err(PipelineError::InvalidConfiguration(format!(
                "minimum area {} must be below maximum area {}",
                self.min_area, self.max_area
            )));
        }
        if !self.min_circularity.is_finite() || self.min_circularity < 0.0 {
            return Err(PipelineError::InvalidConfiguration(format!(
                "circularity cutoff must be non-negative, got {}",
                self.min_circularity
            )));
        }
        Ok(())
    }
}

/// Complete pipeline settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Active display palette
    pub palette: Palette,
    /// Tonal enhancement settings
    pub enhance: EnhanceConfig,
    /// Blob detection settings
    pub detect: DetectConfig,
}

impl PipelineConfig {
    /// Validate all stage settings
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.enhance.validate()?;
        self.detect.validate()?;
        Ok(())
    }
}

/// Axis-aligned bounding box of a detected blob, in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionBounds {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Box width (at least 1)
    pub width: u32,
    /// Box height (at least 1)
    pub height: u32,
}

/// A blob that passed every acceptance filter
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedRegion {
    /// Filled area in pixels
    pub area: u32,
    /// Closed outer contour length
    pub perimeter: f64,
    /// Shape roundness, 4*pi*area/perimeter^2
    pub circularity: f64,
    /// Bounding box on the processing canvas
    pub bounds: RegionBounds,
}

/// Output of one pipeline pass
#[derive(Debug, Clone)]
pub struct ProcessedFrame {
    /// Annotated display frame on the processing canvas
    pub image: RgbImage,
    /// Blobs accepted during this pass
    pub regions: Vec<DetectedRegion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_decode_rejects_short_buffer() {
        let frame = CameraFrame {
            width: 10,
            height: 10,
            data: Arc::from(vec![0u8; 50].into_boxed_slice()),
            format: PixelFormat::Gray8,
            captured_at: Instant::now(),
        };
        let result = FrameImage::from_frame(&frame);
        assert!(matches!(
            result,
            Err(PipelineError::MalformedFrame {
                expected: 100,
                actual: 50
            })
        ));
    }

    #[test]
    fn test_decode_rgb_roundtrip() {
        let image = RgbImage::from_pixel(6, 4, image::Rgb([1, 2, 3]));
        let frame = CameraFrame::from_rgb_image(image.clone());
        let decoded = FrameImage::from_frame(&frame).unwrap();
        match decoded {
            FrameImage::Rgb(img) => assert_eq!(img, image),
            FrameImage::Gray(_) => panic!("expected RGB image"),
        }
    }

    #[test]
    fn test_enhance_config_rejects_even_kernel() {
        let config = EnhanceConfig {
            equalize: true,
            blur_kernel: 4,
        };
        assert!(config.validate().is_err());

        let config = EnhanceConfig {
            equalize: true,
            blur_kernel: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_detect_config_rejects_inverted_areas() {
        let config = DetectConfig {
            min_area: 2000,
            max_area: 200,
            ..DetectConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_detect_config_rejects_negative_circularity() {
        let config = DetectConfig {
            min_circularity: -0.5,
            ..DetectConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }
}
