// SPDX-License-Identifier: GPL-3.0-only

//! Shared frame and backend types for capture sources

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Result type for capture backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur in capture backends
#[derive(Debug, Clone)]
pub enum BackendError {
    /// The requested source path does not exist
    SourceNotFound(String),
    /// The source exists but holds no usable frames
    NoFramesFound(String),
    /// A frame file could not be decoded
    DecodeFailed(String),
    /// Source configuration is invalid
    InvalidConfiguration(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::SourceNotFound(path) => write!(f, "Source not found: {}", path),
            BackendError::NoFramesFound(path) => write!(f, "No frames found in: {}", path),
            BackendError::DecodeFailed(msg) => write!(f, "Frame decode failed: {}", msg),
            BackendError::InvalidConfiguration(msg) => {
                write!(f, "Invalid source configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Pixel layouts a capture source can hand to the pipeline
///
/// Buffers are tightly packed with no row padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGB, 3 bytes per pixel
    Rgb8,
    /// 8-bit single-channel intensity, 1 byte per pixel
    Gray8,
}

impl PixelFormat {
    /// Bytes occupied by one pixel in this format
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Gray8 => 1,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Rgb8 => write!(f, "RGB8"),
            PixelFormat::Gray8 => write!(f, "GRAY8"),
        }
    }
}

/// A single captured frame
///
/// Frames own their pixel data behind an `Arc` so they can be handed
/// across stages without copying.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Tightly packed pixel data
    pub data: Arc<[u8]>,
    /// Pixel layout of `data`
    pub format: PixelFormat,
    /// When the frame was produced
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap an RGB image buffer as a frame
    pub fn from_rgb_image(image: image::RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: Arc::from(image.into_raw().into_boxed_slice()),
            format: PixelFormat::Rgb8,
            captured_at: Instant::now(),
        }
    }

    /// Wrap a grayscale image buffer as a frame
    pub fn from_gray_image(image: image::GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: Arc::from(image.into_raw().into_boxed_slice()),
            format: PixelFormat::Gray8,
            captured_at: Instant::now(),
        }
    }

    /// Byte length the data buffer must have for this geometry
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(PixelFormat::Rgb8.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::Gray8.bytes_per_pixel(), 1);
    }

    #[test]
    fn test_frame_from_rgb_image() {
        let image = image::RgbImage::from_pixel(4, 2, image::Rgb([10, 20, 30]));
        let frame = CameraFrame::from_rgb_image(image);
        assert_eq!(frame.width, 4);
        assert_eq!(frame.height, 2);
        assert_eq!(frame.format, PixelFormat::Rgb8);
        assert_eq!(frame.data.len(), frame.expected_len());
        assert_eq!(&frame.data[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_frame_from_gray_image() {
        let image = image::GrayImage::from_pixel(3, 3, image::Luma([200]));
        let frame = CameraFrame::from_gray_image(image);
        assert_eq!(frame.format, PixelFormat::Gray8);
        assert_eq!(frame.data.len(), 9);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(PixelFormat::Rgb8.to_string(), "RGB8");
        assert_eq!(PixelFormat::Gray8.to_string(), "GRAY8");
    }
}
