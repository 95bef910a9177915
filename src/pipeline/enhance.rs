// SPDX-License-Identifier: GPL-3.0-only

//! Tonal enhancement: luminance extraction, equalization, smoothing

use image::{GrayImage, ImageBuffer, Luma, RgbImage};
use imageproc::contrast::equalize_histogram;
use imageproc::filter::gaussian_blur_f32;

use super::types::{EnhanceConfig, FrameImage};

/// Produce the enhanced intensity plane detection operates on
///
/// Color frames are collapsed to BT.601 luminance; grayscale frames
/// pass through. Equalization is optional, smoothing always runs with
/// the configured kernel (a kernel of 1 is the identity).
pub fn enhance(image: &FrameImage, config: &EnhanceConfig) -> GrayImage {
    let gray = match image {
        FrameImage::Rgb(img) => luminance(img),
        FrameImage::Gray(img) => img.clone(),
    };

    let equalized = if config.equalize {
        equalize_histogram(&gray)
    } else {
        gray
    };

    if config.blur_kernel > 1 {
        blur(&equalized, sigma_for_kernel(config.blur_kernel))
    } else {
        equalized
    }
}

/// Gaussian smoothing on a float plane, rounded back to intensities
///
/// Smoothing in f32 keeps flat saturated regions at exactly 255, so
/// the detection cutoff still sees them after this stage.
fn blur(gray: &GrayImage, sigma: f32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut plane = ImageBuffer::<Luma<f32>, Vec<f32>>::new(width, height);
    for (x, y, pixel) in gray.enumerate_pixels() {
        plane.put_pixel(x, y, Luma([f32::from(pixel[0])]));
    }

    let blurred = gaussian_blur_f32(&plane, sigma);

    let mut out = GrayImage::new(width, height);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let v = blurred.get_pixel(x, y)[0].clamp(0.0, 255.0);
        pixel.0[0] = v.round() as u8;
    }
    out
}

/// BT.601 luminance of an RGB image
fn luminance(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut gray = GrayImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
        gray.put_pixel(x, y, Luma([luma.round() as u8]));
    }
    gray
}

/// Gaussian sigma matching a given odd kernel side length
fn sigma_for_kernel(kernel: u32) -> f32 {
    0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8
}
