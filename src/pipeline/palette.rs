// SPDX-License-Identifier: GPL-3.0-only

//! Display palettes for the enhanced intensity plane
//!
//! Mapping palettes are polynomial or piecewise approximations sampled
//! into a 256-entry lookup table per frame. Input intensity t is
//! normalized to [0, 1].

use image::{GrayImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use super::types::FrameImage;

/// Display palette applied after enhancement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Palette {
    /// No recoloring: show the normalized frame as captured
    None,
    /// Show the enhanced intensity plane itself
    Grayscale,
    /// Perceptually uniform rainbow map (default)
    #[default]
    Turbo,
    /// Classic blue-to-red rainbow map
    Jet,
    /// Black-red-yellow-white heat map
    Hot,
}

impl Palette {
    /// All palette variants for listings and pickers
    pub const ALL: [Palette; 5] = [
        Palette::None,
        Palette::Grayscale,
        Palette::Turbo,
        Palette::Jet,
        Palette::Hot,
    ];

    /// Get display name for the palette
    pub fn display_name(&self) -> &'static str {
        match self {
            Palette::None => "none",
            Palette::Grayscale => "grayscale",
            Palette::Turbo => "turbo",
            Palette::Jet => "jet",
            Palette::Hot => "hot",
        }
    }

    /// Look up a palette by its display name, case-insensitively
    pub fn from_name(name: &str) -> Option<Palette> {
        Palette::ALL
            .into_iter()
            .find(|palette| palette.display_name().eq_ignore_ascii_case(name))
    }
}

/// Build the display frame for the selected palette
///
/// `None` reproduces the normalized frame, `Grayscale` shows the
/// enhanced plane, and every mapping palette recolors the enhanced
/// plane through its lookup table. Output is always three-channel.
pub fn colorize(palette: Palette, enhanced: &GrayImage, normalized: &FrameImage) -> RgbImage {
    match palette {
        Palette::None => match normalized {
            FrameImage::Rgb(img) => img.clone(),
            FrameImage::Gray(img) => replicate(img),
        },
        Palette::Grayscale => replicate(enhanced),
        Palette::Turbo => apply_map(enhanced, turbo),
        Palette::Jet => apply_map(enhanced, jet),
        Palette::Hot => apply_map(enhanced, hot),
    }
}

/// Spread a single intensity plane across three equal channels
fn replicate(gray: &GrayImage) -> RgbImage {
    let (width, height) = gray.dimensions();
    let mut out = RgbImage::new(width, height);
    for (x, y, pixel) in gray.enumerate_pixels() {
        let v = pixel[0];
        out.put_pixel(x, y, Rgb([v, v, v]));
    }
    out
}

/// Recolor an intensity plane through a sampled lookup table
fn apply_map(gray: &GrayImage, map: fn(f32) -> [u8; 3]) -> RgbImage {
    let lut: Vec<[u8; 3]> = (0..=255u32).map(|v| map(v as f32 / 255.0)).collect();
    let (width, height) = gray.dimensions();
    let mut out = RgbImage::new(width, height);
    for (x, y, pixel) in gray.enumerate_pixels() {
        out.put_pixel(x, y, Rgb(lut[pixel[0] as usize]));
    }
    out
}

/// Turbo colormap polynomial approximation
fn turbo(t: f32) -> [u8; 3] {
    let r = (0.13572138
        + t * (4.6153926 + t * (-42.66032 + t * (132.13108 + t * (-152.54825 + t * 59.28144)))))
    .clamp(0.0, 1.0);
    let g = (0.09140261
        + t * (2.19418 + t * (4.84296 + t * (-14.18503 + t * (4.27805 + t * 2.53377)))))
    .clamp(0.0, 1.0);
    let b = (0.1066733
        + t * (12.64194 + t * (-60.58204 + t * (109.99648 + t * (-82.52904 + t * 20.43388)))))
    .clamp(0.0, 1.0);

    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Jet colormap piecewise approximation
fn jet(t: f32) -> [u8; 3] {
    let r = (1.5 - (4.0 * t - 3.0).abs()).clamp(0.0, 1.0);
    let g = (1.5 - (4.0 * t - 2.0).abs()).clamp(0.0, 1.0);
    let b = (1.5 - (4.0 * t - 1.0).abs()).clamp(0.0, 1.0);

    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Hot colormap piecewise ramp
fn hot(t: f32) -> [u8; 3] {
    let r = (3.0 * t).clamp(0.0, 1.0);
    let g = (3.0 * t - 1.0).clamp(0.0, 1.0);
    let b = (3.0 * t - 2.0).clamp(0.0, 1.0);

    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}
