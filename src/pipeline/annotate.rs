// SPDX-License-Identifier: GPL-3.0-only

//! Detection overlay drawing
//!
//! Draws a hollow bounding box around each accepted blob and its
//! circularity score just above the box. Labels use a small built-in
//! 3x5 glyph set so no font files are needed on the device.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use super::types::DetectedRegion;
use crate::constants::annotation;

/// Glyph height in unscaled pixels
const GLYPH_HEIGHT: u32 = 5;

/// Glyph width in unscaled pixels
const GLYPH_WIDTH: u32 = 3;

/// Draw boxes and circularity labels for every accepted region
pub fn annotate(image: &mut RgbImage, regions: &[DetectedRegion]) {
    let color = Rgb(annotation::COLOR);
    for region in regions {
        draw_box(image, region, color);
        draw_score(image, region, color);
    }
}

/// Hollow rectangle with the configured stroke width, expanding outward
fn draw_box(image: &mut RgbImage, region: &DetectedRegion, color: Rgb<u8>) {
    let bounds = region.bounds;
    for ring in 0..annotation::STROKE_WIDTH {
        let x = bounds.x as i32 - ring as i32;
        let y = bounds.y as i32 - ring as i32;
        let rect = Rect::at(x, y).of_size(bounds.width + 2 * ring, bounds.height + 2 * ring);
        draw_hollow_rect_mut(image, rect, color);
    }
}

/// Circularity with two decimals, anchored above the box top edge
fn draw_score(image: &mut RgbImage, region: &DetectedRegion, color: Rgb<u8>) {
    let label = format!("{:.2}", region.circularity);
    let text_height = GLYPH_HEIGHT * annotation::TEXT_SCALE;
    let y = region
        .bounds
        .y
        .saturating_sub(text_height + annotation::TEXT_GAP + annotation::STROKE_WIDTH);
    draw_label(image, &label, region.bounds.x, y, annotation::TEXT_SCALE, color);
}

/// Render a short string with the built-in glyph set
///
/// Characters without a glyph advance the cursor but draw nothing.
/// Pixels falling outside the canvas are dropped.
fn draw_label(image: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let mut cursor_x = x;
    for ch in text.chars() {
        if let Some(rows) = glyph(ch) {
            draw_glyph(image, &rows, cursor_x, y, scale, color);
        }
        cursor_x += (GLYPH_WIDTH + 1) * scale;
    }
}

/// Paint one glyph at the given origin
fn draw_glyph(image: &mut RgbImage, rows: &[u8; 5], x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let (width, height) = image.dimensions();
    for (row_index, &row) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if row & (1u8 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    let px = x + col * scale + sx;
                    let py = y + row_index as u32 * scale + sy;
                    if px < width && py < height {
                        image.put_pixel(px, py, color);
                    }
                }
            }
        }
    }
}

/// 3x5 bitmap rows for the characters circularity labels use
fn glyph(ch: char) -> Option<[u8; 5]> {
    let rows = match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        _ => return None,
    };
    Some(rows)
}
