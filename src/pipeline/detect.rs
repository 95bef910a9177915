// SPDX-License-Identifier: GPL-3.0-only

//! Bright blob detection on the enhanced intensity plane
//!
//! Candidates are near-saturated connected regions. Each one is
//! filtered by filled area and by circularity so that only compact,
//! insect-sized reflections survive.

use std::f64::consts::PI;
use std::time::Instant;

use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::definitions::Image;
use imageproc::point::Point;
use imageproc::region_labelling::{connected_components, Connectivity};
use tracing::{debug, trace};

use super::types::{DetectConfig, DetectedRegion, RegionBounds};

/// Find accepted blobs on the enhanced plane
///
/// Area is the filled pixel count of a connected region; perimeter is
/// the closed length of its outer contour. A region whose contour
/// degenerates to a single point is skipped without error.
pub fn detect(enhanced: &GrayImage, config: &DetectConfig) -> Vec<DetectedRegion> {
    let start = Instant::now();

    let mask = threshold(enhanced, config.intensity_cutoff, ThresholdType::Binary);
    let labels = connected_components(&mask, Connectivity::Eight, Luma([0u8]));
    let stats = accumulate_stats(&labels);
    let contours = find_contours::<u32>(&mask);

    let mut candidates = 0usize;
    let mut regions = Vec::new();
    for contour in &contours {
        if contour.border_type != BorderType::Outer {
            continue;
        }
        candidates += 1;

        let Some(first) = contour.points.first() else {
            continue;
        };
        let label = labels.get_pixel(first.x, first.y)[0];
        if label == 0 {
            continue;
        }
        let Some(stat) = stats.get(label as usize - 1) else {
            continue;
        };

        let area = stat.count;
        if area < config.min_area || area > config.max_area {
            trace!(area, "candidate rejected by area bounds");
            continue;
        }

        let perimeter = contour_perimeter(&contour.points);
        if perimeter <= f64::EPSILON {
            trace!(area, "candidate skipped, degenerate contour");
            continue;
        }

        let circularity = 4.0 * PI * f64::from(area) / (perimeter * perimeter);
        if circularity <= config.min_circularity {
            trace!(area, circularity, "candidate rejected by circularity");
            continue;
        }

        regions.push(DetectedRegion {
            area,
            perimeter,
            circularity,
            bounds: RegionBounds {
                x: stat.min_x,
                y: stat.min_y,
                width: stat.max_x - stat.min_x + 1,
                height: stat.max_y - stat.min_y + 1,
            },
        });
    }

    debug!(
        candidates,
        accepted = regions.len(),
        total_ms = start.elapsed().as_millis() as u64,
        "blob detection complete"
    );

    regions
}

/// Per-label pixel count and bounding box
#[derive(Debug, Clone, Copy)]
struct RegionStats {
    count: u32,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl RegionStats {
    fn empty() -> Self {
        Self {
            count: 0,
            min_x: u32::MAX,
            min_y: u32::MAX,
            max_x: 0,
            max_y: 0,
        }
    }
}

/// Accumulate pixel counts and bounds for every component label
///
/// Labels are assigned densely starting at 1; index `label - 1` holds
/// the stats for that label.
fn accumulate_stats(labels: &Image<Luma<u32>>) -> Vec<RegionStats> {
    let mut stats: Vec<RegionStats> = Vec::new();
    for (x, y, pixel) in labels.enumerate_pixels() {
        let label = pixel[0];
        if label == 0 {
            continue;
        }
        let index = (label - 1) as usize;
        if index >= stats.len() {
            stats.resize(index + 1, RegionStats::empty());
        }
        let stat = &mut stats[index];
        stat.count += 1;
        stat.min_x = stat.min_x.min(x);
        stat.min_y = stat.min_y.min(y);
        stat.max_x = stat.max_x.max(x);
        stat.max_y = stat.max_y.max(y);
    }
    stats
}

/// Length of a contour treated as a closed polyline
fn contour_perimeter(points: &[Point<u32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let dx = f64::from(a.x) - f64::from(b.x);
        let dy = f64::from(a.y) - f64::from(b.y);
        total += (dx * dx + dy * dy).sqrt();
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_canvas() -> GrayImage {
        GrayImage::new(640, 480)
    }

    fn fill_rect(image: &mut GrayImage, x: u32, y: u32, width: u32, height: u32) {
        for dy in 0..height {
            for dx in 0..width {
                image.put_pixel(x + dx, y + dy, Luma([255]));
            }
        }
    }

    #[test]
    fn test_compact_square_accepted() {
        let mut image = blank_canvas();
        fill_rect(&mut image, 100, 120, 20, 20);

        let regions = detect(&image, &DetectConfig::default());
        assert_eq!(regions.len(), 1);

        let region = &regions[0];
        assert_eq!(region.area, 400);
        assert_eq!(
            region.bounds,
            RegionBounds {
                x: 100,
                y: 120,
                width: 20,
                height: 20
            }
        );
        assert!(region.circularity > 0.6);
        let expected = 4.0 * PI * 400.0 / (region.perimeter * region.perimeter);
        assert!((region.circularity - expected).abs() < 1e-9);
    }

    #[test]
    fn test_elongated_bar_rejected() {
        let mut image = blank_canvas();
        fill_rect(&mut image, 50, 200, 100, 2);

        let regions = detect(&image, &DetectConfig::default());
        assert!(regions.is_empty());
    }

    #[test]
    fn test_small_and_large_areas_rejected() {
        let mut image = blank_canvas();
        fill_rect(&mut image, 10, 10, 10, 10);
        fill_rect(&mut image, 200, 200, 50, 50);

        let regions = detect(&image, &DetectConfig::default());
        assert!(regions.is_empty());
    }

    #[test]
    fn test_multiple_blobs_reported_separately() {
        let mut image = blank_canvas();
        fill_rect(&mut image, 50, 50, 20, 20);
        fill_rect(&mut image, 400, 300, 22, 22);

        let regions = detect(&image, &DetectConfig::default());
        assert_eq!(regions.len(), 2);
        let areas: Vec<u32> = regions.iter().map(|r| r.area).collect();
        assert!(areas.contains(&400));
        assert!(areas.contains(&484));
    }

    #[test]
    fn test_dim_pixels_ignored() {
        let mut image = blank_canvas();
        for dy in 0..30 {
            for dx in 0..30 {
                image.put_pixel(100 + dx, 100 + dy, Luma([254]));
            }
        }

        let regions = detect(&image, &DetectConfig::default());
        assert!(regions.is_empty());
    }

    #[test]
    fn test_single_pixel_skipped_without_error() {
        let mut image = blank_canvas();
        image.put_pixel(320, 240, Luma([255]));

        let config = DetectConfig {
            min_area: 1,
            ..DetectConfig::default()
        };
        let regions = detect(&image, &config);
        assert!(regions.is_empty());
    }

    #[test]
    fn test_detection_deterministic() {
        let mut image = blank_canvas();
        fill_rect(&mut image, 300, 200, 18, 18);

        let first = detect(&image, &DetectConfig::default());
        let second = detect(&image, &DetectConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_area_bounds_inclusive() {
        let mut image = blank_canvas();
        fill_rect(&mut image, 100, 100, 20, 10);

        let config = DetectConfig {
            min_area: 200,
            max_area: 2000,
            min_circularity: 0.0,
            ..DetectConfig::default()
        };
        let regions = detect(&image, &config);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 200);
    }
}
