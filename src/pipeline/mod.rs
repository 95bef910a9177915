// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing pipeline
//!
//! Every captured frame passes through four fixed stages:
//!
//! 1. geometric normalization onto the 640x480 canvas
//! 2. tonal enhancement of the intensity plane
//! 3. palette colorization for display
//! 4. blob detection and annotation
//!
//! Stage order never changes. The active palette and the detection
//! switch are the only mutable knobs; both are read once at the top of
//! [`FramePipeline::process`] so a pass is internally consistent.

use std::time::Instant;

use tracing::{debug, trace};

pub mod annotate;
pub mod detect;
pub mod enhance;
pub mod normalize;
pub mod palette;
pub mod types;

pub use palette::Palette;
pub use types::{
    DetectConfig, DetectedRegion, EnhanceConfig, FrameImage, PipelineConfig, PipelineError,
    ProcessedFrame, RegionBounds,
};

use crate::capture::CameraFrame;

/// Stateless frame processor with a small set of tunable knobs
#[derive(Debug, Clone)]
pub struct FramePipeline {
    config: PipelineConfig,
}

impl FramePipeline {
    /// Build a pipeline after validating its settings
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Current pipeline settings
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Currently selected palette
    pub fn palette(&self) -> Palette {
        self.config.palette
    }

    /// Switch the display palette for subsequent passes
    pub fn set_palette(&mut self, palette: Palette) {
        if self.config.palette != palette {
            debug!(palette = palette.display_name(), "palette changed");
        }
        self.config.palette = palette;
    }

    /// Enable or disable detection for subsequent passes
    pub fn set_detection_enabled(&mut self, enabled: bool) {
        if self.config.detect.enabled != enabled {
            debug!(enabled, "detection toggled");
        }
        self.config.detect.enabled = enabled;
    }

    /// Run one frame through all four stages
    ///
    /// Identical input and identical settings produce byte-identical
    /// output.
    pub fn process(&self, frame: &CameraFrame) -> Result<ProcessedFrame, PipelineError> {
        let start = Instant::now();
        let active_palette = self.config.palette;
        let detection_enabled = self.config.detect.enabled;

        let decoded = FrameImage::from_frame(frame)?;
        let decode_ms = start.elapsed().as_millis() as u64;

        let normalized = normalize::normalize(decoded);
        let normalize_ms = start.elapsed().as_millis() as u64 - decode_ms;

        let enhanced = enhance::enhance(&normalized, &self.config.enhance);
        let mut image = palette::colorize(active_palette, &enhanced, &normalized);

        let regions = if detection_enabled {
            detect::detect(&enhanced, &self.config.detect)
        } else {
            Vec::new()
        };
        annotate::annotate(&mut image, &regions);

        trace!(
            width = frame.width,
            height = frame.height,
            format = %frame.format,
            decode_ms,
            normalize_ms,
            "pipeline stage timings"
        );
        debug!(
            regions = regions.len(),
            palette = active_palette.display_name(),
            total_ms = start.elapsed().as_millis() as u64,
            "frame processed"
        );

        Ok(ProcessedFrame { image, regions })
    }
}

impl Default for FramePipeline {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }
}
