// SPDX-License-Identifier: GPL-3.0-only

//! IR Monitor - an infrared insect monitoring camera
//!
//! This library provides the core functionality of the monitoring
//! unit: capturing frames, enhancing and recoloring them for display,
//! and detecting the compact near-saturated reflections that insects
//! produce under active IR illumination.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`capture`]: Frame sources (synthetic pattern, file replay)
//! - [`pipeline`]: The four-stage frame processing pipeline
//! - [`pwm`]: IR illuminator drive control
//! - [`config`]: User configuration handling
//! - [`storage`]: Saved frame naming and locations
//!
//! # Example
//!
//! ```no_run
//! use ir_monitor::capture::{CaptureBackend, SyntheticCapture};
//! use ir_monitor::pipeline::{FramePipeline, PipelineConfig};
//!
//! fn main() -> ir_monitor::errors::AppResult<()> {
//!     let mut source = SyntheticCapture::new(800, 600);
//!     let pipeline = FramePipeline::new(PipelineConfig::default())?;
//!
//!     let frame = source.capture_frame()?;
//!     let processed = pipeline.process(&frame)?;
//!     println!("{} region(s) detected", processed.regions.len());
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipeline;
pub mod pwm;
pub mod storage;

// Re-export commonly used types
pub use capture::{CameraFrame, CaptureBackend, PixelFormat};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use pipeline::{DetectedRegion, FramePipeline, Palette, PipelineConfig, ProcessedFrame};
