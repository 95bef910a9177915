// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the monitoring unit
//!
//! This module provides command-line functionality for:
//! - Running the continuous monitoring loop
//! - Processing a single image through the pipeline
//! - Listing available display palettes

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use clap::Args;
use tracing::error;

use ir_monitor::capture::{self, CameraFrame};
use ir_monitor::config::Config;
use ir_monitor::constants::timing;
use ir_monitor::errors::{AppError, AppResult};
use ir_monitor::pipeline::{FramePipeline, Palette};
use ir_monitor::pwm::{self, PwmController};
use ir_monitor::storage;

/// Pipeline tuning flags shared by `run` and `process`
#[derive(Args, Debug, Default)]
pub struct TuningArgs {
    /// Display palette (none, grayscale, turbo, jet, hot)
    #[arg(long)]
    pub palette: Option<String>,

    /// Disable global histogram equalization
    #[arg(long)]
    pub no_equalize: bool,

    /// Gaussian smoothing kernel side length (odd; 1 disables)
    #[arg(long)]
    pub blur_kernel: Option<u32>,

    /// Disable blob detection and annotation
    #[arg(long)]
    pub no_detect: bool,

    /// Intensity cutoff for the candidate mask (0-255)
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Minimum accepted blob area in pixels
    #[arg(long)]
    pub min_area: Option<u32>,

    /// Maximum accepted blob area in pixels
    #[arg(long)]
    pub max_area: Option<u32>,

    /// Circularity acceptance cutoff
    #[arg(long)]
    pub min_circularity: Option<f64>,
}

/// Arguments for the monitoring loop
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Capture source: "synthetic" or an image file/directory
    #[arg(short, long)]
    pub source: Option<String>,

    /// Stop after this many seconds (default: run until Ctrl+C)
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Save every Nth processed frame as PNG
    #[arg(long)]
    pub save_interval: Option<u64>,

    /// Directory for saved frames (default: ~/Pictures/ir-monitor)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Switch the IR illuminator on at startup
    #[arg(long)]
    pub pwm: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Arguments for single-image processing
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Input image file
    pub input: PathBuf,

    /// Output file path (default: <output dir>/<input>_annotated_TIMESTAMP.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Run the continuous monitoring loop
pub fn run_monitor(args: RunArgs) -> AppResult<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_tuning(&mut config, &args.tuning)?;
    if let Some(source) = &args.source {
        config.capture_source = source.clone();
    }

    let mut backend = capture::create_backend(&config.capture_source)?;
    let pipeline = FramePipeline::new(config.pipeline)
        .map_err(|e| AppError::Config(e.to_string()))?;
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(storage::default_output_dir);

    let mut illuminator = PwmController::new(config.pwm, pwm::default_backend()?)?;
    if args.pwm {
        illuminator.toggle()?;
    }

    println!("Source: {}", backend.name());
    println!("Palette: {}", pipeline.palette().display_name());
    println!("{}", illuminator.status_line());
    println!();
    println!("Monitoring... (press Ctrl+C to stop)");

    // Set up Ctrl+C handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| AppError::Other(e.to_string()))?;

    let session = storage::timestamp();
    let start = Instant::now();
    let mut frames: u64 = 0;
    let mut detections: u64 = 0;

    loop {
        if stop_flag.load(Ordering::SeqCst) {
            println!();
            println!("Stopping...");
            break;
        }
        if let Some(limit) = args.duration
            && start.elapsed() >= Duration::from_secs(limit)
        {
            println!();
            break;
        }

        let frame = match backend.capture_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, "frame capture failed");
                std::thread::sleep(timing::CAPTURE_RETRY_DELAY);
                continue;
            }
        };

        let processed = match pipeline.process(&frame) {
            Ok(processed) => processed,
            Err(e) => {
                error!(error = %e, "frame processing failed");
                continue;
            }
        };

        frames += 1;
        detections += processed.regions.len() as u64;

        if let Some(interval) = args.save_interval
            && interval > 0
            && frames % interval == 0
            && let Err(e) = storage::save_frame(&output_dir, &session, frames, &processed.image)
        {
            error!(error = %e, "frame save failed");
        }

        // Print progress
        let elapsed = start.elapsed().as_secs();
        print!(
            "\rMonitoring: {:02}:{:02}  frames: {}  detections: {}",
            elapsed / 60,
            elapsed % 60,
            frames,
            detections
        );
        std::io::Write::flush(&mut std::io::stdout())?;

        std::thread::sleep(timing::MONITOR_TICK);
    }

    println!("Processed {} frames, {} detection(s)", frames, detections);
    illuminator.stop()?;
    Ok(())
}

/// Process a single image through the pipeline
pub fn process_image(args: ProcessArgs) -> AppResult<()> {
    let mut config = load_config(args.config.as_deref())?;
    apply_tuning(&mut config, &args.tuning)?;

    let pipeline = FramePipeline::new(config.pipeline)
        .map_err(|e| AppError::Config(e.to_string()))?;

    let image = image::open(&args.input)?;
    let frame = CameraFrame::from_rgb_image(image.to_rgb8());
    let processed = pipeline.process(&frame)?;

    println!("Input: {}", args.input.display());
    println!("Detected {} region(s)", processed.regions.len());
    for (index, region) in processed.regions.iter().enumerate() {
        println!(
            "  [{}] area: {} px  circularity: {:.2}  at ({}, {}) size {}x{}",
            index,
            region.area,
            region.circularity,
            region.bounds.x,
            region.bounds.y,
            region.bounds.width,
            region.bounds.height
        );
    }

    let saved_path = if let Some(path) = args.output {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        processed.image.save(&path)?;
        path
    } else {
        let output_dir = config
            .output_dir
            .clone()
            .unwrap_or_else(storage::default_output_dir);
        let stem = args
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("frame");
        storage::save_processed_image(
            &output_dir,
            &format!("{}_annotated", stem),
            &processed.image,
        )?
    };

    println!("Saved: {}", saved_path.display());
    Ok(())
}

/// List all available display palettes
pub fn list_palettes() {
    println!("Available palettes:");
    println!();
    for palette in Palette::ALL {
        if palette == Palette::default() {
            println!("  {} (default)", palette.display_name());
        } else {
            println!("  {}", palette.display_name());
        }
    }
}

/// Load configuration from the given path or the default location
fn load_config(path: Option<&Path>) -> AppResult<Config> {
    match path {
        Some(path) => Config::load(path),
        None => match Config::default_path() {
            Some(path) => Config::load(&path),
            None => Ok(Config::default()),
        },
    }
}

/// Overlay command-line tuning flags onto the loaded configuration
fn apply_tuning(config: &mut Config, tuning: &TuningArgs) -> AppResult<()> {
    if let Some(name) = &tuning.palette {
        config.pipeline.palette = Palette::from_name(name).ok_or_else(|| {
            let known: Vec<&str> = Palette::ALL.iter().map(|p| p.display_name()).collect();
            AppError::Config(format!(
                "unknown palette '{}' (expected one of: {})",
                name,
                known.join(", ")
            ))
        })?;
    }
    if tuning.no_equalize {
        config.pipeline.enhance.equalize = false;
    }
    if let Some(kernel) = tuning.blur_kernel {
        config.pipeline.enhance.blur_kernel = kernel;
    }
    if tuning.no_detect {
        config.pipeline.detect.enabled = false;
    }
    if let Some(cutoff) = tuning.threshold {
        config.pipeline.detect.intensity_cutoff = cutoff;
    }
    if let Some(area) = tuning.min_area {
        config.pipeline.detect.min_area = area;
    }
    if let Some(area) = tuning.max_area {
        config.pipeline.detect.max_area = area;
    }
    if let Some(cutoff) = tuning.min_circularity {
        config.pipeline.detect.min_circularity = cutoff;
    }
    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_tuning_overrides() {
        let mut config = Config::default();
        let tuning = TuningArgs {
            palette: Some("hot".to_string()),
            no_equalize: true,
            blur_kernel: Some(5),
            no_detect: true,
            threshold: Some(200),
            min_area: Some(100),
            max_area: Some(3000),
            min_circularity: Some(0.5),
        };

        apply_tuning(&mut config, &tuning).unwrap();
        assert_eq!(config.pipeline.palette, Palette::Hot);
        assert!(!config.pipeline.enhance.equalize);
        assert_eq!(config.pipeline.enhance.blur_kernel, 5);
        assert!(!config.pipeline.detect.enabled);
        assert_eq!(config.pipeline.detect.intensity_cutoff, 200);
        assert_eq!(config.pipeline.detect.min_area, 100);
        assert_eq!(config.pipeline.detect.max_area, 3000);
        assert!((config.pipeline.detect.min_circularity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_apply_tuning_rejects_unknown_palette() {
        let mut config = Config::default();
        let tuning = TuningArgs {
            palette: Some("sepia".to_string()),
            ..TuningArgs::default()
        };
        assert!(apply_tuning(&mut config, &tuning).is_err());
    }

    #[test]
    fn test_apply_tuning_rejects_even_kernel() {
        let mut config = Config::default();
        let tuning = TuningArgs {
            blur_kernel: Some(4),
            ..TuningArgs::default()
        };
        assert!(apply_tuning(&mut config, &tuning).is_err());
    }

    #[test]
    fn test_defaults_pass_validation() {
        let mut config = Config::default();
        apply_tuning(&mut config, &TuningArgs::default()).unwrap();
        assert_eq!(config.pipeline.palette, Palette::Turbo);
    }
}
