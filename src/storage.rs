// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for saved frames

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use image::RgbImage;
use tracing::debug;

use crate::constants::storage;
use crate::errors::AppResult;

/// Default directory for saved frames
///
/// Falls back through picture directory, home directory, and the
/// current directory, always inside the application folder.
pub fn default_output_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(storage::DEFAULT_SAVE_FOLDER)
}

/// Create the output directory if it does not exist yet
pub fn ensure_dir(dir: &Path) -> AppResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        debug!(dir = %dir.display(), "created output directory");
    }
    Ok(())
}

/// Timestamp suffix for generated filenames
pub fn timestamp() -> String {
    Local::now().format(storage::TIMESTAMP_FORMAT).to_string()
}

/// Write a processed frame as PNG under the given directory
///
/// The frame index keeps names unique within a session even when
/// several frames are saved in the same second.
pub fn save_frame(dir: &Path, session: &str, frame_index: u64, image: &RgbImage) -> AppResult<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(format!("frame_{}_{:05}.png", session, frame_index));
    image.save(&path)?;
    debug!(path = %path.display(), "frame saved");
    Ok(path)
}

/// Write a single annotated image next to its source name
pub fn save_processed_image(dir: &Path, stem: &str, image: &RgbImage) -> AppResult<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(format!("{}_{}.png", stem, timestamp()));
    image.save(&path)?;
    debug!(path = %path.display(), "processed image saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_default_output_dir_ends_with_app_folder() {
        let dir = default_output_dir();
        assert!(dir.ends_with(storage::DEFAULT_SAVE_FOLDER));
    }

    #[test]
    fn test_save_frame_creates_directory_and_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("frames");
        let image = RgbImage::from_pixel(8, 8, Rgb([255, 0, 0]));

        let path = save_frame(&dir, "20260101_120000", 42, &image).unwrap();
        assert!(path.exists());
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("frame_20260101_120000_00042.png")
        );

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_save_processed_image_uses_stem() {
        let root = tempfile::tempdir().unwrap();
        let image = RgbImage::from_pixel(4, 4, Rgb([0, 255, 0]));

        let path = save_processed_image(root.path(), "annotated_moth", &image).unwrap();
        assert!(path.exists());
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        assert!(name.starts_with("annotated_moth_"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_timestamp_format_shape() {
        let stamp = timestamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(stamp.chars().filter(|&c| c == '_').count(), 1);
    }
}
