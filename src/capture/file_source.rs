// SPDX-License-Identifier: GPL-3.0-only

//! File-backed capture source
//!
//! Replays a single image file or every image in a directory, looping
//! forever. Useful for reprocessing field recordings and for bench
//! testing without a sensor attached.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::CaptureBackend;
use super::types::{BackendError, BackendResult, CameraFrame};
use crate::constants::file_formats;

/// Capture source that cycles through image files on disk
pub struct FileCapture {
    paths: Vec<PathBuf>,
    next: usize,
    description: String,
}

impl FileCapture {
    /// Open a source from a single image file or a directory of images
    ///
    /// Directory entries are sorted by file name so replay order is
    /// stable across runs.
    pub fn open(path: &Path) -> BackendResult<Self> {
        let paths = if path.is_dir() {
            collect_image_paths(path)?
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(BackendError::SourceNotFound(path.display().to_string()));
        };

        if paths.is_empty() {
            return Err(BackendError::NoFramesFound(path.display().to_string()));
        }

        debug!(
            source = %path.display(),
            frame_count = paths.len(),
            "opened file capture source"
        );

        Ok(Self {
            paths,
            next: 0,
            description: path.display().to_string(),
        })
    }

    /// Number of distinct frames in the replay cycle
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the source holds no frames (never true after `open`)
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl CaptureBackend for FileCapture {
    fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        let path = &self.paths[self.next];
        self.next = (self.next + 1) % self.paths.len();

        trace!(path = %path.display(), "loading frame from file");
        let image = image::open(path)
            .map_err(|e| BackendError::DecodeFailed(format!("{}: {}", path.display(), e)))?;

        Ok(CameraFrame::from_rgb_image(image.to_rgb8()))
    }

    fn name(&self) -> &str {
        &self.description
    }
}

/// Collect supported image files from a directory, sorted by name
fn collect_image_paths(dir: &Path) -> BackendResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| BackendError::SourceNotFound(format!("{}: {}", dir.display(), e)))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(file_formats::is_image_extension)
        })
        .collect();

    paths.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::PixelFormat;
    use image::{Rgb, RgbImage};

    fn write_test_image(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        let image = RgbImage::from_pixel(8, 6, Rgb(color));
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn test_open_missing_path() {
        let result = FileCapture::open(Path::new("/nonexistent/frames"));
        assert!(matches!(result, Err(BackendError::SourceNotFound(_))));
    }

    #[test]
    fn test_open_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileCapture::open(dir.path());
        assert!(matches!(result, Err(BackendError::NoFramesFound(_))));
    }

    #[test]
    fn test_single_file_repeats() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "frame.png", [120, 0, 0]);

        let mut source = FileCapture::open(&path).unwrap();
        assert_eq!(source.len(), 1);

        let first = source.capture_frame().unwrap();
        let second = source.capture_frame().unwrap();
        assert_eq!(first.width, 8);
        assert_eq!(first.height, 6);
        assert_eq!(first.format, PixelFormat::Rgb8);
        assert_eq!(first.data, second.data);
    }

    #[test]
    fn test_directory_cycles_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_test_image(dir.path(), "b.png", [0, 200, 0]);
        write_test_image(dir.path(), "a.png", [100, 0, 0]);

        let mut source = FileCapture::open(dir.path()).unwrap();
        assert_eq!(source.len(), 2);

        let first = source.capture_frame().unwrap();
        let second = source.capture_frame().unwrap();
        let third = source.capture_frame().unwrap();

        assert_eq!(&first.data[..3], &[100, 0, 0]);
        assert_eq!(&second.data[..3], &[0, 200, 0]);
        assert_eq!(first.data, third.data);
    }

    #[test]
    fn test_skips_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        write_test_image(dir.path(), "frame.png", [50, 50, 50]);
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let source = FileCapture::open(dir.path()).unwrap();
        assert_eq!(source.len(), 1);
    }
}
