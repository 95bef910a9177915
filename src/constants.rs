// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Processing canvas constants
pub mod frame {
    /// Width every frame is normalized to before enhancement
    pub const TARGET_WIDTH: u32 = 640;

    /// Height every frame is normalized to before enhancement
    pub const TARGET_HEIGHT: u32 = 480;
}

/// Tonal enhancement defaults
pub mod enhancement {
    /// Global histogram equalization on by default
    pub const EQUALIZE: bool = true;

    /// Default Gaussian smoothing kernel side length (must be odd)
    ///
    /// A kernel of 1 leaves the frame untouched.
    pub const BLUR_KERNEL: u32 = 3;
}

/// Blob detection defaults
///
/// Tuned for near-saturated insect reflections under IR illumination
/// on a 640x480 canvas.
pub mod detection {
    /// Minimum intensity a pixel must exceed to count as a candidate
    pub const INTENSITY_CUTOFF: u8 = 254;

    /// Smallest accepted blob area in pixels (filters sensor noise)
    pub const MIN_AREA: u32 = 200;

    /// Largest accepted blob area in pixels (filters glare patches)
    pub const MAX_AREA: u32 = 2000;

    /// Circularity a blob must exceed to be accepted
    ///
    /// Circularity is 4*pi*area/perimeter^2; 1.0 is a perfect circle.
    pub const MIN_CIRCULARITY: f64 = 0.6;
}

/// Annotation drawing constants
pub mod annotation {
    /// Bounding box and label color (RGB)
    pub const COLOR: [u8; 3] = [0, 255, 0];

    /// Bounding box stroke width in pixels
    pub const STROKE_WIDTH: u32 = 2;

    /// Glyph scale factor for circularity labels
    pub const TEXT_SCALE: u32 = 2;

    /// Gap between a label baseline and its box top edge
    pub const TEXT_GAP: u32 = 2;
}

/// Illuminator PWM defaults
///
/// Matches the IR LED driver wiring on the reference unit.
pub mod pwm {
    /// BCM pin driving the IR illuminator
    pub const PIN: u32 = 18;

    /// Base carrier frequency in Hz
    pub const FREQUENCY_HZ: u32 = 1000;

    /// Lowest allowed carrier frequency in Hz
    pub const FREQ_MIN_HZ: u32 = 500;

    /// Highest allowed carrier frequency in Hz
    pub const FREQ_MAX_HZ: u32 = 1500;

    /// Base duty cycle in percent
    pub const DUTY_PERCENT: u32 = 50;

    /// Lowest allowed duty cycle in percent
    pub const DUTY_MIN: u32 = 0;

    /// Highest allowed duty cycle in percent
    pub const DUTY_MAX: u32 = 100;

    /// Default sysfs PWM chip index
    pub const SYSFS_CHIP: u32 = 0;

    /// Default sysfs PWM channel index
    pub const SYSFS_CHANNEL: u32 = 0;
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Pause between monitor loop iterations
    pub const MONITOR_TICK: Duration = Duration::from_millis(100);

    /// Pause before retrying after a capture failure
    pub const CAPTURE_RETRY_DELAY: Duration = Duration::from_millis(500);
}

/// Storage locations and naming
pub mod storage {
    /// Folder created under the user picture directory for saved frames
    pub const DEFAULT_SAVE_FOLDER: &str = "ir-monitor";

    /// Timestamp format for generated filenames
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Directory created under the user config directory
    pub const CONFIG_DIR: &str = "ir-monitor";

    /// Configuration file name
    pub const CONFIG_FILE: &str = "config.json";
}

/// Supported file formats for the file capture source
pub mod file_formats {
    /// Supported image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Synthetic capture source constants
pub mod synthetic {
    /// Default sensor width emulated by the synthetic source
    pub const SENSOR_WIDTH: u32 = 800;

    /// Default sensor height emulated by the synthetic source
    pub const SENSOR_HEIGHT: u32 = 600;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_bounds_ordered() {
        assert!(detection::MIN_AREA < detection::MAX_AREA);
        assert!(detection::MIN_CIRCULARITY > 0.0);
        assert!(detection::MIN_CIRCULARITY < 1.0);
    }

    #[test]
    fn test_blur_kernel_odd() {
        assert_eq!(enhancement::BLUR_KERNEL % 2, 1);
    }

    #[test]
    fn test_pwm_ranges_contain_defaults() {
        assert!(pwm::FREQ_MIN_HZ <= pwm::FREQUENCY_HZ);
        assert!(pwm::FREQUENCY_HZ <= pwm::FREQ_MAX_HZ);
        assert!(pwm::DUTY_MIN <= pwm::DUTY_PERCENT);
        assert!(pwm::DUTY_PERCENT <= pwm::DUTY_MAX);
    }

    #[test]
    fn test_image_extensions() {
        assert!(file_formats::is_image_extension("png"));
        assert!(file_formats::is_image_extension("JPG"));
        assert!(!file_formats::is_image_extension("mp4"));
    }
}
