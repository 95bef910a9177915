// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use ir_monitor::constants::{annotation, detection, enhancement, frame, pwm};

#[test]
fn test_processing_canvas_dimensions() {
    assert_eq!(frame::TARGET_WIDTH, 640);
    assert_eq!(frame::TARGET_HEIGHT, 480);
}

#[test]
fn test_detection_thresholds() {
    assert_eq!(detection::INTENSITY_CUTOFF, 254);
    assert!(
        detection::MIN_AREA < detection::MAX_AREA,
        "Area bounds must be ordered"
    );
    assert!(
        detection::MIN_CIRCULARITY > 0.0 && detection::MIN_CIRCULARITY < 1.0,
        "Circularity cutoff must leave room on both sides"
    );
}

#[test]
fn test_enhancement_defaults() {
    assert!(enhancement::EQUALIZE);
    assert_eq!(
        enhancement::BLUR_KERNEL % 2,
        1,
        "Smoothing kernel must be odd"
    );
}

#[test]
fn test_annotation_stroke_visible() {
    assert!(annotation::STROKE_WIDTH >= 1);
    assert!(annotation::TEXT_SCALE >= 1);
}

#[test]
fn test_pwm_defaults_inside_ranges() {
    assert!(pwm::FREQ_MIN_HZ <= pwm::FREQUENCY_HZ && pwm::FREQUENCY_HZ <= pwm::FREQ_MAX_HZ);
    assert!(pwm::DUTY_MIN <= pwm::DUTY_PERCENT && pwm::DUTY_PERCENT <= pwm::DUTY_MAX);
    assert!(pwm::DUTY_MAX <= 100);
}
