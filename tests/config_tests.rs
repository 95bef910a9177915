// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use ir_monitor::Config;
use ir_monitor::pipeline::Palette;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(
        config.pipeline.palette,
        Palette::Turbo,
        "Default palette should be turbo"
    );
    assert!(
        config.pipeline.enhance.equalize,
        "Equalization should be enabled by default"
    );
    assert_eq!(config.pipeline.enhance.blur_kernel, 3);
    assert!(
        config.pipeline.detect.enabled,
        "Detection should be enabled by default"
    );
    assert_eq!(config.pipeline.detect.intensity_cutoff, 254);
    assert_eq!(config.pipeline.detect.min_area, 200);
    assert_eq!(config.pipeline.detect.max_area, 2000);
    assert!((config.pipeline.detect.min_circularity - 0.6).abs() < 1e-9);
    assert_eq!(
        config.capture_source, "synthetic",
        "Default source should be the synthetic generator"
    );
}

#[test]
fn test_config_pwm_defaults() {
    let config = Config::default();

    assert_eq!(config.pwm.pin, 18);
    assert_eq!(config.pwm.frequency_hz, 1000);
    assert_eq!(config.pwm.freq_min_hz, 500);
    assert_eq!(config.pwm.freq_max_hz, 1500);
    assert_eq!(config.pwm.duty_percent, 50);
    assert_eq!(config.pwm.duty_min, 0);
    assert_eq!(config.pwm.duty_max, 100);
}

#[test]
fn test_config_roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.pipeline.palette = Palette::Jet;
    config.pipeline.detect.max_area = 4000;
    config.capture_source = "/data/frames".to_string();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_rejects_contradictory_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"pipeline": {"detect": {"min_area": 5000, "max_area": 100}}}"#,
    )
    .unwrap();

    assert!(Config::load(&path).is_err());
}

#[test]
fn test_config_palette_stored_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.pipeline.palette = Palette::Hot;
    config.save(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(
        contents.contains("\"Hot\""),
        "Palette should serialize as a readable name"
    );
}
