// SPDX-License-Identifier: GPL-3.0-only

//! Persistent application configuration
//!
//! Stored as JSON under the user config directory so field units stay
//! editable by hand. Missing fields fall back to their defaults, so
//! older files keep loading after upgrades.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::SYNTHETIC_SOURCE;
use crate::constants::storage;
use crate::errors::{AppError, AppResult};
use crate::pipeline::PipelineConfig;
use crate::pwm::PwmConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame processing settings (palette, enhancement, detection)
    pub pipeline: PipelineConfig,
    /// Illuminator drive settings
    pub pwm: PwmConfig,
    /// Capture source selector ("synthetic" or an image path)
    pub capture_source: String,
    /// Where saved frames land; None picks the user picture directory
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            pwm: PwmConfig::default(),
            capture_source: SYNTHETIC_SOURCE.to_string(),
            output_dir: None,
        }
    }
}

impl Config {
    /// Default configuration file location for this user
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(storage::CONFIG_DIR).join(storage::CONFIG_FILE))
    }

    /// Load configuration from a file, validating the result
    ///
    /// A missing file yields the defaults rather than an error.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Write configuration to a file, creating parent directories
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(path, contents)?;
        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Check all embedded settings for contradictions
    pub fn validate(&self) -> AppResult<()> {
        self.pipeline
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        self.pwm
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        if self.capture_source.is_empty() {
            return Err(AppError::Config(
                "capture source must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
