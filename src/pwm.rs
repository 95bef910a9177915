// SPDX-License-Identifier: GPL-3.0-only

//! IR illuminator PWM control
//!
//! The illuminator LED array is driven by one hardware PWM channel.
//! [`PwmController`] owns the operator-facing state machine: an
//! enable/disable switch and an automatic/manual mode, with frequency
//! and duty adjustable inside configured bounds while in manual mode.
//! The actual channel is behind [`PwmBackend`] so the controller works
//! the same against sysfs hardware and the simulated stand-in.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::pwm as pwm_defaults;

/// Errors from illuminator control
#[derive(Debug, Clone)]
pub enum PwmError {
    /// No usable PWM chip on this system
    NotAvailable(String),
    /// A requested value falls outside its configured bounds
    OutOfRange {
        name: &'static str,
        value: i64,
        min: u32,
        max: u32,
    },
    /// Manual adjustment attempted while in automatic mode
    AutoModeActive,
    /// Controller settings failed validation
    InvalidConfiguration(String),
    /// A sysfs read or write failed
    Io(String),
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PwmError::NotAvailable(msg) => write!(f, "PWM not available: {}", msg),
            PwmError::OutOfRange {
                name,
                value,
                min,
                max,
            } => write!(f, "{} {} outside allowed range {}..={}", name, value, min, max),
            PwmError::AutoModeActive => {
                write!(f, "manual adjustment rejected while in automatic mode")
            }
            PwmError::InvalidConfiguration(msg) => write!(f, "invalid PWM settings: {}", msg),
            PwmError::Io(msg) => write!(f, "PWM I/O failed: {}", msg),
        }
    }
}

impl std::error::Error for PwmError {}

/// Illuminator drive settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PwmConfig {
    /// BCM pin the LED driver hangs off, reported in status output
    pub pin: u32,
    /// Base carrier frequency in Hz
    pub frequency_hz: u32,
    /// Lowest adjustable carrier frequency in Hz
    pub freq_min_hz: u32,
    /// Highest adjustable carrier frequency in Hz
    pub freq_max_hz: u32,
    /// Base duty cycle in percent
    pub duty_percent: u32,
    /// Lowest adjustable duty cycle in percent
    pub duty_min: u32,
    /// Highest adjustable duty cycle in percent
    pub duty_max: u32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            pin: pwm_defaults::PIN,
            frequency_hz: pwm_defaults::FREQUENCY_HZ,
            freq_min_hz: pwm_defaults::FREQ_MIN_HZ,
            freq_max_hz: pwm_defaults::FREQ_MAX_HZ,
            duty_percent: pwm_defaults::DUTY_PERCENT,
            duty_min: pwm_defaults::DUTY_MIN,
            duty_max: pwm_defaults::DUTY_MAX,
        }
    }
}

impl PwmConfig {
    /// Check ranges and base values for contradictions
    pub fn validate(&self) -> Result<(), PwmError> {
        if self.freq_min_hz == 0 {
            return Err(PwmError::InvalidConfiguration(
                "minimum frequency must be positive".to_string(),
            ));
        }
        if self.freq_min_hz > self.freq_max_hz {
            return Err(PwmError::InvalidConfiguration(format!(
                "frequency range {}..{} is inverted",
                self.freq_min_hz, self.freq_max_hz
            )));
        }
        if self.duty_min > self.duty_max {
            return Err(PwmError::InvalidConfiguration(format!(
                "duty range {}..{} is inverted",
                self.duty_min, self.duty_max
            )));
        }
        if self.duty_max > 100 {
            return Err(PwmError::InvalidConfiguration(format!(
                "maximum duty {} exceeds 100 percent",
                self.duty_max
            )));
        }
        if self.frequency_hz < self.freq_min_hz || self.frequency_hz > self.freq_max_hz {
            return Err(PwmError::OutOfRange {
                name: "frequency",
                value: i64::from(self.frequency_hz),
                min: self.freq_min_hz,
                max: self.freq_max_hz,
            });
        }
        if self.duty_percent < self.duty_min || self.duty_percent > self.duty_max {
            return Err(PwmError::OutOfRange {
                name: "duty",
                value: i64::from(self.duty_percent),
                min: self.duty_min,
                max: self.duty_max,
            });
        }
        Ok(())
    }
}

/// Operating mode of the illuminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmMode {
    /// Follow the configured base frequency and duty
    Auto,
    /// Operator adjusts frequency and duty within bounds
    Manual,
}

impl PwmMode {
    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            PwmMode::Auto => "auto",
            PwmMode::Manual => "manual",
        }
    }
}

/// A PWM channel the controller can drive
pub trait PwmBackend {
    /// Program carrier frequency and duty cycle
    fn apply(&mut self, frequency_hz: u32, duty_percent: u32) -> Result<(), PwmError>;

    /// Start or stop the output signal
    fn set_enabled(&mut self, enabled: bool) -> Result<(), PwmError>;

    /// Release the channel
    fn shutdown(&mut self) -> Result<(), PwmError>;
}

/// Backend that only logs what it would do
///
/// Used when no PWM chip is present, so the rest of the application
/// behaves identically on bench setups.
#[derive(Debug, Default)]
pub struct SimulatedPwm {
    /// Last programmed frequency
    pub frequency_hz: u32,
    /// Last programmed duty cycle
    pub duty_percent: u32,
    /// Whether the emulated output is running
    pub enabled: bool,
}

impl PwmBackend for SimulatedPwm {
    fn apply(&mut self, frequency_hz: u32, duty_percent: u32) -> Result<(), PwmError> {
        debug!(frequency_hz, duty_percent, "simulated PWM programmed");
        self.frequency_hz = frequency_hz;
        self.duty_percent = duty_percent;
        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PwmError> {
        debug!(enabled, "simulated PWM switched");
        self.enabled = enabled;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), PwmError> {
        self.enabled = false;
        Ok(())
    }
}

/// Hardware backend driving a channel under /sys/class/pwm
pub struct SysfsPwm {
    chip_dir: PathBuf,
    channel_dir: PathBuf,
    channel: u32,
    exported_here: bool,
}

impl SysfsPwm {
    /// Check whether a PWM chip is present on this system
    pub fn is_available(chip: u32) -> bool {
        chip_dir(chip).is_dir()
    }

    /// Claim a channel on the given chip
    pub fn new(chip: u32, channel: u32) -> Result<Self, PwmError> {
        let chip_dir = chip_dir(chip);
        if !chip_dir.is_dir() {
            return Err(PwmError::NotAvailable(format!(
                "{} does not exist",
                chip_dir.display()
            )));
        }

        let channel_dir = chip_dir.join(format!("pwm{}", channel));
        let exported_here = if channel_dir.is_dir() {
            false
        } else {
            write_sysfs(&chip_dir.join("export"), &channel.to_string())?;
            true
        };

        debug!(chip, channel, exported_here, "claimed sysfs PWM channel");
        Ok(Self {
            chip_dir,
            channel_dir,
            channel,
            exported_here,
        })
    }
}

impl PwmBackend for SysfsPwm {
    fn apply(&mut self, frequency_hz: u32, duty_percent: u32) -> Result<(), PwmError> {
        let period_ns = 1_000_000_000u64 / u64::from(frequency_hz.max(1));
        let duty_ns = period_ns * u64::from(duty_percent) / 100;

        // The kernel rejects period writes below the programmed duty
        // cycle, so the duty is zeroed before the period changes.
        write_sysfs(&self.channel_dir.join("duty_cycle"), "0")?;
        write_sysfs(&self.channel_dir.join("period"), &period_ns.to_string())?;
        write_sysfs(&self.channel_dir.join("duty_cycle"), &duty_ns.to_string())?;
        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PwmError> {
        let value = if enabled { "1" } else { "0" };
        write_sysfs(&self.channel_dir.join("enable"), value)
    }

    fn shutdown(&mut self) -> Result<(), PwmError> {
        self.set_enabled(false)?;
        if self.exported_here {
            write_sysfs(&self.chip_dir.join("unexport"), &self.channel.to_string())?;
            self.exported_here = false;
        }
        Ok(())
    }
}

fn chip_dir(chip: u32) -> PathBuf {
    PathBuf::from(format!("/sys/class/pwm/pwmchip{}", chip))
}

fn write_sysfs(path: &Path, value: &str) -> Result<(), PwmError> {
    fs::write(path, value).map_err(|e| PwmError::Io(format!("{}: {}", path.display(), e)))
}

/// Pick the hardware backend when present, otherwise the simulator
pub fn default_backend() -> Result<Box<dyn PwmBackend>, PwmError> {
    if SysfsPwm::is_available(pwm_defaults::SYSFS_CHIP) {
        let backend = SysfsPwm::new(pwm_defaults::SYSFS_CHIP, pwm_defaults::SYSFS_CHANNEL)?;
        Ok(Box::new(backend))
    } else {
        info!("no PWM chip found, using simulated illuminator");
        Ok(Box::new(SimulatedPwm::default()))
    }
}

/// Operator-facing illuminator state machine
pub struct PwmController {
    config: PwmConfig,
    backend: Box<dyn PwmBackend>,
    frequency_hz: u32,
    duty_percent: u32,
    enabled: bool,
    mode: PwmMode,
    released: bool,
}

impl PwmController {
    /// Build a controller over a backend, starting disabled in auto mode
    pub fn new(config: PwmConfig, backend: Box<dyn PwmBackend>) -> Result<Self, PwmError> {
        config.validate()?;
        Ok(Self {
            frequency_hz: config.frequency_hz,
            duty_percent: config.duty_percent,
            config,
            backend,
            enabled: false,
            mode: PwmMode::Auto,
            released: false,
        })
    }

    /// Currently programmed carrier frequency
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Currently programmed duty cycle
    pub fn duty_percent(&self) -> u32 {
        self.duty_percent
    }

    /// Whether the output signal is running
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current operating mode
    pub fn mode(&self) -> PwmMode {
        self.mode
    }

    /// Flip the output on or off, returning the new state
    pub fn toggle(&mut self) -> Result<bool, PwmError> {
        if self.enabled {
            self.backend.set_enabled(false)?;
            self.enabled = false;
            info!("illuminator disabled");
        } else {
            self.backend.apply(self.frequency_hz, self.duty_percent)?;
            self.backend.set_enabled(true)?;
            self.enabled = true;
            info!(
                frequency_hz = self.frequency_hz,
                duty_percent = self.duty_percent,
                "illuminator enabled"
            );
        }
        Ok(self.enabled)
    }

    /// Flip between automatic and manual mode, returning the new mode
    ///
    /// Returning to automatic mode restores the configured base values
    /// and reprograms the channel if the output is running.
    pub fn toggle_mode(&mut self) -> Result<PwmMode, PwmError> {
        self.mode = match self.mode {
            PwmMode::Auto => PwmMode::Manual,
            PwmMode::Manual => {
                self.frequency_hz = self.config.frequency_hz;
                self.duty_percent = self.config.duty_percent;
                if self.enabled {
                    self.backend.apply(self.frequency_hz, self.duty_percent)?;
                }
                PwmMode::Auto
            }
        };
        info!(mode = self.mode.display_name(), "illuminator mode switched");
        Ok(self.mode)
    }

    /// Adjust the carrier frequency, manual mode only
    ///
    /// The value is rounded to the nearest integer Hz and must fall in
    /// the configured range. Returns the applied value.
    pub fn set_frequency(&mut self, frequency_hz: f64) -> Result<u32, PwmError> {
        if self.mode == PwmMode::Auto {
            return Err(PwmError::AutoModeActive);
        }
        let rounded = frequency_hz.round();
        if rounded < f64::from(self.config.freq_min_hz)
            || rounded > f64::from(self.config.freq_max_hz)
        {
            return Err(PwmError::OutOfRange {
                name: "frequency",
                value: rounded as i64,
                min: self.config.freq_min_hz,
                max: self.config.freq_max_hz,
            });
        }

        self.frequency_hz = rounded as u32;
        if self.enabled {
            self.backend.apply(self.frequency_hz, self.duty_percent)?;
        }
        Ok(self.frequency_hz)
    }

    /// Adjust the duty cycle, manual mode only
    ///
    /// The value is rounded to the nearest integer percent and must
    /// fall in the configured range. Returns the applied value.
    pub fn set_duty(&mut self, duty_percent: f64) -> Result<u32, PwmError> {
        if self.mode == PwmMode::Auto {
            return Err(PwmError::AutoModeActive);
        }
        let rounded = duty_percent.round();
        if rounded < f64::from(self.config.duty_min) || rounded > f64::from(self.config.duty_max) {
            return Err(PwmError::OutOfRange {
                name: "duty",
                value: rounded as i64,
                min: self.config.duty_min,
                max: self.config.duty_max,
            });
        }

        self.duty_percent = rounded as u32;
        if self.enabled {
            self.backend.apply(self.frequency_hz, self.duty_percent)?;
        }
        Ok(self.duty_percent)
    }

    /// One-line status for operator displays
    pub fn status_line(&self) -> String {
        if self.enabled {
            format!(
                "PWM: {} Hz {} % ({})",
                self.frequency_hz,
                self.duty_percent,
                self.mode.display_name()
            )
        } else {
            format!("PWM: inactive (GPIO {})", self.config.pin)
        }
    }

    /// Stop the output and release the channel
    ///
    /// Safe to call more than once.
    pub fn stop(&mut self) -> Result<(), PwmError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        if self.enabled {
            self.backend.set_enabled(false)?;
            self.enabled = false;
        }
        self.backend.shutdown()
    }
}

impl Drop for PwmController {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = self.stop()
        {
            debug!(error = %e, "PWM shutdown during drop failed");
        }
    }
}
