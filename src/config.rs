//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::protocol::thresholds::{ENABLE_FLAG_COUNT, MAX_THRESHOLDS};
use crate::units;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub serial: SerialConfig,
    pub stream: StreamConfig,
    pub thresholds: ThresholdConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,
}

/// Stream polling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StreamConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Threshold table applied at startup
#[derive(Debug, Deserialize, Clone)]
pub struct ThresholdConfig {
    /// Threshold angles in degrees; empty leaves the peripheral's table
    /// untouched
    #[serde(default)]
    pub degrees: Vec<f64>,

    /// Per-slot arm flags, exactly one per table slot
    #[serde(default = "default_enable_flags")]
    pub enabled: Vec<bool>,
}

// Default value functions
fn default_serial_port() -> String {
    "/dev/ttyACM0".to_string()
}
fn default_poll_interval_ms() -> u64 {
    50
}
fn default_enable_flags() -> Vec<bool> {
    vec![false; ENABLE_FLAG_COUNT]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialConfig {
                port: default_serial_port(),
            },
            stream: StreamConfig {
                poll_interval_ms: default_poll_interval_ms(),
            },
            thresholds: ThresholdConfig {
                degrees: vec![],
                enabled: default_enable_flags(),
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rotary_link::config::Config;
    ///
    /// let config = Config::load("rotary-link.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            toml::de::Error::custom(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        // Validate serial port configuration
        if self.serial.port.is_empty() {
            return Err(crate::error::RotaryLinkError::Config(
                toml::de::Error::custom("serial port cannot be empty"),
            ));
        }

        // Validate polling cadence
        if self.stream.poll_interval_ms == 0 || self.stream.poll_interval_ms > 1000 {
            return Err(crate::error::RotaryLinkError::Config(
                toml::de::Error::custom("poll_interval_ms must be between 1 and 1000"),
            ));
        }

        // Validate threshold configuration
        if self.thresholds.enabled.len() != ENABLE_FLAG_COUNT {
            return Err(crate::error::RotaryLinkError::Config(toml::de::Error::custom(
                format!(
                    "thresholds.enabled must list exactly {} flags, one per slot",
                    ENABLE_FLAG_COUNT
                ),
            )));
        }

        if self.thresholds.degrees.len() > MAX_THRESHOLDS {
            return Err(crate::error::RotaryLinkError::Config(toml::de::Error::custom(
                format!(
                    "thresholds.degrees lists {} angles; the peripheral stores at most {}",
                    self.thresholds.degrees.len(),
                    MAX_THRESHOLDS
                ),
            )));
        }

        for &degrees in &self.thresholds.degrees {
            if units::degrees_to_ticks(degrees).is_err() {
                return Err(crate::error::RotaryLinkError::Config(toml::de::Error::custom(
                    format!("threshold angle {degrees} cannot be encoded as a 16-bit tick"),
                )));
            }
        }

        Ok(())
    }
}
