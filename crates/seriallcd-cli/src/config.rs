//! Configuration management.

use anyhow::{Context, Result};
use seriallcd_hw::DEFAULT_BAUD_RATE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Serial port configuration
    #[serde(default)]
    pub serial: SerialConfig,
}

/// Serial port configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial port path
    #[serde(default = "default_device")]
    pub device: String,

    /// Baud rate (the display understands 2400, 9600 and 19200)
    #[serde(default = "default_baud")]
    pub baud: u32,

    /// Suppress the unsupported baud rate warning
    #[serde(default)]
    pub ignore_bad_baud: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            baud: default_baud(),
            ignore_bad_baud: false,
        }
    }
}

fn default_device() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud() -> u32 {
    DEFAULT_BAUD_RATE
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }
}
