/// Application configuration management
/// Stores agent settings in ~/.config/oled-stats/config.toml

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::{
    DEFAULT_DISPLAY_LENGTH, DEFAULT_FONT, DEFAULT_I2C_ADDRESS, DEFAULT_I2C_BUS,
    DEFAULT_NETWORK_INTERFACE, DEFAULT_THERMAL_ZONE, DEFAULT_UPDATE_INTERVAL_SECS, OLED_HEIGHT,
    OLED_WIDTH,
};
use crate::widgets::font_by_name;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Character columns available on the panel
    pub display_length: usize,
    pub update_interval_secs: u64,
    pub network_interface: String,
    pub oled_width: u32,
    pub oled_height: u32,
    pub i2c_bus: String,
    pub i2c_address: u8,
    pub font: String,
    /// Sysfs file holding the SoC temperature in millidegrees
    pub thermal_zone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            display_length: DEFAULT_DISPLAY_LENGTH,
            update_interval_secs: DEFAULT_UPDATE_INTERVAL_SECS,
            network_interface: DEFAULT_NETWORK_INTERFACE.to_string(),
            oled_width: OLED_WIDTH,
            oled_height: OLED_HEIGHT,
            i2c_bus: DEFAULT_I2C_BUS.to_string(),
            i2c_address: DEFAULT_I2C_ADDRESS,
            font: DEFAULT_FONT.to_string(),
            thermal_zone: DEFAULT_THERMAL_ZONE.to_string(),
        }
    }
}

impl AppConfig {
    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("oled-stats");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    /// Reject settings the agent cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.display_length == 0 {
            bail!("display_length must be at least 1");
        }
        if self.update_interval_secs == 0 {
            bail!("update_interval_secs must be at least 1");
        }
        if (self.oled_width, self.oled_height) != (OLED_WIDTH, OLED_HEIGHT) {
            bail!(
                "Unsupported panel size {}x{} (only {}x{} is supported)",
                self.oled_width,
                self.oled_height,
                OLED_WIDTH,
                OLED_HEIGHT
            );
        }
        if font_by_name(&self.font).is_none() {
            bail!("Unknown font '{}'", self.font);
        }
        if self.network_interface.trim().is_empty() {
            bail!("network_interface must not be empty");
        }
        Ok(())
    }
}
