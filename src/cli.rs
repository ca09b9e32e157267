/// CLI argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::AppConfig;

// Build timestamp injected at compile time
pub const VERSION_WITH_BUILD: &str =
    concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Parser)]
#[command(name = "oled-stats")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/oled-stats/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Command-line values that take precedence over the config file
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Sampling interval in whole seconds, e.g. "3s" or "1m"
    #[arg(short, long, global = true, value_parser = parse_interval)]
    pub interval: Option<Duration>,

    /// Network interface shown on the IP line
    #[arg(long, global = true)]
    pub interface: Option<String>,

    /// I2C bus device
    #[arg(long, global = true)]
    pub bus: Option<String>,

    /// SSD1306 I2C address, decimal or 0x-prefixed hex
    #[arg(long, global = true, value_parser = parse_address)]
    pub address: Option<u8>,

    /// Character columns on the panel
    #[arg(long, global = true)]
    pub width: Option<usize>,
}

impl Overrides {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(interval) = self.interval {
            config.update_interval_secs = interval.as_secs();
        }
        if let Some(interface) = &self.interface {
            config.network_interface = interface.clone();
        }
        if let Some(bus) = &self.bus {
            config.i2c_bus = bus.clone();
        }
        if let Some(address) = self.address {
            config.i2c_address = address;
        }
        if let Some(width) = self.width {
            config.display_length = width;
        }
    }
}

pub fn parse_address(value: &str) -> Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid I2C address '{}': {}", value, e))
}

/// Parse a human-readable interval, rejecting zero and fractional seconds
pub fn parse_interval(value: &str) -> Result<Duration, String> {
    let interval = humantime::parse_duration(value)
        .map_err(|e| format!("invalid interval '{}': {}", value, e))?;

    if interval.subsec_nanos() != 0 {
        return Err(format!("interval '{}' must be a whole number of seconds", value));
    }
    if interval.is_zero() {
        return Err("interval must be at least 1s".to_string());
    }
    Ok(interval)
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the display agent (default)
    Run,

    /// Sample once and print the panel lines to stdout
    Print {
        /// Show a column ruler above the lines
        #[arg(short, long)]
        ruler: bool,

        /// Print the raw stats as JSON instead
        #[arg(long, conflicts_with = "ruler")]
        json: bool,
    },

    /// Blank the panel and switch it off
    Clear,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the config file location
    Path,
}
