//! Daemon configuration.
//!
//! One TOML file (default `/etc/enclosure/enclosure.toml`) loaded once at
//! startup; nothing is re-read while running. Validation happens here and
//! is fatal before the control loop starts — the rest of the system
//! assumes a well-formed profile and outlet map.
//!
//! The MAX/MIN ordering of the profile thresholds is deliberately NOT
//! checked: an inverted band simply behaves like the numbers say it does.
//! Outlet index collisions, on the other hand, would make two roles
//! clobber each other's relay, so those are rejected at load.

use core::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::pins;

/// Top-level config file contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub daemon: DaemonConfig,
    pub profile: Profile,
    pub outlets: OutletMap,
    #[serde(default)]
    pub pins: PinConfig,
}

/// Paths and cadences for the side activities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Directory receiving the numbered timelapse images.
    pub images_dir: PathBuf,
    /// Append-only raw-reading log, one line per accepted sample.
    pub air_data_log: PathBuf,
    /// Seconds between timelapse captures.
    #[serde(default = "default_capture_interval")]
    pub capture_interval_secs: u64,
    /// SCD30 measurement interval in seconds (2 – 1800).
    #[serde(default = "default_sample_interval")]
    pub sample_interval_secs: u16,
}

fn default_capture_interval() -> u64 {
    60
}

fn default_sample_interval() -> u16 {
    2
}

/// Target climate profile: eight integer thresholds.
///
/// `light_*` are hours of day in [0,24); the rest are plain sensor units
/// (ppm, percent RH, °C). `co2_min` has no effect on the current policy
/// (the fan has no CO2 release) but remains part of every profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Profile {
    pub co2_max: i32,
    pub co2_min: i32,
    pub hum_max: i32,
    pub hum_min: i32,
    pub temp_max: i32,
    pub temp_min: i32,
    pub light_max: u8,
    pub light_min: u8,
}

/// Which bit of the shift register each outlet role is plugged into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OutletMap {
    pub humidifier: u8,
    pub heater: u8,
    pub light: u8,
    pub fan: u8,
}

impl OutletMap {
    fn roles(&self) -> [(&'static str, u8); 4] {
        [
            ("humidifier", self.humidifier),
            ("heater", self.heater),
            ("light", self.light),
            ("fan", self.fan),
        ]
    }
}

/// BCM pin numbers for the shift-register lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PinConfig {
    #[serde(default = "default_sr_data")]
    pub sr_data: u8,
    #[serde(default = "default_sr_clock")]
    pub sr_clock: u8,
    #[serde(default = "default_sr_latch")]
    pub sr_latch: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            sr_data: pins::SR_DATA,
            sr_clock: pins::SR_CLOCK,
            sr_latch: pins::SR_LATCH,
        }
    }
}

fn default_sr_data() -> u8 {
    pins::SR_DATA
}

fn default_sr_clock() -> u8 {
    pins::SR_CLOCK
}

fn default_sr_latch() -> u8 {
    pins::SR_LATCH
}

/// Validation failures. All fatal at startup.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An outlet role points past the 8-bit register.
    OutletIndexOutOfRange { role: &'static str, index: u8 },
    /// Two roles share a register bit and would clobber each other.
    DuplicateOutletIndex { index: u8 },
    /// A light schedule hour is not in [0,24).
    LightHourOutOfRange { field: &'static str, value: u8 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutletIndexOutOfRange { role, index } => {
                write!(f, "outlet '{role}' index {index} is out of range (0-7)")
            }
            Self::DuplicateOutletIndex { index } => {
                write!(f, "two outlets are mapped to register bit {index}")
            }
            Self::LightHourOutOfRange { field, value } => {
                write!(f, "{field} = {value} is not a valid hour (0-23)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Read, parse and validate the config file.
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Structural checks beyond what serde can express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: u8 = 0;
        for (role, index) in self.outlets.roles() {
            if index > 7 {
                return Err(ConfigError::OutletIndexOutOfRange { role, index });
            }
            let mask = 1u8 << index;
            if seen & mask != 0 {
                return Err(ConfigError::DuplicateOutletIndex { index });
            }
            seen |= mask;
        }
        for (field, value) in [
            ("light_min", self.profile.light_min),
            ("light_max", self.profile.light_max),
        ] {
            if value >= 24 {
                return Err(ConfigError::LightHourOutOfRange { field, value });
            }
        }
        Ok(())
    }
}
