//! Configuration system for vaktul.
//!
//! The configuration lives in `vaktul.toml`, found under the XDG config
//! directory (`$XDG_CONFIG_HOME/vaktul/vaktul.toml`) or in a directory passed
//! with `--config`. A commented default file is written on first load.
//!
//! ## Configuration Structure
//!
//! ```toml
//! #[Selection]
//! location = "Grimstad" # Location selected at startup
//! timezone = "local"    # "local" or an IANA name such as "Europe/Oslo"
//!
//! #[Locations]
//! [[locations]]
//! name = "Grimstad"
//! latitude = 58.33092
//! longitude = 8.5771
//! ```
//!
//! Every field is optional. Without `[[locations]]` the built-in registry is
//! used, and without `location` the first registry entry is selected.
//!
//! ## Module Structure
//!
//! - [`loading`]: Locating, reading and parsing the configuration file
//! - [`validation`]: Rejecting configurations the engine cannot run with
//! - [`builder`]: Writing the commented default configuration

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod loading;
pub mod validation;

pub use builder::create_default_config;
pub use loading::{get_config_path, load, load_from_path, set_config_dir};

use crate::constants::DEFAULT_TIMEZONE;

#[cfg(test)]
mod tests;

/// One entry of the location registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the location selected at startup
    pub location: Option<String>,
    /// `"local"` for the host time zone, otherwise an IANA zone name
    pub timezone: Option<String>,
    pub locations: Option<Vec<LocationEntry>>,
}

/// The time zone countdowns and dates are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    /// The host's local time zone
    Local,
    Named(Tz),
}

impl DisplayZone {
    /// Parse `"local"` (any case) or an IANA zone name.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case(DEFAULT_TIMEZONE) {
            return Ok(DisplayZone::Local);
        }
        value
            .parse::<Tz>()
            .map(DisplayZone::Named)
            .map_err(|e| anyhow::anyhow!("Unknown timezone '{value}': {e}"))
    }

    pub fn name(&self) -> String {
        match self {
            DisplayZone::Local => DEFAULT_TIMEZONE.to_string(),
            DisplayZone::Named(tz) => tz.name().to_string(),
        }
    }
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// The configured display time zone.
    pub fn display_zone(&self) -> Result<DisplayZone> {
        DisplayZone::parse(self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE))
            .context("Invalid 'timezone' setting")
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");
        match &self.location {
            Some(name) => log_indented!("Location: {name}"),
            None => log_indented!("Location: first registry entry"),
        }
        log_indented!(
            "Timezone: {}",
            self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
        );
        match &self.locations {
            Some(entries) => log_indented!("Registry: {} configured locations", entries.len()),
            None => log_indented!("Registry: built-in locations"),
        }
    }
}
