//! Application constants and default values for vaktul.
//!
//! This module contains the fixed schedule policy, astronomical parameters,
//! configuration defaults and operational constants used throughout the application.

use std::time::Duration as StdDuration;

// ═══ Schedule Policy ═══
// Safety margins applied to the raw solar events. These are fixed policy values.

pub const CUTOFF_MARGIN_MINUTES: i64 = 20; // Sahur ends this long before night end
pub const START_MARGIN_MINUTES: i64 = 5; // Iftar starts this long after sunset

// ═══ Astronomical Parameters ═══
// Sun altitudes (degrees) that define each solar event

pub const SUNSET_ALTITUDE_DEG: f64 = 0.0; // Centre of the solar disc on the horizon
pub const NIGHT_END_ALTITUDE_DEG: f64 = -18.0; // Astronomical twilight

pub const J1970: f64 = 2_440_588.0; // Julian day of the Unix epoch at noon
pub const J2000: f64 = 2_451_545.0; // Julian day of 2000-01-01 12:00 UTC
pub const J0: f64 = 0.0009; // Transit offset of the Julian cycle
pub const EARTH_OBLIQUITY_DEG: f64 = 23.4397;
pub const EARTH_PERIHELION_DEG: f64 = 102.9372;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

// ═══ Runtime ═══

pub const TICK_INTERVAL: StdDuration = StdDuration::from_secs(1); // Countdown refresh cadence
pub const SIGNAL_POLL_INTERVAL: StdDuration = StdDuration::from_millis(50);
pub const DEFAULT_SIMULATION_MULTIPLIER: f64 = 3600.0; // One simulated hour per real second

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const CONFIG_DIR_NAME: &str = "vaktul";
pub const CONFIG_FILE_NAME: &str = "vaktul.toml";
pub const DEFAULT_LOCATION: &str = "Grimstad";
pub const DEFAULT_TIMEZONE: &str = "local"; // Use the host time zone for display

/// Built-in location registry written to a freshly created configuration.
pub const DEFAULT_LOCATIONS: &[(&str, f64, f64)] = &[
    ("Grimstad", 58.33092, 8.5771),
    ("Oslo", 59.911491, 10.757933),
    ("Tromsø", 69.6489, 18.95508),
    ("Skien", 59.20962, 9.60897),
    ("Porsgrunn", 59.14054, 9.6561),
    ("Drammen", 59.74389, 10.20449),
];

// ═══ Display Formats ═══

pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const TIME_FORMAT: &str = "%H:%M:%S";

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure

// ═══ Test Constants ═══
// Common values used in tests for consistency
#[cfg(test)]
pub mod test_constants {
    pub const TEST_GRIMSTAD_LAT: f64 = 58.33092;
    pub const TEST_GRIMSTAD_LON: f64 = 8.5771;
    pub const TEST_SVALBARD_LAT: f64 = 78.0;
    pub const TEST_SVALBARD_LON: f64 = 15.0;
}
