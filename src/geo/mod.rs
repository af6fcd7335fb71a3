//! Geographic locations and solar event calculations.
//!
//! ## Module Structure
//!
//! - [`solar`]: Night end and sunset calculation from first principles
//! - [`registry`]: The fixed set of selectable locations loaded from configuration
//! - [`display`]: Debug output for solar calculations
//!
//! Locations are immutable values. Anything that holds a [`Location`] has
//! already passed coordinate validation.

pub mod display;
pub mod registry;
pub mod solar;

pub use display::log_solar_debug_info;
pub use registry::LocationRegistry;
pub use solar::{SolarInstants, compute};

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::error::ScheduleError;

/// Check that a latitude/longitude pair lies within the valid ranges.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ScheduleError> {
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);
    if valid {
        Ok(())
    } else {
        Err(ScheduleError::InvalidCoordinates {
            latitude,
            longitude,
        })
    }
}

/// A named point on the globe that schedules are calculated for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    name: String,
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Create a location, rejecting coordinates outside the valid ranges.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self, ScheduleError> {
        validate_coordinates(latitude, longitude)?;

        Ok(Self {
            name: name.into(),
            latitude,
            longitude,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Compact coordinate string such as `58.3309°N, 8.5771°E`.
    pub fn coordinates_display(&self) -> String {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        format!(
            "{:.4}°{ns}, {:.4}°{ew}",
            self.latitude.abs(),
            self.longitude.abs()
        )
    }
}
