//! The fixed set of selectable locations.
//!
//! The registry is built once from configuration and never changes while the
//! application runs. Lookups are case-insensitive so that `oslo` typed on the
//! terminal selects `Oslo`.

use anyhow::{Context, Result};

use super::Location;
use crate::config::{Config, LocationEntry};
use crate::constants::DEFAULT_LOCATIONS;

#[derive(Debug, Clone)]
pub struct LocationRegistry {
    locations: Vec<Location>,
    default_index: usize,
}

impl LocationRegistry {
    /// Build the registry from a validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let entries: Vec<LocationEntry> = match &config.locations {
            Some(entries) => entries.clone(),
            None => builtin_entries(),
        };

        let locations = entries
            .iter()
            .map(|entry| {
                Location::new(entry.name.trim(), entry.latitude, entry.longitude)
                    .with_context(|| format!("Invalid location '{}'", entry.name))
            })
            .collect::<Result<Vec<_>>>()?;

        if locations.is_empty() {
            anyhow::bail!("The location registry is empty");
        }

        let default_index = match config.location.as_deref() {
            Some(name) => position(&locations, name)
                .with_context(|| format!("Selected location '{name}' is not in the registry"))?,
            None => 0,
        };

        Ok(Self {
            locations,
            default_index,
        })
    }

    /// The built-in registry, used when no configuration is available.
    pub fn builtin() -> Self {
        let locations = DEFAULT_LOCATIONS
            .iter()
            .filter_map(|(name, lat, lon)| Location::new(*name, *lat, *lon).ok())
            .collect();
        Self {
            locations,
            default_index: 0,
        }
    }

    /// Find a location by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Location> {
        position(&self.locations, name).map(|i| &self.locations[i])
    }

    /// The location selected when the application starts.
    pub fn default_location(&self) -> &Location {
        &self.locations[self.default_index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Comma-separated list of names, for error messages.
    pub fn names(&self) -> String {
        self.locations
            .iter()
            .map(Location::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn position(locations: &[Location], name: &str) -> Option<usize> {
    let wanted = name.trim().to_lowercase();
    locations
        .iter()
        .position(|location| location.name().to_lowercase() == wanted)
}

/// Registry entries written into a freshly generated configuration.
pub fn builtin_entries() -> Vec<LocationEntry> {
    DEFAULT_LOCATIONS
        .iter()
        .map(|(name, latitude, longitude)| LocationEntry {
            name: (*name).to_string(),
            latitude: *latitude,
            longitude: *longitude,
        })
        .collect()
}
