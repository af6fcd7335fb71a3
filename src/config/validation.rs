//! Configuration validation functionality.
//!
//! Rejects configurations that would leave the engine without a usable
//! location: bad coordinates, an empty or ambiguous registry, a selected
//! location that does not exist, or an unknown time zone.

use anyhow::{Context, Result};
use std::collections::HashSet;

use super::{Config, DisplayZone, LocationEntry};
use crate::geo::registry::builtin_entries;
use crate::geo::validate_coordinates;

/// Comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(tz) = config.timezone.as_deref() {
        DisplayZone::parse(tz).context("Invalid 'timezone' setting")?;
    }

    let builtin;
    let entries: &[LocationEntry] = match &config.locations {
        Some(entries) => entries,
        None => {
            builtin = builtin_entries();
            &builtin
        }
    };

    if entries.is_empty() {
        anyhow::bail!("At least one [[locations]] entry is required");
    }

    let mut seen = HashSet::new();
    for entry in entries {
        let name = entry.name.trim();
        if name.is_empty() {
            anyhow::bail!("Location names must not be empty");
        }

        validate_coordinates(entry.latitude, entry.longitude)
            .with_context(|| format!("Invalid coordinates for location '{name}'"))?;

        if !seen.insert(name.to_lowercase()) {
            anyhow::bail!("Duplicate location name '{name}' (names are case-insensitive)");
        }
    }

    if let Some(selected) = config.location.as_deref()
        && !seen.contains(&selected.trim().to_lowercase())
    {
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        anyhow::bail!(
            "Selected location '{selected}' is not defined. Available: {}",
            names.join(", ")
        );
    }

    Ok(())
}
