//! Command-line command handlers for vaktul.
//!
//! Each one-shot command lives in its own submodule. They share
//! [`Session`], the configuration and location resolved from the global
//! options.

pub mod help;
pub mod list;
pub mod simulate;
pub mod times;

use anyhow::Result;

use crate::args::GlobalOptions;
use crate::config::{Config, DisplayZone};
use crate::geo::{Location, LocationRegistry};

/// Configuration, registry and selected location for one invocation.
pub struct Session {
    pub config: Config,
    pub registry: LocationRegistry,
    pub location: Location,
    pub zone: DisplayZone,
}

impl Session {
    /// Load configuration and resolve the location to start with.
    ///
    /// `--city` overrides the configured location.
    pub fn prepare(options: &GlobalOptions) -> Result<Self> {
        let config = Config::load()?;
        let registry = LocationRegistry::from_config(&config)?;
        let zone = config.display_zone()?;

        let location = match options.city.as_deref() {
            Some(name) => match registry.find(name) {
                Some(location) => location.clone(),
                None => anyhow::bail!(
                    "Unknown location '{name}'. Available: {}",
                    registry.names()
                ),
            },
            None => registry.default_location().clone(),
        };

        Ok(Self {
            config,
            registry,
            location,
            zone,
        })
    }
}

/// Call a generic function with the concrete time zone behind a [`DisplayZone`].
#[macro_export]
macro_rules! with_display_zone {
    ($zone:expr, |$tz:ident| $body:expr) => {
        match $zone {
            $crate::config::DisplayZone::Local => {
                let $tz = chrono::Local;
                $body
            }
            $crate::config::DisplayZone::Named(named) => {
                let $tz = named;
                $body
            }
        }
    };
}
