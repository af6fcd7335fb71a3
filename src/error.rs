//! Recoverable schedule errors.
//!
//! None of these are fatal to a running engine: an invalid location is rejected
//! before it is selected, a missing or unrepresentable solar event only disables the boundary that
//! depends on it, and clock skew only skips a single tick.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// Which solar event a computation was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarEventKind {
    NightEnd,
    Sunset,
}

impl fmt::Display for SolarEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolarEventKind::NightEnd => write!(f, "night end"),
            SolarEventKind::Sunset => write!(f, "sunset"),
        }
    }
}

/// Why a solar event does not occur on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarCondition {
    /// The sun never drops below the event altitude (midnight sun, white nights).
    AlwaysAbove,
    /// The sun never climbs above the event altitude (polar night).
    AlwaysBelow,
}

impl fmt::Display for PolarCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolarCondition::AlwaysAbove => write!(f, "the sun stays above the event altitude"),
            PolarCondition::AlwaysBelow => write!(f, "the sun stays below the event altitude"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error(
        "invalid coordinates: latitude {latitude} must be within -90..=90 and longitude {longitude} within -180..=180"
    )]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("no {event} on {date}: {condition}")]
    NoSolarEventOnDate {
        event: SolarEventKind,
        date: NaiveDate,
        condition: PolarCondition,
    },

    #[error("{event} on {date} falls outside the representable time range")]
    InstantOutOfRange { event: SolarEventKind, date: NaiveDate },

    #[error("clock moved backward from {previous} to {now}")]
    ClockSkew {
        previous: DateTime<Utc>,
        now: DateTime<Utc>,
    },
}
