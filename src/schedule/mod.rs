//! Daily fasting boundaries and the countdowns towards them.
//!
//! - [`derive`]: turn solar instants into the cutoff and start boundaries
//! - [`countdown`]: time remaining until a boundary, with single-day wraparound
//! - [`engine`]: the tick-driven state machine that ties everything together

pub mod countdown;
pub mod engine;

pub use countdown::{format_countdown, remaining};
pub use engine::{BoundaryReport, ScheduleEngine, ScheduleSnapshot, TickOutcome, TickReport};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

use crate::constants::{CUTOFF_MARGIN_MINUTES, START_MARGIN_MINUTES};
use crate::error::ScheduleError;
use crate::geo::SolarInstants;

/// Which of the two daily boundaries a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Pre-dawn cutoff (sahur), night end minus the cutoff margin
    Cutoff,
    /// Post-sunset start (iftar), sunset plus the start margin
    Start,
}

impl BoundaryKind {
    /// Signed offset applied to the underlying solar event.
    pub fn margin(self) -> Duration {
        match self {
            BoundaryKind::Cutoff => -Duration::minutes(CUTOFF_MARGIN_MINUTES),
            BoundaryKind::Start => Duration::minutes(START_MARGIN_MINUTES),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BoundaryKind::Cutoff => "Sahur",
            BoundaryKind::Start => "Iftar",
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.margin().num_minutes();
        write!(f, "{} ({minutes:+} min)", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleBoundary {
    pub kind: BoundaryKind,
    pub instant: DateTime<Utc>,
}

/// Both boundaries for one day. Each one is unavailable on its own when its
/// solar event does not happen.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleBoundaries {
    pub cutoff: Result<ScheduleBoundary, ScheduleError>,
    pub start: Result<ScheduleBoundary, ScheduleError>,
}

fn boundary(
    kind: BoundaryKind,
    event: &Result<DateTime<Utc>, ScheduleError>,
) -> Result<ScheduleBoundary, ScheduleError> {
    event.clone().map(|instant| ScheduleBoundary {
        kind,
        instant: instant + kind.margin(),
    })
}

/// Apply the fixed safety margins to a day's solar instants.
pub fn derive(instants: &SolarInstants) -> ScheduleBoundaries {
    ScheduleBoundaries {
        cutoff: boundary(BoundaryKind::Cutoff, &instants.night_end),
        start: boundary(BoundaryKind::Start, &instants.sunset),
    }
}
