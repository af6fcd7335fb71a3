//! Tick-driven schedule state machine.
//!
//! The engine starts `Uninitialized` and becomes `Ready` once a location is
//! selected. Every state change swaps in a new immutable [`ScheduleSnapshot`];
//! nothing inside a snapshot is ever mutated. A tick reads the injected clock,
//! recalculates the snapshot when the calendar date in the display time zone
//! has changed, and reports both countdowns.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::countdown::{format_countdown, remaining};
use super::{BoundaryKind, ScheduleBoundaries, ScheduleBoundary, derive};
use crate::constants::{DATE_FORMAT, TIME_FORMAT};
use crate::error::ScheduleError;
use crate::geo::{Location, SolarInstants, compute};
use crate::time_source::TimeSource;

/// Everything calculated for one location on one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSnapshot {
    pub location: Location,
    pub instants: SolarInstants,
    pub boundaries: ScheduleBoundaries,
}

impl ScheduleSnapshot {
    /// Calculate the solar instants and boundaries for `location` on `date`.
    pub fn calculate(location: Location, date: NaiveDate) -> Result<Self, ScheduleError> {
        let instants = compute(date, location.latitude(), location.longitude())?;
        let boundaries = derive(&instants);
        Ok(Self {
            location,
            instants,
            boundaries,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.instants.date
    }
}

#[derive(Debug, Clone)]
enum EngineState {
    Uninitialized,
    Ready(Arc<ScheduleSnapshot>),
}

/// Countdown state of one boundary for a single tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BoundaryReport {
    Counting {
        kind: BoundaryKind,
        /// Boundary instant in the display time zone
        instant: DateTime<FixedOffset>,
        /// Boundary clock time, `HH:MM:SS`
        time: String,
        /// Time left, `HH:MM:SS`
        countdown: String,
        remaining_secs: i64,
    },
    Unavailable {
        kind: BoundaryKind,
        reason: String,
    },
}

impl BoundaryReport {
    pub fn kind(&self) -> BoundaryKind {
        match self {
            BoundaryReport::Counting { kind, .. } | BoundaryReport::Unavailable { kind, .. } => {
                *kind
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, BoundaryReport::Counting { .. })
    }
}

/// What the presentation layer receives every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Current date, `DD.MM.YYYY`
    pub current_date: String,
    /// Current time, `HH:MM:SS`
    pub current_time: String,
    pub location: String,
    /// Calendar date the boundaries were calculated for
    pub schedule_date: NaiveDate,
    pub cutoff: BoundaryReport,
    pub start: BoundaryReport,
    /// True when this tick replaced the snapshot because the date changed
    pub recomputed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No location has been selected yet
    Idle,
    /// The countdowns were not updated this tick
    Skipped(ScheduleError),
    Updated(TickReport),
}

pub struct ScheduleEngine<Z: TimeZone> {
    zone: Z,
    clock: Arc<dyn TimeSource>,
    state: EngineState,
    last_tick: Option<DateTime<Utc>>,
}

impl<Z> ScheduleEngine<Z>
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    /// Create an engine that reads time from `clock` and displays it in `zone`.
    pub fn new(zone: Z, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            zone,
            clock,
            state: EngineState::Uninitialized,
            last_tick: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, EngineState::Ready(_))
    }

    /// The current snapshot, if a location has been selected.
    pub fn snapshot(&self) -> Option<Arc<ScheduleSnapshot>> {
        match &self.state {
            EngineState::Uninitialized => None,
            EngineState::Ready(snapshot) => Some(Arc::clone(snapshot)),
        }
    }

    pub fn zone(&self) -> &Z {
        &self.zone
    }

    fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.zone).date_naive()
    }

    /// Select a location and calculate its schedule for today.
    ///
    /// The previous snapshot and the clock skew reference are discarded.
    pub fn select_location(
        &mut self,
        location: Location,
    ) -> Result<Arc<ScheduleSnapshot>, ScheduleError> {
        let today = self.local_date(self.clock.now());
        let snapshot = Arc::new(ScheduleSnapshot::calculate(location, today)?);

        self.state = EngineState::Ready(Arc::clone(&snapshot));
        self.last_tick = None;
        Ok(snapshot)
    }

    /// Advance the engine to the current instant.
    pub fn tick(&mut self) -> TickOutcome {
        let mut snapshot = match &self.state {
            EngineState::Uninitialized => return TickOutcome::Idle,
            EngineState::Ready(snapshot) => Arc::clone(snapshot),
        };

        let now = self.clock.now();
        if let Some(previous) = self.last_tick
            && now < previous
        {
            // Count from the new reading on the next tick
            self.last_tick = Some(now);
            return TickOutcome::Skipped(ScheduleError::ClockSkew { previous, now });
        }
        self.last_tick = Some(now);

        let today = self.local_date(now);
        let recomputed = today != snapshot.date();
        if recomputed {
            match ScheduleSnapshot::calculate(snapshot.location.clone(), today) {
                Ok(fresh) => {
                    snapshot = Arc::new(fresh);
                    self.state = EngineState::Ready(Arc::clone(&snapshot));
                }
                Err(e) => return TickOutcome::Skipped(e),
            }
        }

        TickOutcome::Updated(self.report(&snapshot, now, recomputed))
    }

    fn report(&self, snapshot: &ScheduleSnapshot, now: DateTime<Utc>, recomputed: bool) -> TickReport {
        let now_local = now.with_timezone(&self.zone);

        TickReport {
            current_date: now_local.format(DATE_FORMAT).to_string(),
            current_time: now_local.format(TIME_FORMAT).to_string(),
            location: snapshot.location.name().to_string(),
            schedule_date: snapshot.date(),
            cutoff: self.boundary_report(BoundaryKind::Cutoff, &snapshot.boundaries.cutoff, now),
            start: self.boundary_report(BoundaryKind::Start, &snapshot.boundaries.start, now),
            recomputed,
        }
    }

    fn boundary_report(
        &self,
        kind: BoundaryKind,
        boundary: &Result<ScheduleBoundary, ScheduleError>,
        now: DateTime<Utc>,
    ) -> BoundaryReport {
        match boundary {
            Ok(boundary) => {
                let left = remaining(&now, &boundary.instant);
                let instant = boundary.instant.with_timezone(&self.zone);
                BoundaryReport::Counting {
                    kind,
                    time: instant.format(TIME_FORMAT).to_string(),
                    instant: instant.fixed_offset(),
                    countdown: format_countdown(left),
                    remaining_secs: left.num_seconds(),
                }
            }
            Err(e) => BoundaryReport::Unavailable {
                kind,
                reason: e.to_string(),
            },
        }
    }
}
