//! Core application logic and the live countdown loop.
//!
//! This module encapsulates the main loop of vaktul. It owns the
//! [`ScheduleEngine`] and drives it once per second, handling:
//!
//! - Ticking the engine and presenting each report
//! - Location changes requested from the terminal
//! - Shutdown signals
//! - Logging date rollovers and skipped ticks
//!
//! Messages are applied strictly between ticks, so a tick always sees a
//! consistent location, instants and boundaries.

pub mod output;

use anyhow::Result;
use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::TimeZone;

use crate::constants::{SIGNAL_POLL_INTERVAL, TICK_INTERVAL};
use crate::error::ScheduleError;
use crate::geo::{Location, LocationRegistry};
use crate::schedule::{ScheduleEngine, ScheduleSnapshot, TickOutcome};
use crate::signals::{SignalMessage, SignalState};
use crate::time_source::TimeSource;
use output::ReportSink;

/// Parameters for creating a Core instance.
pub struct CoreParams<Z: TimeZone> {
    pub zone: Z,
    pub clock: Arc<dyn TimeSource>,
    pub registry: LocationRegistry,
    pub initial_location: Location,
    pub signal_state: SignalState,
    pub sink: Box<dyn ReportSink>,
    pub debug_enabled: bool,
}

/// Owns the engine and everything the live loop reacts to.
pub struct Core<Z: TimeZone> {
    engine: ScheduleEngine<Z>,
    clock: Arc<dyn TimeSource>,
    registry: LocationRegistry,
    initial_location: Location,
    signal_state: SignalState,
    sink: Box<dyn ReportSink>,
    debug_enabled: bool,
    ticks: u64,
}

impl<Z> Core<Z>
where
    Z: TimeZone,
    Z::Offset: Display,
{
    pub fn new(params: CoreParams<Z>) -> Self {
        Self {
            engine: ScheduleEngine::new(params.zone, Arc::clone(&params.clock)),
            clock: params.clock,
            registry: params.registry,
            initial_location: params.initial_location,
            signal_state: params.signal_state,
            sink: params.sink,
            debug_enabled: params.debug_enabled,
            ticks: 0,
        }
    }

    /// Select the initial location and run until shutdown or the end of a
    /// simulation. Returns the number of ticks that produced a report.
    pub fn execute(mut self) -> Result<u64> {
        let location = self.initial_location.clone();
        self.select(location)?;

        self.main_loop()?;

        self.sink.finish()?;
        log_block_start!("Shutting down vaktul...");
        log_end!();
        Ok(self.ticks)
    }

    fn main_loop(&mut self) -> Result<()> {
        while self.signal_state.is_running() && !self.clock.is_ended() {
            self.tick()?;

            if let Some(message) = self.wait_for_message() {
                self.handle_signal_message(message)?;
            }
        }

        Ok(())
    }

    fn tick(&mut self) -> Result<()> {
        match self.engine.tick() {
            TickOutcome::Idle => {}
            TickOutcome::Skipped(error) => {
                self.sink.skipped(&error)?;
                self.sink.interrupt()?;
                log_pipe!();
                match error {
                    ScheduleError::ClockSkew { .. } => {
                        log_warning!("Skipped one update: {error}");
                    }
                    _ => log_error!("Failed to recalculate schedule: {error}"),
                }
            }
            TickOutcome::Updated(report) => {
                if report.recomputed {
                    self.sink.interrupt()?;
                    log_block_start!("New day, schedule recalculated for {}", report.current_date);
                    if let Some(snapshot) = self.engine.snapshot() {
                        self.log_snapshot(&snapshot);
                    }
                }
                self.sink.present(&report)?;
                self.ticks += 1;
            }
        }
        Ok(())
    }

    /// Wait one tick interval for a message.
    ///
    /// Simulated clocks are advanced by sleeping on them, with pending
    /// messages checked afterwards. Real time waits on the channel directly so
    /// that a message wakes the loop immediately.
    fn wait_for_message(&self) -> Option<SignalMessage> {
        let receiver = &self.signal_state.signal_receiver;
        if self.clock.is_simulated() {
            self.clock.sleep(TICK_INTERVAL);
            return receiver.try_recv().ok();
        }

        let started = std::time::Instant::now();
        loop {
            let left = TICK_INTERVAL.saturating_sub(started.elapsed());
            if left == Duration::ZERO || !self.signal_state.is_running() {
                return None;
            }
            if let Ok(message) = receiver.recv_timeout(left.min(SIGNAL_POLL_INTERVAL)) {
                return Some(message);
            }
        }
    }

    fn handle_signal_message(&mut self, message: SignalMessage) -> Result<()> {
        match message {
            SignalMessage::Shutdown => {
                self.signal_state.running.store(false, Ordering::SeqCst);
            }
            SignalMessage::SelectLocation(name) => {
                self.sink.interrupt()?;
                match self.registry.find(&name).cloned() {
                    Some(location) => self.select(location)?,
                    None => {
                        log_pipe!();
                        log_warning!("Unknown location '{name}'");
                        log_indented!("Available: {}", self.registry.names());
                    }
                }
            }
        }
        Ok(())
    }

    fn select(&mut self, location: Location) -> Result<()> {
        self.sink.interrupt()?;
        let snapshot = self.engine.select_location(location)?;
        log_block_start!(
            "Location: {} ({})",
            snapshot.location.name(),
            snapshot.location.coordinates_display()
        );
        self.log_snapshot(&snapshot);
        Ok(())
    }

    fn log_snapshot(&self, snapshot: &ScheduleSnapshot) {
        let zone = self.engine.zone();
        let night_end = crate::geo::display::format_event(&snapshot.instants.night_end, zone);
        let sunset = crate::geo::display::format_event(&snapshot.instants.sunset, zone);
        log_indented!("Night end {night_end}, sunset {sunset}");

        for boundary in [&snapshot.boundaries.cutoff, &snapshot.boundaries.start] {
            if let Err(e) = boundary {
                log_warning!("{e}");
            }
        }

        if self.debug_enabled {
            crate::geo::log_solar_debug_info(&snapshot.location, &snapshot.instants, zone);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::TickReport;
    use crate::time_source::SimulatedTimeSource;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Collects reports so the test can inspect them after the loop ends.
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<TickReport>>>);

    impl ReportSink for Recorder {
        fn present(&mut self, report: &TickReport) -> Result<()> {
            self.0.lock().unwrap().push(report.clone());
            Ok(())
        }
    }

    fn core_for(
        clock: Arc<dyn TimeSource>,
        signal_state: SignalState,
        recorder: Recorder,
    ) -> Core<Utc> {
        let registry = LocationRegistry::builtin();
        let initial_location = registry.default_location().clone();
        Core::new(CoreParams {
            zone: Utc,
            clock,
            registry,
            initial_location,
            signal_state,
            sink: Box::new(recorder),
            debug_enabled: false,
        })
    }

    #[test]
    fn test_simulation_runs_until_end_and_rolls_over() {
        crate::logger::Log::set_enabled(false);
        let start = Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 50).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 10).unwrap();
        let clock = Arc::new(SimulatedTimeSource::new(start, end, 0.0));
        let recorder = Recorder::default();

        let ticks = core_for(clock, SignalState::detached(), recorder.clone())
            .execute()
            .unwrap();

        let reports = recorder.0.lock().unwrap();
        assert_eq!(ticks as usize, reports.len());
        assert_eq!(reports.len(), 20);
        assert_eq!(reports.iter().filter(|r| r.recomputed).count(), 1);
        assert_eq!(reports.first().unwrap().current_date, "15.03.2024");
        assert_eq!(reports.last().unwrap().current_date, "16.03.2024");
    }

    #[test]
    fn test_location_change_applies_between_ticks() {
        crate::logger::Log::set_enabled(false);
        let start = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let end = start + chrono::Duration::seconds(3);
        let clock = Arc::new(SimulatedTimeSource::new(start, end, 0.0));
        let recorder = Recorder::default();

        let signal_state = SignalState::detached();
        let sender = signal_state.signal_sender.clone();
        sender
            .send(SignalMessage::SelectLocation("oslo".to_string()))
            .unwrap();
        sender
            .send(SignalMessage::SelectLocation("Atlantis".to_string()))
            .unwrap();

        core_for(clock, signal_state, recorder.clone())
            .execute()
            .unwrap();

        let locations: Vec<String> = recorder
            .0
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.location.clone())
            .collect();
        assert_eq!(locations, vec!["Grimstad", "Oslo", "Oslo"]);
    }

    #[test]
    fn test_shutdown_message_stops_loop() {
        crate::logger::Log::set_enabled(false);
        let start = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let end = start + chrono::Duration::hours(1);
        let clock = Arc::new(SimulatedTimeSource::new(start, end, 0.0));
        let recorder = Recorder::default();

        let signal_state = SignalState::detached();
        signal_state
            .signal_sender
            .send(SignalMessage::Shutdown)
            .unwrap();

        let ticks = core_for(clock, signal_state, recorder).execute().unwrap();
        assert_eq!(ticks, 1);
    }

    #[test]
    fn test_simulated_wait_advances_one_tick() {
        let start = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let end = start + chrono::Duration::hours(1);
        let clock = Arc::new(SimulatedTimeSource::new(start, end, 0.0));
        let signal_state = SignalState::detached();
        let sender = signal_state.signal_sender.clone();
        let core = core_for(clock.clone(), signal_state, Recorder::default());

        assert_eq!(core.wait_for_message(), None);
        assert_eq!(clock.now(), start + chrono::Duration::seconds(1));

        sender.send(SignalMessage::Shutdown).unwrap();
        assert_eq!(core.wait_for_message(), Some(SignalMessage::Shutdown));
        assert_eq!(clock.now(), start + chrono::Duration::seconds(2));
    }
}
