//! Implementation of the --simulate option.
//!
//! Sets up a [`SimulatedTimeSource`] so the live countdown can be watched
//! across date rollovers without waiting for real time to pass. Start and end
//! times are read in the configured display time zone.

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use crate::config::DisplayZone;
use crate::time_source::{SimulatedTimeSource, parse_datetime_in};

/// Parse the simulation window and create the simulated clock.
///
/// The returned clock is also installed as the global time source, so log
/// lines carry simulated timestamps.
pub fn handle_simulate_command(
    start_time: &str,
    end_time: &str,
    multiplier: f64,
    zone: DisplayZone,
) -> Result<Arc<SimulatedTimeSource>> {
    let (start, end) = crate::with_display_zone!(zone, |tz| parse_window(
        start_time, end_time, &tz
    ))?;

    log_block_start!("Simulation Mode");
    log_indented!("Start: {start_time}");
    log_indented!("End:   {end_time}");
    if multiplier == 0.0 {
        log_indented!("Speed: fast-forward");
    } else {
        log_indented!("Speed: {multiplier}x real time");
    }

    let clock = Arc::new(SimulatedTimeSource::new(start, end, multiplier));
    crate::time_source::init_time_source(clock.clone());
    if let DisplayZone::Named(tz) = zone {
        crate::logger::Log::set_display_timezone(tz);
    }

    Ok(clock)
}

/// Parse `start` and `end` in `zone`, requiring the end to come after the start.
pub fn parse_window<Z: TimeZone>(
    start: &str,
    end: &str,
    zone: &Z,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = parse_datetime_in(start, zone)
        .map_err(|e| anyhow::anyhow!("Invalid start time: {e}"))?;
    let end =
        parse_datetime_in(end, zone).map_err(|e| anyhow::anyhow!("Invalid end time: {e}"))?;

    if end <= start {
        anyhow::bail!("End time must be after start time");
    }
    Ok((start, end))
}

/// Display detailed help for the simulate option
pub fn display_help() {
    log_version!();
    log_block_start!("--simulate - Run the live countdown on a simulated clock");
    log_block_start!("Usage: vaktul --simulate <start> <end> [multiplier] [--log FILE]");
    log_block_start!("Arguments:");
    log_indented!("<start>       \"YYYY-MM-DD HH:MM:SS\" in the configured time zone");
    log_indented!("<end>         \"YYYY-MM-DD HH:MM:SS\", after <start>");
    log_indented!("[multiplier]  Simulated seconds per real second (default: 3600)");
    log_indented!("              0 runs as fast as possible");
    log_block_start!("Examples:");
    log_indented!("vaktul --simulate \"2025-03-01 23:55:00\" \"2025-03-02 00:05:00\" 60");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_in_zone() {
        let (start, end) = parse_window(
            "2024-03-15 23:00:00",
            "2024-03-16 01:00:00",
            &chrono_tz::Europe::Oslo,
        )
        .unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 15, 22, 0, 0).unwrap());
        assert_eq!(end - start, chrono::Duration::hours(2));
    }

    #[test]
    fn test_parse_window_rejects_reversed_range() {
        assert!(parse_window("2024-03-16 00:00:00", "2024-03-15 00:00:00", &Utc).is_err());
        assert!(parse_window("2024-03-15 00:00:00", "2024-03-15 00:00:00", &Utc).is_err());
        assert!(parse_window("yesterday", "2024-03-15 00:00:00", &Utc).is_err());
    }
}
