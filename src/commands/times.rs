//! Implementation of the `times` command.
//!
//! Prints the solar instants and the derived boundaries for one location and
//! date, without starting the live countdown.

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone};
use std::fmt::Display;

use super::Session;
use crate::args::GlobalOptions;
use crate::constants::{DATE_FORMAT, TIME_FORMAT};
use crate::error::ScheduleError;
use crate::geo::display::format_event;
use crate::geo::{Location, log_solar_debug_info};
use crate::schedule::{BoundaryKind, ScheduleBoundary, ScheduleSnapshot};

/// Handle `vaktul times [--date YYYY-MM-DD]`.
pub fn handle_times_command(options: &GlobalOptions, date: Option<&str>) -> Result<()> {
    let session = Session::prepare(options)?;

    crate::with_display_zone!(session.zone, |tz| {
        let date = match date {
            Some(text) => parse_date(text)?,
            None => crate::time_source::now().with_timezone(&tz).date_naive(),
        };
        print_times(&session.location, date, &tz, options)
    })
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{text}'. Use YYYY-MM-DD"))
}

fn format_boundary<Z>(boundary: &Result<ScheduleBoundary, ScheduleError>, zone: &Z) -> String
where
    Z: TimeZone,
    Z::Offset: Display,
{
    match boundary {
        Ok(b) => b.instant.with_timezone(zone).format(TIME_FORMAT).to_string(),
        Err(_) => "unavailable".to_string(),
    }
}

fn print_times<Z>(
    location: &Location,
    date: NaiveDate,
    zone: &Z,
    options: &GlobalOptions,
) -> Result<()>
where
    Z: TimeZone,
    Z::Offset: Display,
{
    let snapshot = ScheduleSnapshot::calculate(location.clone(), date)?;
    let boundaries = &snapshot.boundaries;

    if options.json {
        let value = serde_json::json!({
            "location": location,
            "date": date,
            "night_end": snapshot.instants.night_end.as_ref().ok(),
            "sunset": snapshot.instants.sunset.as_ref().ok(),
            "cutoff": boundaries.cutoff.as_ref().ok().map(|b| b.instant),
            "start": boundaries.start.as_ref().ok().map(|b| b.instant),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    log_version!();
    log_block_start!(
        "{} ({}) on {}",
        location.name(),
        location.coordinates_display(),
        date.format(DATE_FORMAT)
    );
    let rows = [
        (
            "Night end".to_string(),
            format_event(&snapshot.instants.night_end, zone),
        ),
        (
            BoundaryKind::Cutoff.to_string(),
            format_boundary(&boundaries.cutoff, zone),
        ),
        (
            "Sunset".to_string(),
            format_event(&snapshot.instants.sunset, zone),
        ),
        (
            BoundaryKind::Start.to_string(),
            format_boundary(&boundaries.start, zone),
        ),
    ];
    for (label, value) in rows {
        log_indented!("{:<17} {value}", format!("{label}:"));
    }

    if options.debug_enabled {
        log_solar_debug_info(location, &snapshot.instants, zone);
    }

    log_end!();
    Ok(())
}

/// Display detailed help for the times command
pub fn display_help() {
    log_version!();
    log_block_start!("times - Print the sahur and iftar times for one date");
    log_block_start!("Usage: vaktul times [--date YYYY-MM-DD] [--city NAME] [--json]");
    log_block_start!("Options:");
    log_indented!("--date <date>  Date to calculate for (default: today)");
    log_indented!("--city <name>  Location to calculate for (default: configured)");
    log_indented!("--json         Print the instants as JSON in UTC");
    log_indented!("--debug        Also print the intermediate solar geometry");
    log_block_start!("Examples:");
    log_indented!("vaktul times --date 2025-03-01 --city Oslo");
    log_end!();
}
