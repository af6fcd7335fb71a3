//! Display and formatting utilities for the geo module.
//!
//! Renders solar instants and the intermediate solar geometry in the display
//! time zone, for the `times` command and `--debug` output.

use chrono::TimeZone;
use std::fmt::Display;

use super::Location;
use super::solar::{EventTime, SolarInstants, solar_geometry};
use crate::constants::TIME_FORMAT;
use crate::error::ScheduleError;
use crate::schedule::derive;

/// Format an event as `HH:MM:SS` in `zone`, or explain why it is missing.
pub fn format_event<Z>(event: &EventTime, zone: &Z) -> String
where
    Z: TimeZone,
    Z::Offset: Display,
{
    match event {
        Ok(instant) => instant.with_timezone(zone).format(TIME_FORMAT).to_string(),
        Err(ScheduleError::NoSolarEventOnDate { condition, .. }) => {
            format!("none ({condition})")
        }
        Err(e) => format!("unavailable ({e})"),
    }
}

/// Log the solar calculation behind `instants` in detail.
///
/// Shows the intermediate geometry (mean anomaly, declination, equation of
/// time), both solar events in local time and UTC, and the derived boundaries.
pub fn log_solar_debug_info<Z>(location: &Location, instants: &SolarInstants, zone: &Z)
where
    Z: TimeZone,
    Z::Offset: Display,
{
    let date = instants.date;
    let geometry = solar_geometry(date, location.longitude());

    log_block_start!(
        "Solar calculation for {} ({}) on {}",
        location.name(),
        location.coordinates_display(),
        date
    );
    log_indented!("Day of year:      {}", geometry.day_of_year);
    log_indented!("Transit (JD):     {:.5}", geometry.julian_day);
    log_indented!("Mean anomaly:     {:.4}°", geometry.mean_anomaly_degrees());
    log_indented!("Declination:      {:+.4}°", geometry.declination_degrees());
    log_indented!(
        "Equation of time: {:+.2} min",
        geometry.equation_of_time_minutes
    );

    log_block_start!("Solar events");
    for (label, event) in [("Night end", &instants.night_end), ("Sunset", &instants.sunset)] {
        match event {
            Ok(instant) => log_indented!(
                "{label:<10} {} ({} UTC)",
                format_event(event, zone),
                instant.format(TIME_FORMAT)
            ),
            Err(_) => log_indented!("{label:<10} {}", format_event(event, zone)),
        }
    }

    let boundaries = derive(instants);
    log_block_start!("Boundaries");
    for boundary in [&boundaries.cutoff, &boundaries.start] {
        match boundary {
            Ok(b) => log_indented!(
                "{}: {}",
                b.kind,
                b.instant.with_timezone(zone).format(TIME_FORMAT)
            ),
            Err(e) => log_indented!("unavailable: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PolarCondition, SolarEventKind};
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_format_event_in_zone() {
        let event: EventTime = Ok(Utc.with_ymd_and_hms(2024, 3, 15, 17, 22, 55).unwrap());
        assert_eq!(format_event(&event, &Utc), "17:22:55");
        assert_eq!(format_event(&event, &chrono_tz::Europe::Oslo), "18:22:55");
    }

    #[test]
    fn test_format_missing_event() {
        let event: EventTime = Err(ScheduleError::NoSolarEventOnDate {
            event: SolarEventKind::NightEnd,
            date: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
            condition: PolarCondition::AlwaysAbove,
        });
        assert_eq!(
            format_event(&event, &Utc),
            "none (the sun stays above the event altitude)"
        );
    }

    #[test]
    fn test_debug_info_uses_given_instants() {
        crate::logger::Log::set_enabled(false);
        let location = Location::new("Longyearbyen", 78.2232, 15.6267).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();
        // Hand-made instants that differ from what the location would produce
        let instants = SolarInstants {
            date,
            night_end: Ok(Utc.with_ymd_and_hms(2024, 12, 21, 5, 0, 0).unwrap()),
            sunset: Err(ScheduleError::NoSolarEventOnDate {
                event: SolarEventKind::Sunset,
                date,
                condition: PolarCondition::AlwaysBelow,
            }),
        };

        let before = instants.clone();
        log_solar_debug_info(&location, &instants, &chrono_tz::Arctic::Longyearbyen);
        assert_eq!(instants, before);
    }
}
