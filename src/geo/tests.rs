use super::*;
use crate::constants::test_constants::*;
use crate::error::{PolarCondition, SolarEventKind};
use crate::schedule::{derive, remaining};
use chrono::{Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Difference from an expected UTC clock time, in seconds.
fn seconds_off(instant: chrono::DateTime<Utc>, h: u32, m: u32, s: u32) -> i64 {
    let expected = Utc
        .with_ymd_and_hms(instant.year(), instant.month(), instant.day(), h, m, s)
        .unwrap();
    (instant - expected).num_seconds().abs()
}

#[test]
fn test_grimstad_instants() {
    let instants = compute(date(2024, 3, 15), TEST_GRIMSTAD_LAT, TEST_GRIMSTAD_LON).unwrap();

    let night_end = instants.night_end.clone().unwrap();
    let sunset = instants.sunset.clone().unwrap();

    // Reference values from an independent evaluation of the same algorithm
    assert!(seconds_off(night_end, 3, 27, 15) <= 60, "night end {night_end}");
    assert!(seconds_off(sunset, 17, 22, 55) <= 60, "sunset {sunset}");
    assert_eq!(night_end.date_naive(), date(2024, 3, 15));
    assert_eq!(sunset.date_naive(), date(2024, 3, 15));
}

#[test]
fn test_grimstad_boundaries_and_countdown() {
    let instants = compute(date(2024, 3, 15), TEST_GRIMSTAD_LAT, TEST_GRIMSTAD_LON).unwrap();
    let boundaries = derive(&instants);

    let night_end = instants.night_end.unwrap();
    let sunset = instants.sunset.unwrap();
    let cutoff = boundaries.cutoff.unwrap().instant;
    let start = boundaries.start.unwrap().instant;

    assert_eq!(cutoff, night_end - Duration::minutes(20));
    assert_eq!(start, sunset + Duration::minutes(5));
    assert_eq!(
        remaining(&(cutoff - Duration::minutes(10)), &cutoff),
        Duration::minutes(10)
    );
}

#[test]
fn test_svalbard_midsummer_has_no_night_end() {
    let instants = compute(date(2024, 6, 21), TEST_SVALBARD_LAT, TEST_SVALBARD_LON).unwrap();

    assert_eq!(
        instants.night_end,
        Err(ScheduleError::NoSolarEventOnDate {
            event: SolarEventKind::NightEnd,
            date: date(2024, 6, 21),
            condition: PolarCondition::AlwaysAbove,
        })
    );
    assert!(matches!(
        instants.sunset,
        Err(ScheduleError::NoSolarEventOnDate {
            event: SolarEventKind::Sunset,
            condition: PolarCondition::AlwaysAbove,
            ..
        })
    ));
}

#[test]
fn test_svalbard_polar_night_has_no_sunset() {
    let instants = compute(date(2024, 12, 21), TEST_SVALBARD_LAT, TEST_SVALBARD_LON).unwrap();
    assert!(matches!(
        instants.sunset,
        Err(ScheduleError::NoSolarEventOnDate {
            condition: PolarCondition::AlwaysBelow,
            ..
        })
    ));
}

#[test]
fn test_tromso_keeps_sunset_without_night_end_in_may() {
    // Astronomical night disappears weeks before the midnight sun starts
    let instants = compute(date(2024, 5, 1), 69.6489, 18.95508).unwrap();
    assert!(instants.night_end.is_err());
    assert!(instants.sunset.is_ok());
}

#[test]
fn test_invalid_coordinates_are_rejected() {
    assert_eq!(
        compute(date(2024, 3, 15), 95.0, 0.0),
        Err(ScheduleError::InvalidCoordinates {
            latitude: 95.0,
            longitude: 0.0
        })
    );
    assert!(compute(date(2024, 3, 15), 0.0, 200.0).is_err());
    assert!(compute(date(2024, 3, 15), f64::NAN, 0.0).is_err());
}

#[test]
fn test_western_longitude_stays_on_date() {
    // Los Angeles: the UTC date of sunset rolls over, night end must not
    let instants = compute(date(2024, 3, 15), 34.05, -118.24).unwrap();
    let night_end = instants.night_end.unwrap();
    let sunset = instants.sunset.unwrap();
    assert!(night_end < sunset);
    assert!((sunset - night_end) < Duration::hours(24));
    assert!(night_end.hour() >= 10 && night_end.hour() <= 13, "{night_end}");
}

#[test]
fn test_location_validation() {
    let oslo = Location::new("Oslo", 59.911491, 10.757933).unwrap();
    assert_eq!(oslo.name(), "Oslo");
    assert_eq!(oslo.coordinates_display(), "59.9115°N, 10.7579°E");

    let south_west = Location::new("Lima", -12.0464, -77.0428).unwrap();
    assert_eq!(south_west.coordinates_display(), "12.0464°S, 77.0428°W");

    assert!(Location::new("Nowhere", -91.0, 0.0).is_err());
    assert!(Location::new("Nowhere", 0.0, f64::INFINITY).is_err());
}

#[test]
fn test_registry_lookup_is_case_insensitive() {
    let registry = LocationRegistry::builtin();
    assert_eq!(registry.len(), 6);
    assert_eq!(registry.default_location().name(), "Grimstad");
    assert_eq!(registry.find("tromsø").map(Location::name), Some("Tromsø"));
    assert_eq!(registry.find("  DRAMMEN ").map(Location::name), Some("Drammen"));
    assert!(registry.find("Bergen").is_none());
}

#[test]
fn test_registry_from_config_selects_default() {
    let config = crate::config::Config {
        location: Some("skien".to_string()),
        ..Default::default()
    };
    let registry = LocationRegistry::from_config(&config).unwrap();
    assert_eq!(registry.default_location().name(), "Skien");

    let config = crate::config::Config {
        location: Some("Bergen".to_string()),
        ..Default::default()
    };
    assert!(LocationRegistry::from_config(&config).is_err());
}
