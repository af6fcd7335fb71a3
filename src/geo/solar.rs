//! Astronomical calculations for night end and sunset.
//!
//! Solar events are found with the classic J2000 approach: pick the Julian
//! cycle whose transit falls on the requested calendar date, derive the sun's
//! mean anomaly, ecliptic longitude and declination at that transit, and then
//! solve the hour angle at which the sun crosses a given altitude.
//!
//! All angles are kept in radians internally. Degree constants are converted
//! at the point of use.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use std::f64::consts::PI;

use crate::constants::*;
use crate::error::{PolarCondition, ScheduleError, SolarEventKind};
use crate::geo::validate_coordinates;

/// Outcome of a single solar event lookup.
pub type EventTime = Result<DateTime<Utc>, ScheduleError>;

/// The two solar instants a schedule is built from, for one date and location.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarInstants {
    /// Calendar date these instants were calculated for
    pub date: NaiveDate,
    /// Last moment of full darkness before dawn (sun at -18°)
    pub night_end: EventTime,
    /// Evening crossing of the horizon (sun at 0°)
    pub sunset: EventTime,
}

/// Intermediate solar quantities for a date, exposed for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarGeometry {
    pub day_of_year: u32,
    /// Julian day of the approximate transit
    pub julian_day: f64,
    /// Mean anomaly in radians
    pub mean_anomaly: f64,
    /// Ecliptic longitude in radians
    pub ecliptic_longitude: f64,
    /// Declination in radians
    pub declination: f64,
    /// Equation of time correction at transit, in minutes
    pub equation_of_time_minutes: f64,
    /// Julian cycle number
    cycle: f64,
}

impl SolarGeometry {
    pub fn declination_degrees(&self) -> f64 {
        self.declination.to_degrees()
    }

    pub fn mean_anomaly_degrees(&self) -> f64 {
        self.mean_anomaly.to_degrees().rem_euclid(360.0)
    }
}

fn rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Julian day for a UTC instant.
fn to_julian(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / (SECONDS_PER_DAY * 1000.0) - 0.5 + J1970
}

/// UTC instant for a Julian day, rounded to the millisecond.
fn from_julian(julian: f64) -> Option<DateTime<Utc>> {
    let millis = ((julian + 0.5 - J1970) * SECONDS_PER_DAY * 1000.0).round();
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

fn solar_mean_anomaly(days: f64) -> f64 {
    rad(357.5291 + 0.985_600_28 * days)
}

fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    let m = mean_anomaly;
    let center = rad(1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin());
    m + center + rad(EARTH_PERIHELION_DEG) + PI
}

fn declination(ecliptic_longitude: f64) -> f64 {
    (rad(EARTH_OBLIQUITY_DEG).sin() * ecliptic_longitude.sin()).asin()
}

/// Equation of time correction in days.
fn equation_of_time(mean_anomaly: f64, ecliptic_longitude: f64) -> f64 {
    0.0053 * mean_anomaly.sin() - 0.0069 * (2.0 * ecliptic_longitude).sin()
}

fn approx_transit(hour_angle: f64, lw: f64, cycle: f64) -> f64 {
    J0 + (hour_angle + lw) / (2.0 * PI) + cycle
}

/// Compute the solar geometry at the transit that belongs to `date` at `longitude`.
///
/// The cycle is anchored at 12:00 UTC of the date, which keeps the chosen
/// transit on that calendar date for every longitude.
pub fn solar_geometry(date: NaiveDate, longitude: f64) -> SolarGeometry {
    let lw = rad(-longitude);
    let noon_utc = date.and_time(NaiveTime::MIN).and_utc() + chrono::Duration::hours(12);
    let days = to_julian(noon_utc) - J2000;

    let cycle = (days - J0 - lw / (2.0 * PI)).round();
    let transit_days = approx_transit(0.0, lw, cycle);

    let mean_anomaly = solar_mean_anomaly(transit_days);
    let ecliptic_longitude = ecliptic_longitude(mean_anomaly);

    SolarGeometry {
        day_of_year: date.ordinal(),
        julian_day: J2000 + transit_days,
        mean_anomaly,
        ecliptic_longitude,
        declination: declination(ecliptic_longitude),
        equation_of_time_minutes: equation_of_time(mean_anomaly, ecliptic_longitude)
            * SECONDS_PER_DAY
            / 60.0,
        cycle,
    }
}

/// Solve the hour angle at which the sun reaches `altitude` (radians).
///
/// Returns the polar condition when the sun never reaches that altitude on the date.
fn hour_angle(altitude: f64, phi: f64, declination: f64) -> Result<f64, PolarCondition> {
    let cos_h =
        (altitude.sin() - phi.sin() * declination.sin()) / (phi.cos() * declination.cos());

    // Above 1: even the noon altitude misses the target. Below -1: even midnight clears it.
    if cos_h.is_nan() || cos_h > 1.0 {
        return Err(PolarCondition::AlwaysBelow);
    }
    if cos_h < -1.0 {
        return Err(PolarCondition::AlwaysAbove);
    }

    Ok(cos_h.clamp(-1.0, 1.0).acos())
}

/// Julian days of the morning and evening crossings of `altitude_deg`.
fn crossing_julians(
    geometry: &SolarGeometry,
    latitude: f64,
    longitude: f64,
    altitude_deg: f64,
) -> Result<(f64, f64), PolarCondition> {
    let lw = rad(-longitude);
    let phi = rad(latitude);
    let m = geometry.mean_anomaly;
    let l = geometry.ecliptic_longitude;

    let w = hour_angle(rad(altitude_deg), phi, geometry.declination)?;

    let noon = J2000 + approx_transit(0.0, lw, geometry.cycle) + equation_of_time(m, l);
    let set = J2000 + approx_transit(w, lw, geometry.cycle) + equation_of_time(m, l);
    let rise = noon - (set - noon);

    Ok((rise, set))
}

fn event_time(
    crossing: Result<f64, PolarCondition>,
    event: SolarEventKind,
    date: NaiveDate,
) -> EventTime {
    let julian = crossing.map_err(|condition| ScheduleError::NoSolarEventOnDate {
        event,
        date,
        condition,
    })?;
    from_julian(julian).ok_or(ScheduleError::InstantOutOfRange { event, date })
}

/// Compute night end and sunset for `date` at the given coordinates.
///
/// Fails only for out-of-range coordinates. Events that do not happen on the
/// date (polar day or night) are reported individually inside the result.
pub fn compute(
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
) -> Result<SolarInstants, ScheduleError> {
    validate_coordinates(latitude, longitude)?;

    let geometry = solar_geometry(date, longitude);

    let night_end = crossing_julians(&geometry, latitude, longitude, NIGHT_END_ALTITUDE_DEG)
        .map(|(rise, _)| rise);
    let sunset =
        crossing_julians(&geometry, latitude, longitude, SUNSET_ALTITUDE_DEG).map(|(_, set)| set);

    Ok(SolarInstants {
        date,
        night_end: event_time(night_end, SolarEventKind::NightEnd, date),
        sunset: event_time(sunset, SolarEventKind::Sunset, date),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_julian_round_trip_is_millisecond_exact() {
        let instant = DateTime::from_timestamp_millis(1_710_500_000_123).unwrap();
        assert_eq!(from_julian(to_julian(instant)), Some(instant));
    }

    #[test]
    fn test_j2000_epoch() {
        let epoch = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc();
        assert!((to_julian(epoch) - J2000).abs() < 1e-9);
    }

    #[test]
    fn test_geometry_declination_follows_seasons() {
        let june = solar_geometry(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(), 0.0);
        let december = solar_geometry(NaiveDate::from_ymd_opt(2024, 12, 21).unwrap(), 0.0);
        let march = solar_geometry(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(), 0.0);

        assert!((june.declination_degrees() - 23.44).abs() < 0.2);
        assert!((december.declination_degrees() + 23.44).abs() < 0.2);
        assert!(march.declination_degrees().abs() < 1.0);
        assert_eq!(june.day_of_year, 173);
    }

    #[test]
    fn test_equation_of_time_magnitude() {
        // Early November the sun runs about 16 minutes fast
        let november = solar_geometry(NaiveDate::from_ymd_opt(2024, 11, 3).unwrap(), 0.0);
        assert!(november.equation_of_time_minutes.abs() > 14.0);
        assert!(november.equation_of_time_minutes.abs() < 18.0);
    }

    #[test]
    fn test_transit_stays_on_requested_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        for longitude in [-179.0, -120.0, -45.0, 0.0, 8.5771, 90.0, 179.0] {
            let geometry = solar_geometry(date, longitude);
            let transit = from_julian(geometry.julian_day).unwrap();
            let local_mean_noon =
                date.and_hms_opt(12, 0, 0).unwrap().and_utc() - chrono::Duration::seconds(
                    (longitude / 360.0 * SECONDS_PER_DAY) as i64,
                );
            let offset = (transit - local_mean_noon).num_minutes().abs();
            assert!(offset < 30, "transit drifted {offset} min at lon {longitude}");
        }
    }

    #[test]
    fn test_hour_angle_reports_polar_conditions() {
        let phi = rad(78.0);
        let summer_declination = rad(23.0);
        let winter_declination = rad(-23.0);

        assert_eq!(
            hour_angle(rad(0.0), phi, summer_declination),
            Err(PolarCondition::AlwaysAbove)
        );
        assert_eq!(
            hour_angle(rad(0.0), phi, winter_declination),
            Err(PolarCondition::AlwaysBelow)
        );
        assert!(hour_angle(rad(0.0), rad(45.0), summer_declination).is_ok());
    }

    #[test]
    fn test_poles_do_not_produce_nan() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let north = compute(date, 90.0, 0.0).unwrap();
        assert!(matches!(
            north.sunset,
            Err(ScheduleError::NoSolarEventOnDate {
                condition: PolarCondition::AlwaysAbove,
                ..
            })
        ));

        let south = compute(date, -90.0, 0.0).unwrap();
        assert!(matches!(
            south.sunset,
            Err(ScheduleError::NoSolarEventOnDate {
                condition: PolarCondition::AlwaysBelow,
                ..
            })
        ));
    }

    #[test]
    fn test_unrepresentable_instant_is_not_a_polar_condition() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            event_time(Ok(f64::INFINITY), SolarEventKind::Sunset, date),
            Err(ScheduleError::InstantOutOfRange {
                event: SolarEventKind::Sunset,
                date,
            })
        );
        assert_eq!(
            event_time(
                Err(PolarCondition::AlwaysAbove),
                SolarEventKind::NightEnd,
                date
            ),
            Err(ScheduleError::NoSolarEventOnDate {
                event: SolarEventKind::NightEnd,
                date,
                condition: PolarCondition::AlwaysAbove,
            })
        );
    }
}
