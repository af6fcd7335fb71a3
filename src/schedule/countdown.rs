//! Time remaining until a boundary.
//!
//! A boundary that has already passed today is counted towards the same
//! clock time tomorrow by adding a single day. The engine recalculates the
//! boundaries when the date changes, so one wrap is always enough; a boundary
//! that is still in the past after one wrap is stale and counts as zero.

use chrono::{DateTime, Duration, TimeZone};

/// Non-negative time from `now` until `boundary`.
pub fn remaining<A: TimeZone, B: TimeZone>(now: &DateTime<A>, boundary: &DateTime<B>) -> Duration {
    let diff = boundary.clone().signed_duration_since(now.clone());
    if diff >= Duration::zero() {
        return diff;
    }

    let wrapped = diff + Duration::days(1);
    wrapped.max(Duration::zero())
}

/// Render a duration as `HH:MM:SS`, truncating sub-second remainders.
///
/// Hours are not wrapped, so durations of a day or more still read correctly.
pub fn format_countdown(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
