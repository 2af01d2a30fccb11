use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::models::ClockResponse;

/// snapshot
///
/// Formats `now` for the clock endpoint: the calendar date as seen in `tz`
/// (e.g. "February 20, 2026") and the wall clock time in both `tz` and UTC.
pub fn snapshot(now: DateTime<Utc>, tz: Tz) -> ClockResponse {
    let local = now.with_timezone(&tz);
    ClockResponse {
        date: local.format("%B %d, %Y").to_string(),
        time_local: local.format("%H:%M:%S").to_string(),
        time_utc: now.format("%H:%M:%S").to_string(),
        timezone: tz.name().to_string(),
    }
}
