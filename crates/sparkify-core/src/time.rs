//! Shared timestamp decomposition for the time dimension and songplay facts.
//!
//! Log events carry `ts` as epoch milliseconds. The calendar parts are
//! computed in one [`TimeBasis`] per run so the `time` table and the
//! songplay `month`/`year` partitions always agree.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clock used to turn an epoch instant into calendar parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeBasis {
    /// Coordinated Universal Time (default)
    #[default]
    Utc,
    /// The host's local time zone; results vary with the machine's TZ setting
    Local,
}

impl fmt::Display for TimeBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBasis::Utc => write!(f, "utc"),
            TimeBasis::Local => write!(f, "local"),
        }
    }
}

/// Calendar parts of one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeParts {
    pub hour: i32,
    /// Day of month, 1-31
    pub day: i32,
    /// ISO-8601 week of year, 1-53
    pub week: i32,
    pub month: i32,
    pub year: i32,
    /// ISO day index, 1 = Monday through 7 = Sunday
    pub weekday: i32,
}

impl TimeParts {
    fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            hour: dt.hour() as i32,
            day: dt.day() as i32,
            week: dt.iso_week().week() as i32,
            month: dt.month() as i32,
            year: dt.year(),
            weekday: dt.weekday().number_from_monday() as i32,
        }
    }
}

/// Decompose an epoch-milliseconds value into calendar parts.
///
/// Returns `None` when the instant is outside the representable range.
pub fn decompose(ts_millis: i64, basis: TimeBasis) -> Option<TimeParts> {
    let utc = start_time(ts_millis)?;
    let parts = match basis {
        TimeBasis::Utc => TimeParts::from_datetime(&utc),
        TimeBasis::Local => TimeParts::from_datetime(&utc.with_timezone(&Local)),
    };
    Some(parts)
}

/// Whole epoch seconds, rounding toward negative infinity.
pub fn epoch_seconds(ts_millis: i64) -> i64 {
    ts_millis.div_euclid(1000)
}

/// The instant an event started, from epoch milliseconds.
pub fn start_time(ts_millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ts_millis)
}

#[cfg(test)]
#[path = "time_test.rs"]
mod tests;
