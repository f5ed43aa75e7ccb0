//! Wall-clock helpers for a single nominal day.
//!
//! Every time-of-day handled by the scheduler is projected onto the same
//! reference day and expressed as seconds past its midnight. Spans that run
//! beyond midnight simply carry an offset larger than one day, so no date
//! boundary can ever be crossed by accident.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::availability::AvailabilityError;

pub const SECONDS_PER_MINUTE: i64 = 60;

/// Opening time used when a business has not configured one.
pub const DEFAULT_OPEN_SECONDS: i64 = 9 * 3600;

/// Closing time used when a business has not configured one.
pub const DEFAULT_CLOSE_SECONDS: i64 = 17 * 3600;

const ACCEPTED_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// A half-open `[start, end)` span on the reference day, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlotInterval {
    pub start: i64,
    pub end: i64,
}

impl SlotInterval {
    pub fn starting_at(start: i64, duration_minutes: i64) -> Self {
        Self {
            start,
            end: start.saturating_add(duration_minutes.saturating_mul(SECONDS_PER_MINUTE)),
        }
    }

    /// Two spans overlap iff each starts before the other ends. Touching
    /// endpoints do not overlap.
    pub fn overlaps(&self, other: &SlotInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Parses `HH:MM` or `HH:MM:SS` into a wall-clock time.
pub fn parse_wall_clock(value: &str) -> Result<NaiveTime, AvailabilityError> {
    let trimmed = value.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| AvailabilityError::InvalidTimeFormat(value.to_string()))
}

/// Renders a wall-clock time as `HH:MM`, dropping seconds.
pub fn format_wall_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Seconds past midnight on the reference day.
pub fn seconds_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight())
}

/// Drops any seconds from an offset, keeping the whole minute it falls in.
pub fn floor_to_minute(seconds: i64) -> i64 {
    seconds - seconds.rem_euclid(SECONDS_PER_MINUTE)
}

/// Converts an offset on the reference day back into a time-of-day.
///
/// Returns `None` for offsets outside `[0, 24h)`.
pub fn time_of_day(seconds: i64) -> Option<NaiveTime> {
    let seconds = u32::try_from(seconds).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
}

pub fn default_open_time() -> NaiveTime {
    time_of_day(DEFAULT_OPEN_SECONDS).unwrap_or_default()
}

pub fn default_close_time() -> NaiveTime {
    time_of_day(DEFAULT_CLOSE_SECONDS).unwrap_or_default()
}

/// Day-of-week number used by business hours: 0 = Sunday .. 6 = Saturday.
pub fn weekday_number(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// Serde adapter that writes a `NaiveTime` as `HH:MM` and reads either
/// `HH:MM` or `HH:MM:SS`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_wall_clock(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_wall_clock(&raw).map_err(de::Error::custom)
    }
}
