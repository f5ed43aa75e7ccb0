use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::{
    availability::AvailabilityError,
    clock::{self, parse_wall_clock},
};

/// Operating window of one business on one day of the week.
///
/// `day_of_week` runs from 0 (Sunday) to 6 (Saturday). When `is_closed` is
/// set the open and close times are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdaySchedule {
    pub day_of_week: i16,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
}

impl WeekdaySchedule {
    /// An open day running from `open` to `close`.
    pub fn open(day_of_week: i16, open: NaiveTime, close: NaiveTime) -> Self {
        Self {
            day_of_week,
            open_time: Some(open),
            close_time: Some(close),
            is_closed: false,
        }
    }

    pub fn closed(day_of_week: i16) -> Self {
        Self {
            day_of_week,
            open_time: None,
            close_time: None,
            is_closed: true,
        }
    }

    /// Builds a schedule from the textual times a record store hands back.
    pub fn from_strings(
        day_of_week: i16,
        open_time: Option<&str>,
        close_time: Option<&str>,
        is_closed: bool,
    ) -> Result<Self, AvailabilityError> {
        Ok(Self {
            day_of_week,
            open_time: open_time.map(parse_wall_clock).transpose()?,
            close_time: close_time.map(parse_wall_clock).transpose()?,
            is_closed,
        })
    }

    pub fn opens_at(&self) -> NaiveTime {
        self.open_time.unwrap_or_else(clock::default_open_time)
    }

    pub fn closes_at(&self) -> NaiveTime {
        self.close_time.unwrap_or_else(clock::default_close_time)
    }
}
