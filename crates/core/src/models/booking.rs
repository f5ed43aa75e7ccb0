use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::{availability::AvailabilityError, clock::parse_wall_clock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub business_id: Uuid,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A booking already occupying a business's day, as seen by the slot scan.
///
/// `duration_minutes` is the joined service duration; `None` when the
/// service record has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingBooking {
    pub start_time: NaiveTime,
    pub duration_minutes: Option<i64>,
}

impl ExistingBooking {
    pub fn new(start_time: NaiveTime, duration_minutes: i64) -> Self {
        Self {
            start_time,
            duration_minutes: Some(duration_minutes),
        }
    }

    pub fn parse(start_time: &str, duration_minutes: Option<i64>) -> Result<Self, AvailabilityError> {
        Ok(Self {
            start_time: parse_wall_clock(start_time)?,
            duration_minutes,
        })
    }
}

/// Validated input for inserting a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub business_id: Uuid,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub service_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
    pub booking_date: Option<NaiveDate>,
    pub booking_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub booking: Option<Booking>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingsResponse {
    pub success: bool,
    pub bookings: Vec<Booking>,
}
