use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use slotwise_core::models::{
    booking::{Booking, BookingStatus, ExistingBooking},
    business_hours::WeekdaySchedule,
    profile::{Profile, UserRole},
    service::Service,
};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBusiness {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Service {
            id: row.id,
            business_id: row.business_id,
            name: row.name,
            price: row.price,
            duration: row.duration,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBusinessHours {
    pub id: Uuid,
    pub business_id: Uuid,
    pub day_of_week: i16,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
}

impl From<DbBusinessHours> for WeekdaySchedule {
    fn from(row: DbBusinessHours) -> Self {
        WeekdaySchedule {
            day_of_week: row.day_of_week,
            open_time: row.open_time,
            close_time: row.close_time,
            is_closed: row.is_closed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub business_id: Uuid,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbBooking> for Booking {
    type Error = eyre::Report;

    fn try_from(row: DbBooking) -> Result<Self> {
        let status = row
            .status
            .parse::<BookingStatus>()
            .map_err(|e| eyre!("Booking {} has {}", row.id, e))?;

        Ok(Booking {
            id: row.id,
            user_id: row.user_id,
            service_id: row.service_id,
            business_id: row.business_id,
            booking_date: row.booking_date,
            booking_time: row.booking_time,
            status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A non-cancelled booking joined with its service's duration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookedSlot {
    pub booking_time: NaiveTime,
    pub service_duration: Option<i32>,
}

impl From<DbBookedSlot> for ExistingBooking {
    fn from(row: DbBookedSlot) -> Self {
        ExistingBooking {
            start_time: row.booking_time,
            duration_minutes: row.service_duration.map(i64::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProfile {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub user_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbProfile> for Profile {
    type Error = eyre::Report;

    fn try_from(row: DbProfile) -> Result<Self> {
        let user_type = row
            .user_type
            .parse::<UserRole>()
            .map_err(|e| eyre!("Profile {} has {}", row.id, e))?;

        Ok(Profile {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            user_type,
            updated_at: row.updated_at,
        })
    }
}
