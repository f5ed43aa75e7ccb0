//! The record-store contract the API layer depends on.
//!
//! Handlers talk to [`BookingStore`] rather than to a pool directly so that
//! they can be exercised against [`crate::mock::repositories::MockBookingStore`].

use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::Result;
use slotwise_core::models::{
    booking::{BookingStatus, NewBooking},
    profile::UserRole,
};
use uuid::Uuid;

use crate::{
    models::{DbBookedSlot, DbBooking, DbBusiness, DbBusinessHours, DbProfile, DbService},
    repositories, DbPool,
};

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn get_business_hours(
        &self,
        business_id: Uuid,
        day_of_week: i16,
    ) -> Result<Option<DbBusinessHours>>;

    async fn get_service_by_id(&self, id: Uuid) -> Result<Option<DbService>>;

    async fn get_business_by_id(&self, id: Uuid) -> Result<Option<DbBusiness>>;

    async fn get_booked_slots(
        &self,
        business_id: Uuid,
        booking_date: NaiveDate,
    ) -> Result<Vec<DbBookedSlot>>;

    async fn get_booking_by_id(&self, id: Uuid) -> Result<Option<DbBooking>>;

    async fn get_bookings_by_user(&self, user_id: Uuid) -> Result<Vec<DbBooking>>;

    async fn get_bookings_by_business(&self, business_id: Uuid) -> Result<Vec<DbBooking>>;

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<DbBooking>>;

    /// Inserts the booking unless its span is already taken; `None` means taken.
    async fn create_booking_if_available(
        &self,
        new_booking: NewBooking,
        service_duration_minutes: i64,
    ) -> Result<Option<DbBooking>>;

    async fn update_user_role(&self, id: Uuid, user_type: UserRole) -> Result<Option<DbProfile>>;
}

/// [`BookingStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgBookingStore {
    pool: DbPool,
}

impl PgBookingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn get_business_hours(
        &self,
        business_id: Uuid,
        day_of_week: i16,
    ) -> Result<Option<DbBusinessHours>> {
        repositories::business_hours::get_business_hours(&self.pool, business_id, day_of_week).await
    }

    async fn get_service_by_id(&self, id: Uuid) -> Result<Option<DbService>> {
        repositories::service::get_service_by_id(&self.pool, id).await
    }

    async fn get_business_by_id(&self, id: Uuid) -> Result<Option<DbBusiness>> {
        repositories::business::get_business_by_id(&self.pool, id).await
    }

    async fn get_booked_slots(
        &self,
        business_id: Uuid,
        booking_date: NaiveDate,
    ) -> Result<Vec<DbBookedSlot>> {
        repositories::booking::get_booked_slots(&self.pool, business_id, booking_date).await
    }

    async fn get_booking_by_id(&self, id: Uuid) -> Result<Option<DbBooking>> {
        repositories::booking::get_booking_by_id(&self.pool, id).await
    }

    async fn get_bookings_by_user(&self, user_id: Uuid) -> Result<Vec<DbBooking>> {
        repositories::booking::get_bookings_by_user(&self.pool, user_id).await
    }

    async fn get_bookings_by_business(&self, business_id: Uuid) -> Result<Vec<DbBooking>> {
        repositories::booking::get_bookings_by_business(&self.pool, business_id).await
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<DbBooking>> {
        repositories::booking::update_booking_status(&self.pool, id, status).await
    }

    async fn create_booking_if_available(
        &self,
        new_booking: NewBooking,
        service_duration_minutes: i64,
    ) -> Result<Option<DbBooking>> {
        repositories::booking::create_booking_if_available(
            &self.pool,
            &new_booking,
            service_duration_minutes,
        )
        .await
    }

    async fn update_user_role(&self, id: Uuid, user_type: UserRole) -> Result<Option<DbProfile>> {
        repositories::profile::update_user_role(&self.pool, id, user_type).await
    }
}
