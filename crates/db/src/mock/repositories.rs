use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use slotwise_core::models::{
    booking::{BookingStatus, NewBooking},
    profile::UserRole,
};
use uuid::Uuid;

use crate::{
    models::{DbBookedSlot, DbBooking, DbBusiness, DbBusinessHours, DbProfile, DbService},
    store::BookingStore,
};

// Mock record store for testing handlers without a database
mock! {
    pub BookingStore {}

    #[async_trait]
    impl BookingStore for BookingStore {
        async fn get_business_hours(
            &self,
            business_id: Uuid,
            day_of_week: i16,
        ) -> eyre::Result<Option<DbBusinessHours>>;

        async fn get_service_by_id(&self, id: Uuid) -> eyre::Result<Option<DbService>>;

        async fn get_business_by_id(&self, id: Uuid) -> eyre::Result<Option<DbBusiness>>;

        async fn get_booked_slots(
            &self,
            business_id: Uuid,
            booking_date: NaiveDate,
        ) -> eyre::Result<Vec<DbBookedSlot>>;

        async fn get_booking_by_id(&self, id: Uuid) -> eyre::Result<Option<DbBooking>>;

        async fn get_bookings_by_user(&self, user_id: Uuid) -> eyre::Result<Vec<DbBooking>>;

        async fn get_bookings_by_business(
            &self,
            business_id: Uuid,
        ) -> eyre::Result<Vec<DbBooking>>;

        async fn update_booking_status(
            &self,
            id: Uuid,
            status: BookingStatus,
        ) -> eyre::Result<Option<DbBooking>>;

        async fn create_booking_if_available(
            &self,
            new_booking: NewBooking,
            service_duration_minutes: i64,
        ) -> eyre::Result<Option<DbBooking>>;

        async fn update_user_role(
            &self,
            id: Uuid,
            user_type: UserRole,
        ) -> eyre::Result<Option<DbProfile>>;
    }
}
