//! # Availability Handlers
//!
//! Answers "which start times can still be booked for this service on this
//! day". The handler gathers the three inputs the slot scan needs from the
//! record store and wraps the result in the `{ success, message, timeSlots }`
//! envelope the booking pages expect.
//!
//! Missing hours, a closed day, and an unknown service are ordinary outcomes
//! reported inside the envelope, not HTTP errors.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use slotwise_core::{
    availability::compute_availability,
    clock::weekday_number,
    models::{
        booking::ExistingBooking,
        business_hours::WeekdaySchedule,
        service::Service,
        time_slot::AvailabilityResponse,
    },
};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

pub const CLOSED_MESSAGE: &str = "Business is closed on this day";
pub const SERVICE_NOT_FOUND_MESSAGE: &str = "Service not found";
pub const BOOKINGS_UNAVAILABLE_MESSAGE: &str = "Error fetching existing bookings";
pub const COMPUTE_FAILED_MESSAGE: &str = "Unable to compute availability";

/// Query parameters for the availability endpoint
///
/// `GET /api/availability?business_id=..&service_id=..&date=2026-10-19`
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub business_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
}

/// Lists the day's candidate slots for a service with their availability.
///
/// # Errors
///
/// * `BookingError::Database` - the hours or service lookup failed
#[axum::debug_handler]
pub async fn get_available_time_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let day_of_week = weekday_number(query.date);

    let schedule: Option<WeekdaySchedule> = state
        .store
        .get_business_hours(query.business_id, day_of_week)
        .await?
        .map(WeekdaySchedule::from);

    let schedule = match schedule {
        Some(schedule) if !schedule.is_closed => schedule,
        _ => {
            tracing::debug!(
                "No opening hours: business_id={}, day_of_week={}",
                query.business_id,
                day_of_week
            );
            return Ok(Json(AvailabilityResponse::unavailable(CLOSED_MESSAGE)));
        }
    };

    let service = match state.store.get_service_by_id(query.service_id).await? {
        Some(service) => Service::from(service),
        None => {
            return Ok(Json(AvailabilityResponse::unavailable(
                SERVICE_NOT_FOUND_MESSAGE,
            )));
        }
    };

    let existing: Vec<ExistingBooking> = match state
        .store
        .get_booked_slots(query.business_id, query.date)
        .await
    {
        Ok(rows) => rows.into_iter().map(ExistingBooking::from).collect(),
        Err(err) => {
            tracing::error!(
                "Failed to load bookings for business {} on {}: {:?}",
                query.business_id,
                query.date,
                err
            );
            return Ok(Json(AvailabilityResponse::unavailable(
                BOOKINGS_UNAVAILABLE_MESSAGE,
            )));
        }
    };

    match compute_availability(&schedule, service.duration_minutes(), &existing) {
        Ok(slots) => Ok(Json(AvailabilityResponse::slots(slots.collect()))),
        Err(err) => {
            tracing::warn!(
                "Rejected availability input for service {}: {}",
                service.id,
                err
            );
            Ok(Json(AvailabilityResponse::unavailable(COMPUTE_FAILED_MESSAGE)))
        }
    }
}
