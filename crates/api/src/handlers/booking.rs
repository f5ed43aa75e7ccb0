//! # Booking Handlers
//!
//! Creating, listing and changing the status of bookings. Every handler here
//! requires an [`AuthenticatedCaller`]; who may do what is decided by
//! [`slotwise_core::authorization`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use slotwise_core::{
    authorization,
    availability::compute_availability,
    clock::{parse_wall_clock, weekday_number},
    errors::{BookingError, BookingResult},
    models::{
        booking::{
            Booking, BookingResponse, BookingsResponse, CreateBookingRequest, ExistingBooking,
            NewBooking, UpdateBookingStatusRequest,
        },
        business_hours::WeekdaySchedule,
        service::Service,
    },
};
use slotwise_db::models::DbBooking;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AuthenticatedCaller, error_handling::AppError},
};

fn to_bookings(rows: Vec<DbBooking>) -> BookingResult<Vec<Booking>> {
    rows.into_iter()
        .map(|row| Booking::try_from(row).map_err(BookingError::Database))
        .collect()
}

/// Pulls the required fields out of a create request.
fn validate_request(
    caller_id: Uuid,
    payload: CreateBookingRequest,
) -> BookingResult<NewBooking> {
    let (Some(service_id), Some(business_id), Some(booking_date), Some(booking_time)) = (
        payload.service_id,
        payload.business_id,
        payload.booking_date,
        payload.booking_time,
    ) else {
        return Err(BookingError::Validation(
            "Missing required booking information".to_string(),
        ));
    };

    let booking_time = parse_wall_clock(&booking_time)?;
    let notes = payload
        .notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty());

    Ok(NewBooking {
        user_id: caller_id,
        service_id,
        business_id,
        booking_date,
        booking_time,
        notes,
    })
}

/// Books an appointment for the caller.
///
/// The requested start must be one of the day's offered slots and still be
/// available. The store re-checks the span when writing, so a booking made
/// concurrently for the same span is reported as a conflict.
///
/// # Errors
///
/// * `BookingError::Validation` - missing fields, malformed time, or a start
///   that is not an offered slot
/// * `BookingError::NotFound` - unknown service, or service of another business
/// * `BookingError::Conflict` - the span is already taken
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let new_booking = validate_request(caller.user_id, payload)?;

    let service = state
        .store
        .get_service_by_id(new_booking.service_id)
        .await?
        .map(Service::from)
        .filter(|service| service.business_id == new_booking.business_id)
        .ok_or_else(|| BookingError::NotFound("Service not found".to_string()))?;

    let schedule = state
        .store
        .get_business_hours(new_booking.business_id, weekday_number(new_booking.booking_date))
        .await?
        .map(WeekdaySchedule::from)
        .filter(|schedule| !schedule.is_closed)
        .ok_or_else(|| BookingError::Validation("Business is closed on this day".to_string()))?;

    let existing: Vec<ExistingBooking> = state
        .store
        .get_booked_slots(new_booking.business_id, new_booking.booking_date)
        .await?
        .into_iter()
        .map(ExistingBooking::from)
        .collect();

    let offered = compute_availability(&schedule, service.duration_minutes(), &existing)
        .map_err(BookingError::from)?
        .find(|slot| slot.start_time == new_booking.booking_time);

    match offered {
        None => {
            return Err(AppError(BookingError::Validation(
                "Requested time is not an offered slot".to_string(),
            )));
        }
        Some(slot) if !slot.available => {
            return Err(AppError(BookingError::Conflict(
                "This time slot is no longer available".to_string(),
            )));
        }
        Some(_) => {}
    }

    let created = state
        .store
        .create_booking_if_available(new_booking, service.duration_minutes())
        .await?
        .ok_or_else(|| {
            BookingError::Conflict("This time slot is no longer available".to_string())
        })?;

    let booking = Booking::try_from(created).map_err(BookingError::Database)?;
    tracing::info!(
        "Booking {} created for business {} at {} {}",
        booking.id,
        booking.business_id,
        booking.booking_date,
        booking.booking_time
    );

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            success: true,
            message: "Booking created successfully".to_string(),
            booking: Some(booking),
        }),
    ))
}

/// Bookings made by the caller, newest first.
#[axum::debug_handler]
pub async fn get_user_bookings(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<Json<BookingsResponse>, AppError> {
    let rows = state.store.get_bookings_by_user(caller.user_id).await?;

    Ok(Json(BookingsResponse {
        success: true,
        bookings: to_bookings(rows)?,
    }))
}

/// Bookings taken by one business, newest first. Owner or admin only.
///
/// An unknown business is a 404 for every caller, admins included.
#[axum::debug_handler]
pub async fn get_business_bookings(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(business_id): Path<Uuid>,
) -> Result<Json<BookingsResponse>, AppError> {
    let business = state
        .store
        .get_business_by_id(business_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Business {} not found", business_id)))?;

    authorization::ensure_can_view_business_bookings(&caller, business.owner_id)?;

    let rows = state.store.get_bookings_by_business(business_id).await?;

    Ok(Json(BookingsResponse {
        success: true,
        bookings: to_bookings(rows)?,
    }))
}

/// Changes a booking's status.
///
/// Admins and the owning business may set any status; the client who made
/// the booking may only cancel it.
#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .store
        .get_booking_by_id(booking_id)
        .await?
        .ok_or_else(|| BookingError::NotFound("Booking not found".to_string()))?;

    let owner_id = state
        .store
        .get_business_by_id(booking.business_id)
        .await?
        .map(|business| business.owner_id);

    authorization::ensure_can_update_booking_status(
        &caller,
        owner_id,
        booking.user_id,
        payload.status,
    )?;

    let updated = state
        .store
        .update_booking_status(booking_id, payload.status)
        .await?
        .ok_or_else(|| BookingError::NotFound("Booking not found".to_string()))?;

    tracing::info!(
        "Booking {} set to {} by {}",
        booking_id,
        payload.status,
        caller.user_id
    );

    Ok(Json(BookingResponse {
        success: true,
        message: format!("Booking {} successfully", payload.status),
        booking: Some(Booking::try_from(updated).map_err(BookingError::Database)?),
    }))
}
