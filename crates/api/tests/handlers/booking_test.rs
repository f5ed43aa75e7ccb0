use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveTime;
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use slotwise_api::{
    handlers::booking::*,
    middleware::{auth::AuthenticatedCaller, error_handling::AppError},
};
use slotwise_core::{
    errors::BookingError,
    models::{
        booking::{BookingStatus, CreateBookingRequest, NewBooking, UpdateBookingStatusRequest},
        profile::{Caller, UserRole},
    },
};
use uuid::Uuid;

use crate::test_utils::{at, booked, monday, TestContext};

fn request(ctx: &TestContext, time: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        service_id: Some(ctx.service_id),
        business_id: Some(ctx.business_id),
        booking_date: Some(monday()),
        booking_time: Some(time.to_string()),
        notes: Some("  Short back and sides  ".to_string()),
    }
}

fn client() -> Caller {
    Caller::new(Uuid::new_v4(), UserRole::Client)
}

/// Hours 09:00-12:00 on Monday and a 30 minute service.
fn open_monday(ctx: &mut TestContext) {
    let hours = ctx.hours(1, at(9, 0), at(12, 0));
    let service = ctx.service(Some(30));

    ctx.store
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(service.clone())));
    ctx.store
        .expect_get_business_hours()
        .returning(move |_, _| Ok(Some(hours.clone())));
}

async fn create(
    ctx: TestContext,
    caller: Caller,
    payload: CreateBookingRequest,
) -> Result<(StatusCode, Json<slotwise_core::models::booking::BookingResponse>), AppError> {
    create_booking(
        State(ctx.into_state()),
        AuthenticatedCaller(caller),
        Json(payload),
    )
    .await
}

fn expect_kind(err: AppError, status: StatusCode) -> BookingError {
    assert_eq!(err.status(), status);
    err.0
}

#[test_log::test(tokio::test)]
async fn test_create_booking_success() {
    let mut ctx = TestContext::new();
    open_monday(&mut ctx);
    let caller = client();
    let created = ctx.booking(caller.user_id, at(10, 30), "pending");
    let business_id = ctx.business_id;
    let service_id = ctx.service_id;
    let user_id = caller.user_id;

    ctx.store
        .expect_get_booked_slots()
        .returning(|_, _| Ok(vec![booked(at(10, 0), Some(30))]));
    ctx.store
        .expect_create_booking_if_available()
        .withf(move |new_booking: &NewBooking, duration: &i64| {
            *new_booking
                == NewBooking {
                    user_id,
                    service_id,
                    business_id,
                    booking_date: monday(),
                    booking_time: at(10, 30),
                    notes: Some("Short back and sides".to_string()),
                }
                && *duration == 30
        })
        .times(1)
        .returning(move |_, _| Ok(Some(created.clone())));

    let payload = request(&ctx, "10:30");
    let (status, Json(response)) = create(ctx, caller, payload).await.unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert!(response.success);
    assert_eq!(response.message, "Booking created successfully");
    let booking = response.booking.expect("booking should be returned");
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.booking_time, at(10, 30));
}

#[tokio::test]
async fn test_create_booking_when_opening_time_has_seconds() {
    let mut ctx = TestContext::new();
    let opens = NaiveTime::from_hms_opt(9, 0, 30).unwrap();
    let hours = ctx.hours(1, opens, at(12, 0));
    let service = ctx.service(Some(30));
    let caller = client();
    let created = ctx.booking(caller.user_id, at(9, 0), "pending");

    ctx.store
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(service.clone())));
    ctx.store
        .expect_get_business_hours()
        .returning(move |_, _| Ok(Some(hours.clone())));
    ctx.store
        .expect_get_booked_slots()
        .returning(|_, _| Ok(Vec::new()));
    ctx.store
        .expect_create_booking_if_available()
        .withf(|new_booking: &NewBooking, _| new_booking.booking_time == at(9, 0))
        .times(1)
        .returning(move |_, _| Ok(Some(created.clone())));

    let payload = request(&ctx, "09:00");
    let (status, _) = create(ctx, caller, payload).await.unwrap();

    assert_eq!(status, StatusCode::CREATED);
}

#[rstest]
#[case("business")]
#[case("service")]
#[case("date")]
#[case("time")]
#[tokio::test]
async fn test_create_booking_missing_fields(#[case] missing: &str) {
    let ctx = TestContext::new();
    let mut payload = request(&ctx, "10:00");
    match missing {
        "business" => payload.business_id = None,
        "service" => payload.service_id = None,
        "date" => payload.booking_date = None,
        _ => payload.booking_time = None,
    }

    let err = create(ctx, client(), payload).await.unwrap_err();

    match expect_kind(err, StatusCode::BAD_REQUEST) {
        BookingError::Validation(message) => {
            assert_eq!(message, "Missing required booking information")
        }
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_booking_malformed_time() {
    let ctx = TestContext::new();
    let payload = request(&ctx, "half past ten");

    let err = create(ctx, client(), payload).await.unwrap_err();

    assert!(matches!(
        expect_kind(err, StatusCode::BAD_REQUEST),
        BookingError::Validation(_)
    ));
}

#[tokio::test]
async fn test_create_booking_service_of_other_business() {
    let mut ctx = TestContext::new();
    let mut service = ctx.service(Some(30));
    service.business_id = Uuid::new_v4();

    ctx.store
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(service.clone())));
    ctx.store.expect_create_booking_if_available().times(0);

    let payload = request(&ctx, "10:00");
    let err = create(ctx, client(), payload).await.unwrap_err();

    assert!(matches!(
        expect_kind(err, StatusCode::NOT_FOUND),
        BookingError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_create_booking_on_closed_day() {
    let mut ctx = TestContext::new();
    let service = ctx.service(Some(30));
    let hours = ctx.closed_hours(1);

    ctx.store
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(service.clone())));
    ctx.store
        .expect_get_business_hours()
        .returning(move |_, _| Ok(Some(hours.clone())));
    ctx.store.expect_create_booking_if_available().times(0);

    let payload = request(&ctx, "10:00");
    let err = create(ctx, client(), payload).await.unwrap_err();

    assert!(matches!(
        expect_kind(err, StatusCode::BAD_REQUEST),
        BookingError::Validation(_)
    ));
}

#[rstest]
#[case("10:15")]
#[case("12:00")]
#[case("08:30")]
#[tokio::test]
async fn test_create_booking_off_grid_time(#[case] time: &str) {
    let mut ctx = TestContext::new();
    open_monday(&mut ctx);

    ctx.store
        .expect_get_booked_slots()
        .returning(|_, _| Ok(Vec::new()));
    ctx.store.expect_create_booking_if_available().times(0);

    let payload = request(&ctx, time);
    let err = create(ctx, client(), payload).await.unwrap_err();

    match expect_kind(err, StatusCode::BAD_REQUEST) {
        BookingError::Validation(message) => {
            assert_eq!(message, "Requested time is not an offered slot")
        }
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_booking_taken_slot() {
    let mut ctx = TestContext::new();
    open_monday(&mut ctx);

    ctx.store
        .expect_get_booked_slots()
        .returning(|_, _| Ok(vec![booked(at(10, 0), Some(30))]));
    ctx.store.expect_create_booking_if_available().times(0);

    let payload = request(&ctx, "10:00");
    let err = create(ctx, client(), payload).await.unwrap_err();

    assert!(matches!(
        expect_kind(err, StatusCode::CONFLICT),
        BookingError::Conflict(_)
    ));
}

#[tokio::test]
async fn test_create_booking_lost_race() {
    let mut ctx = TestContext::new();
    open_monday(&mut ctx);

    ctx.store
        .expect_get_booked_slots()
        .returning(|_, _| Ok(Vec::new()));
    ctx.store
        .expect_create_booking_if_available()
        .times(1)
        .returning(|_, _| Ok(None));

    let payload = request(&ctx, "11:00");
    let err = create(ctx, client(), payload).await.unwrap_err();

    assert!(matches!(
        expect_kind(err, StatusCode::CONFLICT),
        BookingError::Conflict(_)
    ));
}

#[tokio::test]
async fn test_get_user_bookings() {
    let mut ctx = TestContext::new();
    let caller = client();
    let rows = vec![
        ctx.booking(caller.user_id, at(11, 0), "confirmed"),
        ctx.booking(caller.user_id, at(9, 0), "cancelled"),
    ];
    let user_id = caller.user_id;

    ctx.store
        .expect_get_bookings_by_user()
        .with(predicate::eq(user_id))
        .times(1)
        .returning(move |_| Ok(rows.clone()));

    let Json(response) = get_user_bookings(State(ctx.into_state()), AuthenticatedCaller(caller))
        .await
        .unwrap();

    assert!(response.success);
    let statuses: Vec<_> = response.bookings.iter().map(|b| b.status).collect();
    assert_eq!(
        statuses,
        vec![BookingStatus::Confirmed, BookingStatus::Cancelled]
    );
}

#[tokio::test]
async fn test_get_user_bookings_with_corrupt_status() {
    let mut ctx = TestContext::new();
    let caller = client();
    let rows = vec![ctx.booking(caller.user_id, at(11, 0), "lost")];

    ctx.store
        .expect_get_bookings_by_user()
        .returning(move |_| Ok(rows.clone()));

    let err = get_user_bookings(State(ctx.into_state()), AuthenticatedCaller(caller))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_owner_sees_business_bookings() {
    let mut ctx = TestContext::new();
    let business = ctx.business();
    let rows = vec![ctx.booking(Uuid::new_v4(), at(10, 0), "pending")];
    let owner = ctx.owner();
    let business_id = ctx.business_id;

    ctx.store
        .expect_get_business_by_id()
        .with(predicate::eq(business_id))
        .returning(move |_| Ok(Some(business.clone())));
    ctx.store
        .expect_get_bookings_by_business()
        .with(predicate::eq(business_id))
        .times(1)
        .returning(move |_| Ok(rows.clone()));

    let Json(response) = get_business_bookings(
        State(ctx.into_state()),
        AuthenticatedCaller(owner),
        Path(business_id),
    )
    .await
    .unwrap();

    assert_eq!(response.bookings.len(), 1);
}

#[tokio::test]
async fn test_admin_sees_business_bookings() {
    let mut ctx = TestContext::new();
    let business = ctx.business();
    let business_id = ctx.business_id;

    ctx.store
        .expect_get_business_by_id()
        .returning(move |_| Ok(Some(business.clone())));
    ctx.store
        .expect_get_bookings_by_business()
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let admin = Caller::new(Uuid::new_v4(), UserRole::Admin);
    let result = get_business_bookings(
        State(ctx.into_state()),
        AuthenticatedCaller(admin),
        Path(business_id),
    )
    .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_stranger_denied_business_bookings() {
    let mut ctx = TestContext::new();
    let business = ctx.business();
    let business_id = ctx.business_id;

    ctx.store
        .expect_get_business_by_id()
        .returning(move |_| Ok(Some(business.clone())));
    ctx.store.expect_get_bookings_by_business().times(0);

    let stranger = Caller::new(Uuid::new_v4(), UserRole::Business);
    let err = get_business_bookings(
        State(ctx.into_state()),
        AuthenticatedCaller(stranger),
        Path(business_id),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        expect_kind(err, StatusCode::FORBIDDEN),
        BookingError::Authorization(_)
    ));
}

#[rstest]
#[case(UserRole::Business)]
#[case(UserRole::Admin)]
#[tokio::test]
async fn test_unknown_business_bookings(#[case] role: UserRole) {
    let mut ctx = TestContext::new();

    ctx.store
        .expect_get_business_by_id()
        .returning(|_| Ok(None));
    ctx.store.expect_get_bookings_by_business().times(0);

    let caller = Caller::new(ctx.owner_id, role);
    let business_id = ctx.business_id;
    let err = get_business_bookings(
        State(ctx.into_state()),
        AuthenticatedCaller(caller),
        Path(business_id),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

/// Sets up a booking made by `client_id` and the business that owns it.
fn booking_fixture(
    ctx: &mut TestContext,
    client_id: Uuid,
    status_update: Option<BookingStatus>,
) -> Uuid {
    let booking = ctx.booking(client_id, at(10, 0), "pending");
    let booking_id = booking.id;
    let business = ctx.business();

    let current = booking.clone();
    ctx.store
        .expect_get_booking_by_id()
        .with(predicate::eq(booking_id))
        .returning(move |_| Ok(Some(current.clone())));
    ctx.store
        .expect_get_business_by_id()
        .returning(move |_| Ok(Some(business.clone())));

    match status_update {
        Some(status) => {
            let mut updated = booking;
            updated.status = status.as_str().to_string();
            ctx.store
                .expect_update_booking_status()
                .with(predicate::eq(booking_id), predicate::eq(status))
                .times(1)
                .returning(move |_, _| Ok(Some(updated.clone())));
        }
        None => {
            ctx.store.expect_update_booking_status().times(0);
        }
    }

    booking_id
}

#[tokio::test]
async fn test_client_cancels_own_booking() {
    let mut ctx = TestContext::new();
    let caller = client();
    let booking_id = booking_fixture(&mut ctx, caller.user_id, Some(BookingStatus::Cancelled));

    let Json(response) = update_booking_status(
        State(ctx.into_state()),
        AuthenticatedCaller(caller),
        Path(booking_id),
        Json(UpdateBookingStatusRequest {
            status: BookingStatus::Cancelled,
        }),
    )
    .await
    .unwrap();

    assert!(response.success);
    assert_eq!(response.message, "Booking cancelled successfully");
    assert_eq!(
        response.booking.map(|b| b.status),
        Some(BookingStatus::Cancelled)
    );
}

#[tokio::test]
async fn test_client_cannot_confirm_own_booking() {
    let mut ctx = TestContext::new();
    let caller = client();
    let booking_id = booking_fixture(&mut ctx, caller.user_id, None);

    let err = update_booking_status(
        State(ctx.into_state()),
        AuthenticatedCaller(caller),
        Path(booking_id),
        Json(UpdateBookingStatusRequest {
            status: BookingStatus::Confirmed,
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_owner_confirms_booking() {
    let mut ctx = TestContext::new();
    let owner = ctx.owner();
    let booking_id = booking_fixture(&mut ctx, Uuid::new_v4(), Some(BookingStatus::Confirmed));

    let Json(response) = update_booking_status(
        State(ctx.into_state()),
        AuthenticatedCaller(owner),
        Path(booking_id),
        Json(UpdateBookingStatusRequest {
            status: BookingStatus::Confirmed,
        }),
    )
    .await
    .unwrap();

    assert_eq!(response.message, "Booking confirmed successfully");
}

#[tokio::test]
async fn test_update_unknown_booking() {
    let mut ctx = TestContext::new();

    ctx.store
        .expect_get_booking_by_id()
        .returning(|_| Ok(None));
    ctx.store.expect_update_booking_status().times(0);

    let err = update_booking_status(
        State(ctx.into_state()),
        AuthenticatedCaller(client()),
        Path(Uuid::new_v4()),
        Json(UpdateBookingStatusRequest {
            status: BookingStatus::Cancelled,
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}
