use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use mockall::predicate;
use pretty_assertions::assert_eq;
use slotwise_api::handlers::availability::*;
use slotwise_core::{clock::format_wall_clock, models::time_slot::AvailabilityResponse};

use crate::test_utils::{at, booked, monday, TestContext};

fn query(ctx: &TestContext) -> AvailabilityQuery {
    AvailabilityQuery {
        business_id: ctx.business_id,
        service_id: ctx.service_id,
        date: monday(),
    }
}

fn summary(response: &AvailabilityResponse) -> Vec<(String, bool)> {
    response
        .time_slots
        .iter()
        .map(|slot| (format_wall_clock(slot.start_time), slot.available))
        .collect()
}

#[test_log::test(tokio::test)]
async fn test_slots_for_open_day() {
    let mut ctx = TestContext::new();
    let hours = ctx.hours(1, at(9, 0), at(12, 0));
    let service = ctx.service(Some(30));
    let business_id = ctx.business_id;
    let service_id = ctx.service_id;

    ctx.store
        .expect_get_business_hours()
        .with(predicate::eq(business_id), predicate::eq(1_i16))
        .times(1)
        .returning(move |_, _| Ok(Some(hours.clone())));
    ctx.store
        .expect_get_service_by_id()
        .with(predicate::eq(service_id))
        .times(1)
        .returning(move |_| Ok(Some(service.clone())));
    ctx.store
        .expect_get_booked_slots()
        .with(predicate::eq(business_id), predicate::eq(monday()))
        .times(1)
        .returning(|_, _| Ok(vec![booked(at(10, 0), Some(30))]));

    let q = query(&ctx);
    let response = get_available_time_slots(State(ctx.into_state()), Query(q))
        .await
        .unwrap()
        .0;

    assert!(response.success);
    assert_eq!(response.message, None);
    assert_eq!(
        summary(&response),
        vec![
            ("09:00".to_string(), true),
            ("09:30".to_string(), true),
            ("10:00".to_string(), false),
            ("10:30".to_string(), true),
            ("11:00".to_string(), true),
            ("11:30".to_string(), true),
        ]
    );
}

#[tokio::test]
async fn test_missing_hours_means_closed() {
    let mut ctx = TestContext::new();

    ctx.store
        .expect_get_business_hours()
        .times(1)
        .returning(|_, _| Ok(None));
    ctx.store.expect_get_service_by_id().times(0);
    ctx.store.expect_get_booked_slots().times(0);

    let q = query(&ctx);
    let response = get_available_time_slots(State(ctx.into_state()), Query(q))
        .await
        .unwrap()
        .0;

    assert_eq!(response, AvailabilityResponse::unavailable(CLOSED_MESSAGE));
}

#[tokio::test]
async fn test_closed_flag_means_closed() {
    let mut ctx = TestContext::new();
    let hours = ctx.closed_hours(1);

    ctx.store
        .expect_get_business_hours()
        .returning(move |_, _| Ok(Some(hours.clone())));
    ctx.store.expect_get_service_by_id().times(0);

    let q = query(&ctx);
    let response = get_available_time_slots(State(ctx.into_state()), Query(q))
        .await
        .unwrap()
        .0;

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some(CLOSED_MESSAGE));
    assert!(response.time_slots.is_empty());
}

#[tokio::test]
async fn test_unknown_service() {
    let mut ctx = TestContext::new();
    let hours = ctx.hours(1, at(9, 0), at(17, 0));

    ctx.store
        .expect_get_business_hours()
        .returning(move |_, _| Ok(Some(hours.clone())));
    ctx.store
        .expect_get_service_by_id()
        .returning(|_| Ok(None));
    ctx.store.expect_get_booked_slots().times(0);

    let q = query(&ctx);
    let response = get_available_time_slots(State(ctx.into_state()), Query(q))
        .await
        .unwrap()
        .0;

    assert_eq!(
        response,
        AvailabilityResponse::unavailable(SERVICE_NOT_FOUND_MESSAGE)
    );
}

#[tokio::test]
async fn test_booking_lookup_failure_reported_in_envelope() {
    let mut ctx = TestContext::new();
    let hours = ctx.hours(1, at(9, 0), at(17, 0));
    let service = ctx.service(Some(60));

    ctx.store
        .expect_get_business_hours()
        .returning(move |_, _| Ok(Some(hours.clone())));
    ctx.store
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(service.clone())));
    ctx.store
        .expect_get_booked_slots()
        .returning(|_, _| Err(eyre::eyre!("connection reset")));

    let q = query(&ctx);
    let response = get_available_time_slots(State(ctx.into_state()), Query(q))
        .await
        .unwrap()
        .0;

    assert_eq!(
        response,
        AvailabilityResponse::unavailable(BOOKINGS_UNAVAILABLE_MESSAGE)
    );
}

#[tokio::test]
async fn test_service_without_duration_uses_an_hour() {
    let mut ctx = TestContext::new();
    let hours = ctx.hours(1, at(9, 0), at(11, 0));
    let service = ctx.service(None);

    ctx.store
        .expect_get_business_hours()
        .returning(move |_, _| Ok(Some(hours.clone())));
    ctx.store
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(service.clone())));
    // Unknown booking duration also occupies an hour: [10:00, 11:00).
    ctx.store
        .expect_get_booked_slots()
        .returning(|_, _| Ok(vec![booked(at(10, 0), None)]));

    let q = query(&ctx);
    let response = get_available_time_slots(State(ctx.into_state()), Query(q))
        .await
        .unwrap()
        .0;

    assert_eq!(
        summary(&response),
        vec![
            ("09:00".to_string(), true),
            ("09:30".to_string(), false),
            ("10:00".to_string(), false),
            ("10:30".to_string(), false),
        ]
    );
}

#[tokio::test]
async fn test_invalid_stored_duration_is_not_leaked() {
    let mut ctx = TestContext::new();
    let hours = ctx.hours(1, at(9, 0), at(17, 0));
    let service = ctx.service(Some(0));

    ctx.store
        .expect_get_business_hours()
        .returning(move |_, _| Ok(Some(hours.clone())));
    ctx.store
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(service.clone())));
    ctx.store
        .expect_get_booked_slots()
        .returning(|_, _| Ok(Vec::new()));

    let q = query(&ctx);
    let response = get_available_time_slots(State(ctx.into_state()), Query(q))
        .await
        .unwrap()
        .0;

    assert_eq!(
        response,
        AvailabilityResponse::unavailable(COMPUTE_FAILED_MESSAGE)
    );
}

#[tokio::test]
async fn test_hours_lookup_failure_is_server_error() {
    let mut ctx = TestContext::new();

    ctx.store
        .expect_get_business_hours()
        .returning(|_, _| Err(eyre::eyre!("pool timed out")));

    let q = query(&ctx);
    let err = get_available_time_slots(State(ctx.into_state()), Query(q))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!err.public_message().contains("pool timed out"));
}
