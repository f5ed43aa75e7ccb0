use crate::models::{DbBookedSlot, DbBooking};
use chrono::{NaiveDate, Utc};
use eyre::{Result, WrapErr};
use slotwise_core::{
    availability::is_span_free,
    models::booking::{BookingStatus, ExistingBooking, NewBooking},
};
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, user_id, service_id, business_id, booking_date, booking_time, \
     status, notes, created_at, updated_at";

/// PostgreSQL reports a failed SERIALIZABLE commit with this SQLSTATE.
const SERIALIZATION_FAILURE: &str = "40001";

async fn fetch_booked_slots<'e, E>(
    executor: E,
    business_id: Uuid,
    booking_date: NaiveDate,
) -> Result<Vec<DbBookedSlot>>
where
    E: Executor<'e, Database = Postgres>,
{
    let slots = sqlx::query_as::<_, DbBookedSlot>(
        r#"
        SELECT b.booking_time, s.duration AS service_duration
        FROM bookings b
        LEFT JOIN services s ON s.id = b.service_id
        WHERE b.business_id = $1
          AND b.booking_date = $2
          AND b.status <> $3
        "#,
    )
    .bind(business_id)
    .bind(booking_date)
    .bind(BookingStatus::Cancelled.as_str())
    .fetch_all(executor)
    .await?;

    Ok(slots)
}

/// Bookings on `booking_date` that still occupy the business's day.
pub async fn get_booked_slots(
    pool: &Pool<Postgres>,
    business_id: Uuid,
    booking_date: NaiveDate,
) -> Result<Vec<DbBookedSlot>> {
    let slots = fetch_booked_slots(pool, business_id, booking_date).await?;

    tracing::debug!(
        "Found {} active bookings: business_id={}, date={}",
        slots.len(),
        business_id,
        booking_date
    );

    Ok(slots)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_bookings_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 \
         ORDER BY booking_date DESC, booking_time DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_bookings_by_business(
    pool: &Pool<Postgres>,
    business_id: Uuid,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE business_id = $1 \
         ORDER BY booking_date DESC, booking_time DESC"
    ))
    .bind(business_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: BookingStatus,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        "UPDATE bookings SET status = $2, updated_at = $3 WHERE id = $1 \
         RETURNING {BOOKING_COLUMNS}"
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

fn is_serialization_failure(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(SERIALIZATION_FAILURE))
}

/// Inserts a pending booking unless its span collides with another active
/// booking on the same day.
///
/// The check and the insert run in one SERIALIZABLE transaction, so two
/// concurrent requests for the same span cannot both succeed. Returns
/// `None` when the span is taken, including when PostgreSQL aborts the
/// transaction because a concurrent writer got there first.
pub async fn create_booking_if_available(
    pool: &Pool<Postgres>,
    new_booking: &NewBooking,
    service_duration_minutes: i64,
) -> Result<Option<DbBooking>> {
    let mut tx = pool.begin().await?;

    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;

    let existing: Vec<ExistingBooking> =
        fetch_booked_slots(&mut *tx, new_booking.business_id, new_booking.booking_date)
            .await?
            .into_iter()
            .map(ExistingBooking::from)
            .collect();

    let free = is_span_free(
        new_booking.booking_time,
        service_duration_minutes,
        &existing,
    )
    .wrap_err("Invalid booking span")?;

    if !free {
        tracing::debug!(
            "Requested span already taken: business_id={}, date={}, time={}",
            new_booking.business_id,
            new_booking.booking_date,
            new_booking.booking_time
        );
        tx.rollback().await?;
        return Ok(None);
    }

    let id = Uuid::new_v4();
    let now = Utc::now();

    let inserted = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings (id, user_id, service_id, business_id, booking_date, booking_time,
                              status, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(new_booking.user_id)
    .bind(new_booking.service_id)
    .bind(new_booking.business_id)
    .bind(new_booking.booking_date)
    .bind(new_booking.booking_time)
    .bind(BookingStatus::Pending.as_str())
    .bind(new_booking.notes.as_deref())
    .bind(now)
    .fetch_one(&mut *tx)
    .await;

    let booking = match inserted {
        Ok(booking) => booking,
        Err(err) if is_serialization_failure(&err) => {
            tracing::warn!("Concurrent booking detected during insert: {}", err);
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    match tx.commit().await {
        Ok(()) => {
            tracing::debug!("Booking created successfully: id={}", id);
            Ok(Some(booking))
        }
        Err(err) if is_serialization_failure(&err) => {
            tracing::warn!("Concurrent booking detected at commit: {}", err);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
