//! Slot generation and conflict detection for one business-day.
//!
//! Candidate appointment starts are laid out on a fixed 30 minute cadence from
//! opening time up to (but excluding) closing time. Each candidate spans the
//! requested service duration and is unavailable when that span overlaps any
//! existing booking. Spans are half-open, so a booking ending exactly when a
//! candidate starts does not block it.
//!
//! A candidate is offered even when its span runs past closing time; only
//! its start has to fall inside business hours. Start times are whole
//! minutes: seconds on a stored opening time are dropped.

use std::iter::FusedIterator;

use chrono::NaiveTime;
use thiserror::Error;

use crate::{
    clock::{self, SECONDS_PER_MINUTE, SlotInterval},
    models::{
        booking::ExistingBooking, business_hours::WeekdaySchedule, time_slot::CandidateSlot,
    },
};

/// Spacing between successive candidate start times.
pub const SLOT_CADENCE_MINUTES: i64 = 30;

/// Occupied length assumed for a booking whose service has no duration.
pub const DEFAULT_BOOKING_DURATION_MINUTES: i64 = 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("invalid duration: {0} minutes (must be positive)")]
    InvalidDuration(i64),

    #[error("invalid time of day: {0:?} (expected HH:MM or HH:MM:SS)")]
    InvalidTimeFormat(String),
}

/// Lazily produced candidate slots for one day, in ascending start order.
///
/// Every input has already been validated by the time a `Slots` exists, so
/// iteration cannot fail.
#[derive(Debug, Clone)]
pub struct Slots {
    cursor: i64,
    close: i64,
    service_duration_minutes: i64,
    busy: Vec<SlotInterval>,
}

impl Slots {
    fn empty() -> Self {
        Self {
            cursor: 0,
            close: 0,
            service_duration_minutes: 0,
            busy: Vec::new(),
        }
    }

    fn is_blocked(&self, candidate: &SlotInterval) -> bool {
        self.busy.iter().any(|booked| candidate.overlaps(booked))
    }
}

impl Iterator for Slots {
    type Item = CandidateSlot;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.close {
            return None;
        }

        let start_time = clock::time_of_day(self.cursor)?;
        let candidate = SlotInterval::starting_at(self.cursor, self.service_duration_minutes);
        let available = !self.is_blocked(&candidate);

        self.cursor += SLOT_CADENCE_MINUTES * SECONDS_PER_MINUTE;

        Some(CandidateSlot {
            start_time,
            available,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = remaining_slots(self.cursor, self.close);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Slots {}

impl FusedIterator for Slots {}

/// `ceil((close - cursor) / cadence)`, or zero when the window is empty.
fn remaining_slots(cursor: i64, close: i64) -> usize {
    if cursor >= close {
        return 0;
    }
    let cadence = SLOT_CADENCE_MINUTES * SECONDS_PER_MINUTE;
    let window = close - cursor;
    usize::try_from((window + cadence - 1) / cadence).unwrap_or(0)
}

fn ensure_positive(duration_minutes: i64) -> Result<i64, AvailabilityError> {
    if duration_minutes <= 0 {
        return Err(AvailabilityError::InvalidDuration(duration_minutes));
    }
    Ok(duration_minutes)
}

fn occupied_spans(bookings: &[ExistingBooking]) -> Result<Vec<SlotInterval>, AvailabilityError> {
    bookings
        .iter()
        .map(|booking| {
            let duration = ensure_positive(
                booking
                    .duration_minutes
                    .unwrap_or(DEFAULT_BOOKING_DURATION_MINUTES),
            )?;
            Ok(SlotInterval::starting_at(
                clock::seconds_of_day(booking.start_time),
                duration,
            ))
        })
        .collect()
}

/// Lays out the day's candidate slots and flags the ones that collide with
/// an existing booking.
///
/// A closed day yields no slots whatever the other inputs are. Otherwise the
/// service duration and every booking duration must be positive; the first
/// offending value is reported before any slot is produced.
///
/// ```
/// use chrono::NaiveTime;
/// use slotwise_core::{compute_availability, models::business_hours::WeekdaySchedule};
///
/// let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
/// let slots = compute_availability(&WeekdaySchedule::open(1, nine, five), 60, &[]).unwrap();
/// assert_eq!(slots.len(), 16);
/// ```
pub fn compute_availability(
    schedule: &WeekdaySchedule,
    service_duration_minutes: i64,
    existing_bookings: &[ExistingBooking],
) -> Result<Slots, AvailabilityError> {
    if schedule.is_closed {
        return Ok(Slots::empty());
    }

    let service_duration_minutes = ensure_positive(service_duration_minutes)?;
    let busy = occupied_spans(existing_bookings)?;

    Ok(Slots {
        cursor: clock::floor_to_minute(clock::seconds_of_day(schedule.opens_at())),
        close: clock::seconds_of_day(schedule.closes_at()),
        service_duration_minutes,
        busy,
    })
}

/// Whether an appointment of `duration_minutes` starting at `start` avoids
/// every existing booking, using the same overlap rule as the slot scan.
pub fn is_span_free(
    start: NaiveTime,
    duration_minutes: i64,
    existing_bookings: &[ExistingBooking],
) -> Result<bool, AvailabilityError> {
    let duration_minutes = ensure_positive(duration_minutes)?;
    let candidate = SlotInterval::starting_at(clock::seconds_of_day(start), duration_minutes);
    let busy = occupied_spans(existing_bookings)?;
    Ok(!busy.iter().any(|booked| candidate.overlaps(booked)))
}
