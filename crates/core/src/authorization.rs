//! Who may read or change bookings and user roles.
//!
//! The caller is always passed in explicitly; these checks never look up
//! identity on their own.

use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{booking::BookingStatus, profile::Caller},
};

/// Only admins may change another user's role.
pub fn can_update_user_role(caller: &Caller) -> bool {
    caller.is_admin()
}

/// Admins see every business's bookings; owners see their own.
pub fn can_view_business_bookings(caller: &Caller, business_owner_id: Uuid) -> bool {
    caller.is_admin() || caller.user_id == business_owner_id
}

/// Admins and the owning business may set any status. The client who made
/// the booking may only cancel it.
pub fn can_update_booking_status(
    caller: &Caller,
    business_owner_id: Option<Uuid>,
    booking_user_id: Uuid,
    new_status: BookingStatus,
) -> bool {
    if caller.is_admin() || business_owner_id == Some(caller.user_id) {
        return true;
    }
    caller.user_id == booking_user_id && new_status == BookingStatus::Cancelled
}

pub fn ensure_can_view_business_bookings(
    caller: &Caller,
    business_owner_id: Uuid,
) -> BookingResult<()> {
    if can_view_business_bookings(caller, business_owner_id) {
        Ok(())
    } else {
        Err(BookingError::Authorization(
            "You don't have permission to view these bookings".to_string(),
        ))
    }
}

pub fn ensure_can_update_booking_status(
    caller: &Caller,
    business_owner_id: Option<Uuid>,
    booking_user_id: Uuid,
    new_status: BookingStatus,
) -> BookingResult<()> {
    if can_update_booking_status(caller, business_owner_id, booking_user_id, new_status) {
        Ok(())
    } else {
        Err(BookingError::Authorization(
            "You don't have permission to update this booking".to_string(),
        ))
    }
}

pub fn ensure_can_update_user_role(caller: &Caller) -> BookingResult<()> {
    if can_update_user_role(caller) {
        Ok(())
    } else {
        Err(BookingError::Authorization(
            "You don't have permission to perform this action".to_string(),
        ))
    }
}
