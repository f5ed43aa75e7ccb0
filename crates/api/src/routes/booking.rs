use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/bookings",
            get(handlers::booking::get_user_bookings).post(handlers::booking::create_booking),
        )
        .route(
            "/api/bookings/:id/status",
            patch(handlers::booking::update_booking_status),
        )
        .route(
            "/api/businesses/:id/bookings",
            get(handlers::booking::get_business_bookings),
        )
}
