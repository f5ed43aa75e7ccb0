//! # Caller Identity
//!
//! Sign-in happens in front of this service. The gateway that terminates the
//! session forwards the resolved user id and role in two headers, and
//! [`AuthenticatedCaller`] turns them into a [`Caller`] for the handlers.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use slotwise_core::{
    errors::BookingError,
    models::profile::{Caller, UserRole},
};
use uuid::Uuid;

use crate::middleware::error_handling::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor for the identity of the current caller.
///
/// Rejects the request with 401 when either header is missing or malformed.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedCaller(pub Caller);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|value| value.to_str().ok())
}

/// Resolves a caller from the forwarded identity headers.
pub fn caller_from_parts(parts: &Parts) -> Result<Caller, BookingError> {
    let user_id = header(parts, USER_ID_HEADER)
        .ok_or_else(|| BookingError::Authentication("You must be logged in".to_string()))?;
    let user_id = Uuid::parse_str(user_id.trim())
        .map_err(|_| BookingError::Authentication("Malformed user id".to_string()))?;

    let role = header(parts, USER_ROLE_HEADER)
        .ok_or_else(|| BookingError::Authentication("Missing user role".to_string()))?
        .parse::<UserRole>()
        .map_err(BookingError::Authentication)?;

    Ok(Caller::new(user_id, role))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedCaller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = caller_from_parts(parts)?;
        tracing::debug!("Resolved caller {} with role {}", caller.user_id, caller.role);
        Ok(AuthenticatedCaller(caller))
    }
}
