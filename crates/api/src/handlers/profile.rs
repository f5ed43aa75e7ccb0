//! # Profile Handlers
//!
//! Admin-only changes to user profiles.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use slotwise_core::{
    authorization,
    errors::BookingError,
    models::profile::{Profile, ProfileResponse, UpdateUserRoleRequest},
};
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AuthenticatedCaller, error_handling::AppError},
};

/// Changes a user's role. Admin only.
///
/// # Errors
///
/// * `BookingError::Authorization` - the caller is not an admin
/// * `BookingError::NotFound` - no profile has this id
#[axum::debug_handler]
pub async fn update_user_role(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRoleRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    authorization::ensure_can_update_user_role(&caller)?;

    let updated = state
        .store
        .update_user_role(user_id, payload.user_type)
        .await?
        .ok_or_else(|| BookingError::NotFound("User not found".to_string()))?;

    tracing::info!(
        "User {} set to {} by {}",
        user_id,
        payload.user_type,
        caller.user_id
    );

    Ok(Json(ProfileResponse {
        success: true,
        message: format!("User role updated to {} successfully", payload.user_type),
        profile: Some(Profile::try_from(updated).map_err(BookingError::Database)?),
    }))
}
