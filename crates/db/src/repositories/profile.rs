use crate::models::DbProfile;
use chrono::Utc;
use eyre::{Result, WrapErr};
use slotwise_core::models::profile::UserRole;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Sets a user's role, returning the updated profile or `None` when no
/// profile has that id.
pub async fn update_user_role(
    pool: &Pool<Postgres>,
    id: Uuid,
    user_type: UserRole,
) -> Result<Option<DbProfile>> {
    let profile = sqlx::query_as::<_, DbProfile>(
        r#"
        UPDATE profiles
        SET user_type = $2, updated_at = $3
        WHERE id = $1
        RETURNING id, first_name, last_name, phone, user_type, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_type.as_str())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
    .wrap_err_with(|| format!("Failed to update role of user {}", id))?;

    match &profile {
        Some(_) => tracing::debug!("User role updated: id={}, user_type={}", id, user_type),
        None => tracing::debug!("Profile not found: id={}", id),
    }

    Ok(profile)
}
