use crate::models::DbBusinessHours;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_business_hours(
    pool: &Pool<Postgres>,
    business_id: Uuid,
    day_of_week: i16,
) -> Result<Option<DbBusinessHours>> {
    tracing::debug!(
        "Getting business hours: business_id={}, day_of_week={}",
        business_id,
        day_of_week
    );

    let hours = sqlx::query_as::<_, DbBusinessHours>(
        r#"
        SELECT id, business_id, day_of_week, open_time, close_time, is_closed
        FROM business_hours
        WHERE business_id = $1 AND day_of_week = $2
        "#,
    )
    .bind(business_id)
    .bind(day_of_week)
    .fetch_optional(pool)
    .await?;

    Ok(hours)
}
