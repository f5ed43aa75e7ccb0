use crate::models::DbBusiness;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_business_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBusiness>> {
    let business = sqlx::query_as::<_, DbBusiness>(
        r#"
        SELECT id, owner_id, name, category, created_at
        FROM businesses
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if business.is_none() {
        tracing::debug!("Business not found: id={}", id);
    }

    Ok(business)
}
