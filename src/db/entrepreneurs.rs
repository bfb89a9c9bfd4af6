use sqlx::PgPool;

use crate::models::Entrepreneur;

pub async fn list_all(pool: &PgPool) -> Result<Vec<Entrepreneur>, sqlx::Error> {
    sqlx::query_as::<_, Entrepreneur>("SELECT * FROM entrepreneurs ORDER BY name")
        .fetch_all(pool)
        .await
}
