use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Challenge;

pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Challenge>, sqlx::Error> {
    sqlx::query_as::<_, Challenge>(
        "SELECT * FROM challenges WHERE user_id = $1 ORDER BY deadline ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    description: Option<&str>,
    deadline: NaiveDate,
) -> Result<Challenge, sqlx::Error> {
    sqlx::query_as::<_, Challenge>(
        "INSERT INTO challenges (id, user_id, title, description, deadline, progress)
         VALUES ($1, $2, $3, $4, $5, 0) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(title)
    .bind(description)
    .bind(deadline)
    .fetch_one(pool)
    .await
}

/// `progress = None` keeps the stored value.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    title: &str,
    description: Option<&str>,
    deadline: NaiveDate,
    progress: Option<i32>,
) -> Result<Option<Challenge>, sqlx::Error> {
    sqlx::query_as::<_, Challenge>(
        "UPDATE challenges SET
            title = $3, description = $4, deadline = $5, progress = COALESCE($6, progress)
         WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(description)
    .bind(deadline)
    .bind(progress)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM challenges WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
