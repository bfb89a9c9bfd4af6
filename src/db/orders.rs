use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Order;

pub struct OrderFields<'a> {
    pub customer_name: Option<&'a str>,
    pub customer_phone: Option<&'a str>,
    pub description: Option<&'a str>,
    pub total_amount: f64,
    pub status: &'a str,
    pub scheduled_at: Option<DateTime<Utc>>,
}

pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    fields: &OrderFields<'_>,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        "INSERT INTO orders
            (id, user_id, customer_name, customer_phone, description, total_amount, status, scheduled_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(fields.customer_name)
    .bind(fields.customer_phone)
    .bind(fields.description)
    .bind(fields.total_amount)
    .bind(fields.status)
    .bind(fields.scheduled_at)
    .fetch_one(pool)
    .await
}

/// Returns false when the order does not exist or belongs to someone else.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    fields: &OrderFields<'_>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders SET
            customer_name = $3, customer_phone = $4, description = $5,
            total_amount = $6, status = $7, scheduled_at = $8
         WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .bind(fields.customer_name)
    .bind(fields.customer_phone)
    .bind(fields.description)
    .bind(fields.total_amount)
    .bind(fields.status)
    .bind(fields.scheduled_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    status: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE orders SET status = $3 WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .bind(status)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
