use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Profile, PublicProfile, User};

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    name: &str,
    email: &str,
    password_hash: &str,
    is_woman_entrepreneur: bool,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name, email, password_hash, is_woman_entrepreneur)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(is_woman_entrepreneur)
    .fetch_one(executor)
    .await
}

/// Single lookup used as the registration pre-check; a hit on either column counts.
pub async fn find_by_email_or_name(
    pool: &PgPool,
    email: &str,
    name: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 OR name = $2 LIMIT 1")
        .bind(email)
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_refresh_token(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE refresh_token = $1")
        .bind(token_hash)
        .fetch_optional(pool)
        .await
}

/// Overwrites whatever session the user had before.
pub async fn set_refresh_token(
    pool: &PgPool,
    id: Uuid,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET refresh_token = $2, refresh_token_expire = $3 WHERE id = $1")
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
    Ok(())
}

/// Swap the stored refresh token only if it still equals `old_hash`.
/// Returns false when another request already rotated it.
pub async fn rotate_refresh_token(
    pool: &PgPool,
    id: Uuid,
    old_hash: &str,
    new_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET refresh_token = $3, refresh_token_expire = $4
         WHERE id = $1 AND refresh_token = $2",
    )
    .bind(id)
    .bind(old_hash)
    .bind(new_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn clear_refresh_token<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET refresh_token = NULL, refresh_token_expire = NULL WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn update_password<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn find_profile(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "SELECT id, name, email, bio, profile_image_url FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_public_profile(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<PublicProfile>, sqlx::Error> {
    sqlx::query_as::<_, PublicProfile>(
        "SELECT id, name, bio, profile_image_url FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub struct ProfileChanges<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub profile_image_url: Option<&'a str>,
}

impl ProfileChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.profile_image_url.is_none()
    }
}

/// Apply only the provided fields; `None` keeps the current value.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    changes: &ProfileChanges<'_>,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "UPDATE users SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            bio = COALESCE($4, bio),
            profile_image_url = COALESCE($5, profile_image_url)
         WHERE id = $1
         RETURNING id, name, email, bio, profile_image_url",
    )
    .bind(id)
    .bind(changes.name)
    .bind(changes.email)
    .bind(changes.bio)
    .bind(changes.profile_image_url)
    .fetch_optional(pool)
    .await
}
