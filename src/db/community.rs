use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CommentView, PostView};

pub async fn create_post(
    pool: &PgPool,
    user_id: Uuid,
    title: Option<&str>,
    body: &str,
    image_url: Option<&str>,
) -> Result<Uuid, sqlx::Error> {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO community_posts (id, user_id, title, body, image_url, is_public)
         VALUES ($1, $2, $3, $4, $5, true) RETURNING id",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(title)
    .bind(body)
    .bind(image_url)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Every post, newest first, annotated for `viewer_id`.
pub async fn list_posts(pool: &PgPool, viewer_id: Uuid) -> Result<Vec<PostView>, sqlx::Error> {
    sqlx::query_as::<_, PostView>(
        "SELECT cp.id, cp.user_id, cp.title, cp.body, cp.image_url, cp.is_public, cp.created_at,
                u.name AS author_name,
                EXISTS (
                    SELECT 1 FROM community_likes
                    WHERE user_id = $1 AND post_id = cp.id
                ) AS is_liked,
                (SELECT COUNT(*) FROM community_likes WHERE post_id = cp.id) AS like_count
         FROM community_posts cp
         JOIN users u ON cp.user_id = u.id
         ORDER BY cp.created_at DESC",
    )
    .bind(viewer_id)
    .fetch_all(pool)
    .await
}

pub async fn update_post(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    title: Option<&str>,
    body: &str,
    image_url: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE community_posts SET title = $3, body = $4, image_url = $5, is_public = true
         WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(body)
    .bind(image_url)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_post(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM community_posts WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Flip the like. Returns the new state (true = now liked).
pub async fn toggle_like(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let removed = sqlx::query("DELETE FROM community_likes WHERE user_id = $1 AND post_id = $2")
        .bind(user_id)
        .bind(post_id)
        .execute(pool)
        .await?;

    if removed.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query(
        "INSERT INTO community_likes (user_id, post_id) VALUES ($1, $2)
         ON CONFLICT (user_id, post_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(post_id)
    .execute(pool)
    .await?;
    Ok(true)
}

pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
    content: &str,
    parent_comment_id: Option<Uuid>,
) -> Result<Uuid, sqlx::Error> {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO post_comments (id, post_id, user_id, content, parent_comment_id)
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(Uuid::now_v7())
    .bind(post_id)
    .bind(user_id)
    .bind(content)
    .bind(parent_comment_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn list_comments(pool: &PgPool, post_id: Uuid) -> Result<Vec<CommentView>, sqlx::Error> {
    sqlx::query_as::<_, CommentView>(
        "SELECT c.id, c.post_id, c.user_id, c.content, c.parent_comment_id, c.created_at,
                u.name AS author_name
         FROM post_comments c
         JOIN users u ON c.user_id = u.id
         WHERE c.post_id = $1
         ORDER BY c.created_at DESC",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

pub async fn update_comment(
    pool: &PgPool,
    id: Uuid,
    post_id: Uuid,
    user_id: Uuid,
    content: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE post_comments SET content = $4
         WHERE id = $1 AND post_id = $2 AND user_id = $3",
    )
    .bind(id)
    .bind(post_id)
    .bind(user_id)
    .bind(content)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_comment(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM post_comments WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
