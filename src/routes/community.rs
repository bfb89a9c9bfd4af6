use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::{is_foreign_key_violation, required, AppError};
use crate::extract::AppJson;
use crate::models::{CommentView, PostView};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct PostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub content: Option<String>,
    pub parent_comment_id: Option<Uuid>,
}

fn optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn missing_post(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        AppError::NotFound("Post not found".to_string())
    } else {
        AppError::Database(err)
    }
}

pub async fn create_post(
    auth: AuthUser,
    State(state): State<SharedState>,
    AppJson(req): AppJson<PostRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let body = required(req.body.clone(), "Post body is required")?;

    let id = db::community::create_post(
        &state.pool,
        auth.user_id,
        optional(&req.title),
        &body,
        optional(&req.image_url),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Post shared successfully", "id": id })),
    ))
}

pub async fn list_posts(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<PostView>>, AppError> {
    let posts = db::community::list_posts(&state.pool, auth.user_id).await?;
    Ok(Json(posts))
}

pub async fn update_post(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<PostRequest>,
) -> Result<Json<Value>, AppError> {
    let body = required(req.body.clone(), "Post body is required")?;

    let updated = db::community::update_post(
        &state.pool,
        id,
        auth.user_id,
        optional(&req.title),
        &body,
        optional(&req.image_url),
    )
    .await?;

    if !updated {
        return Err(AppError::Forbidden(
            "You are not allowed to edit this post".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Post updated" })))
}

pub async fn delete_post(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !db::community::delete_post(&state.pool, id, auth.user_id).await? {
        return Err(AppError::Forbidden(
            "You are not allowed to delete this post".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Post deleted" })))
}

pub async fn toggle_like(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let liked = db::community::toggle_like(&state.pool, auth.user_id, id)
        .await
        .map_err(missing_post)?;

    Ok(Json(json!({ "liked": liked })))
}

pub async fn create_comment(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<CommentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let content = required(req.content, "Comment content is required")?;

    let comment_id = db::community::create_comment(
        &state.pool,
        id,
        auth.user_id,
        &content,
        req.parent_comment_id,
    )
    .await
    .map_err(missing_post)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Comment added", "id": comment_id })),
    ))
}

pub async fn list_comments(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommentView>>, AppError> {
    let comments = db::community::list_comments(&state.pool, id).await?;
    Ok(Json(comments))
}

pub async fn update_comment(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
    AppJson(req): AppJson<CommentRequest>,
) -> Result<Json<Value>, AppError> {
    let content = required(req.content, "Comment content is required")?;

    if !db::community::update_comment(&state.pool, comment_id, post_id, auth.user_id, &content)
        .await?
    {
        return Err(AppError::Forbidden(
            "You are not allowed to edit this comment".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Comment updated" })))
}

pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !db::community::delete_comment(&state.pool, comment_id, auth.user_id).await? {
        return Err(AppError::Forbidden(
            "You are not allowed to delete this comment".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Comment deleted" })))
}
