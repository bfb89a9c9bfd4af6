use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::dates::parse_date;
use crate::db;
use crate::error::{required, AppError};
use crate::extract::AppJson;
use crate::models::Challenge;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ChallengeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub progress: Option<i32>,
}

impl ChallengeRequest {
    fn validated(&self) -> Result<(String, NaiveDate), AppError> {
        const MISSING: &str = "Title and deadline are required";
        let title = required(self.title.clone(), MISSING)?;
        let deadline = required(self.deadline.clone(), MISSING)?;
        let deadline = parse_date(&deadline)
            .ok_or_else(|| AppError::BadRequest("Deadline must be a date (YYYY-MM-DD)".to_string()))?;
        Ok((title, deadline))
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Challenge>>, AppError> {
    let challenges = db::challenges::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(challenges))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    AppJson(req): AppJson<ChallengeRequest>,
) -> Result<(StatusCode, Json<Challenge>), AppError> {
    let (title, deadline) = req.validated()?;

    let challenge =
        db::challenges::create(&state.pool, auth.user_id, &title, req.description(), deadline)
            .await?;

    Ok((StatusCode::CREATED, Json(challenge)))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<ChallengeRequest>,
) -> Result<Json<Value>, AppError> {
    let (title, deadline) = req.validated()?;
    let progress = req.progress.map(|p| p.clamp(0, 100));

    let challenge = db::challenges::update(
        &state.pool,
        id,
        auth.user_id,
        &title,
        req.description(),
        deadline,
        progress,
    )
    .await?
    .ok_or_else(|| AppError::Forbidden("You are not allowed to update this challenge".to_string()))?;

    Ok(Json(json!({ "message": "Challenge updated", "challenge": challenge })))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !db::challenges::delete(&state.pool, id, auth.user_id).await? {
        return Err(AppError::Forbidden(
            "You are not allowed to delete this challenge".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Challenge deleted" })))
}
