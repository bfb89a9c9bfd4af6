use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::jwt::{self, TokenPair, REFRESH_TOKEN_TTL_SECS};
use crate::auth::password;
use crate::auth::tokens::{generate_opaque_token, hash_token};
use crate::db;
use crate::error::{is_unique_violation, present, required, AppError};
use crate::extract::AppJson;
use crate::state::SharedState;

const RESET_TICKET_TTL_MINUTES: i64 = 30;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "isWomanEntrepreneur", default)]
    pub is_woman_entrepreneur: Option<bool>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
    pub name: String,
    pub user_id: Uuid,
    pub is_woman_entrepreneur: bool,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

fn issue_pair(state: &SharedState, user_id: Uuid) -> Result<TokenPair, AppError> {
    jwt::issue_pair(
        user_id,
        &state.config.jwt_secret,
        &state.config.jwt_refresh_secret,
    )
    .map_err(AppError::Internal)
}

pub async fn register(
    State(state): State<SharedState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    const MISSING: &str = "Name, email and password are required";
    let name = required(req.name, MISSING)?;
    let email = required(req.email, MISSING)?;
    let pw = present(req.password, MISSING)?;

    let conflict = || AppError::Conflict("This email or username is already registered".to_string());

    if db::users::find_by_email_or_name(&state.pool, &email, &name)
        .await?
        .is_some()
    {
        return Err(conflict());
    }

    let pw_hash = password::hash(&pw).map_err(AppError::Internal)?;

    // The unique constraints decide concurrent registrations that both passed the lookup.
    let user = db::users::create(
        &state.pool,
        &name,
        &email,
        &pw_hash,
        req.is_woman_entrepreneur.unwrap_or(false),
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            conflict()
        } else {
            AppError::Database(e)
        }
    })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, message("Registration successful")))
}

pub async fn login(
    State(state): State<SharedState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    const MISSING: &str = "Username and password are required";
    let name = required(req.name, MISSING)?;
    let pw = present(req.password, MISSING)?;

    if state.login_limiter.check(&name).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let user = db::users::find_by_name(&state.pool, &name)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    let valid = password::verify(&pw, &user.password_hash).map_err(AppError::Internal)?;

    if !valid {
        state.login_limiter.record_failure(&name);
        return Err(AppError::Unauthorized("Incorrect password".to_string()));
    }
    state.login_limiter.reset(&name);

    let tokens = issue_pair(&state, user.id)?;

    // Single session per user: this replaces any refresh token issued earlier.
    db::users::set_refresh_token(
        &state.pool,
        user.id,
        &hash_token(&tokens.refresh_token),
        Utc::now() + Duration::seconds(REFRESH_TOKEN_TTL_SECS),
    )
    .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        name: user.name,
        user_id: user.id,
        is_woman_entrepreneur: user.is_woman_entrepreneur,
    }))
}

pub async fn refresh(
    State(state): State<SharedState>,
    AppJson(req): AppJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let presented = present(req.refresh_token, "Refresh token is required")?;
    let presented_hash = hash_token(&presented);

    // The row match gates everything; a rotated or revoked token never reaches verification.
    let user = db::users::find_by_refresh_token(&state.pool, &presented_hash)
        .await?
        .ok_or_else(|| AppError::Forbidden("Invalid refresh token".to_string()))?;

    let claims = jwt::verify(&presented, &state.config.jwt_refresh_secret).map_err(|e| {
        tracing::warn!(user_id = %user.id, "Refresh token rejected: {e}");
        AppError::Forbidden("Refresh token is invalid or expired".to_string())
    })?;

    if claims.id != user.id {
        tracing::warn!(user_id = %user.id, "Refresh token subject does not match its owner");
        return Err(AppError::Forbidden("Invalid refresh token".to_string()));
    }

    let tokens = issue_pair(&state, user.id)?;

    let rotated = db::users::rotate_refresh_token(
        &state.pool,
        user.id,
        &presented_hash,
        &hash_token(&tokens.refresh_token),
        Utc::now() + Duration::seconds(REFRESH_TOKEN_TTL_SECS),
    )
    .await?;

    if !rotated {
        return Err(AppError::Forbidden("Invalid refresh token".to_string()));
    }

    Ok(Json(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

pub async fn logout(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<MessageResponse>, AppError> {
    db::users::clear_refresh_token(&state.pool, auth.user_id).await?;
    Ok(message("Logged out successfully"))
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    AppJson(req): AppJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = required(req.email, "Email is required")?;

    let user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("This email is not registered".to_string()))?;

    let token = generate_opaque_token();
    let ticket = db::password_reset_tokens::replace_for_user(
        &state.pool,
        user.id,
        &hash_token(&token),
        Utc::now() + Duration::minutes(RESET_TICKET_TTL_MINUTES),
    )
    .await?;
    tracing::debug!(user_id = %user.id, ticket_id = %ticket.id, "Reset ticket issued");

    let reset_link = format!("{}?token={token}", state.config.reset_link_base);

    // The ticket is already stored; a delivery failure still fails the request.
    state
        .notifier
        .send_password_reset(&user.email, &reset_link)
        .await
        .map_err(|e| AppError::Internal(format!("Password reset email failed: {e}")))?;

    Ok(message("A password reset link has been sent to your email"))
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Path(token): Path<String>,
    AppJson(req): AppJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let new_password = present(req.password, "New password is required")?;

    let invalid = || AppError::BadRequest("Invalid or already used reset link".to_string());

    let ticket = db::password_reset_tokens::find_unused_by_hash(&state.pool, &hash_token(&token))
        .await?
        .ok_or_else(invalid)?;

    if ticket.is_expired(Utc::now()) {
        return Err(AppError::BadRequest("Reset link has expired".to_string()));
    }

    let pw_hash = password::hash(&new_password).map_err(AppError::Internal)?;

    let mut tx = state.pool.begin().await?;

    // Concurrent attempts on one ticket race here; only one sees a row.
    if !db::password_reset_tokens::consume(&mut *tx, ticket.id).await? {
        return Err(invalid());
    }

    db::users::update_password(&mut *tx, ticket.user_id, &pw_hash).await?;
    db::users::clear_refresh_token(&mut *tx, ticket.user_id).await?;

    tx.commit().await?;

    tracing::info!(user_id = %ticket.user_id, "Password reset");

    Ok(message("Password reset successfully"))
}
