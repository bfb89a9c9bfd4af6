use std::path::{Path as FsPath, PathBuf};

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::users::ProfileChanges;
use crate::error::{is_unique_violation, AppError};
use crate::models::{Profile, PublicProfile};
use crate::state::SharedState;

const PROFILE_IMAGE_PREFIX: &str = "profile_images/";

#[derive(Deserialize, Default)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}

struct UploadedImage {
    file_name: Option<String>,
    data: Bytes,
}

pub async fn get_profile(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Profile>, AppError> {
    let profile = db::users::find_profile(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(profile))
}

pub async fn get_public_profile(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicProfile>, AppError> {
    let profile = db::users::find_public_profile(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(profile))
}

/// Accepts multipart (with an optional `profile_image` file) or a plain JSON body.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let (form, image) = if content_type.contains("multipart/form-data") {
        parse_multipart(content_type, body).await?
    } else if body.is_empty() {
        (ProfileForm::default(), None)
    } else {
        let form: ProfileForm = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))?;
        (form, None)
    };

    let name = non_blank(&form.name);
    let email = non_blank(&form.email);
    let bio = non_blank(&form.bio);

    let stored_image = match image {
        Some(image) => Some(store_profile_image(&state.config.profile_image_dir(), image).await?),
        None => None,
    };
    let image_url = stored_image
        .as_ref()
        .map(|(file_name, _)| format!("{PROFILE_IMAGE_PREFIX}{file_name}"));

    let changes = ProfileChanges {
        name,
        email,
        bio,
        profile_image_url: image_url.as_deref(),
    };

    if changes.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    let previous_image = if image_url.is_some() {
        db::users::find_profile(&state.pool, auth.user_id)
            .await?
            .and_then(|p| p.profile_image_url)
    } else {
        None
    };

    let updated = db::users::update_profile(&state.pool, auth.user_id, &changes).await;

    let updated = match updated {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            discard(stored_image.as_ref()).await;
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Err(e) => {
            discard(stored_image.as_ref()).await;
            if is_unique_violation(&e) {
                return Err(AppError::Conflict(
                    "This email or username is already in use".to_string(),
                ));
            }
            return Err(AppError::Database(e));
        }
    };

    if let Some(old) = previous_image {
        remove_old_image(&state.config.upload_dir, &old).await;
    }

    Ok(Json(json!({ "success": true, "user": updated })))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

async fn parse_multipart(
    content_type: &str,
    body: Bytes,
) -> Result<(ProfileForm, Option<UploadedImage>), AppError> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| AppError::BadRequest("Missing multipart boundary".to_string()))?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = ProfileForm::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "profile_image" => {
                let file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Field read error: {e}")))?;
                if !data.is_empty() {
                    image = Some(UploadedImage { file_name, data });
                }
            }
            "name" | "email" | "bio" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Field read error: {e}")))?;
                match field_name.as_str() {
                    "name" => form.name = Some(value),
                    "email" => form.email = Some(value),
                    _ => form.bio = Some(value),
                }
            }
            _ => {}
        }
    }

    Ok((form, image))
}

/// Write the upload under a fresh name; returns (file name, full path).
async fn store_profile_image(
    dir: &FsPath,
    image: UploadedImage,
) -> Result<(String, PathBuf), AppError> {
    let extension = image
        .file_name
        .as_deref()
        .and_then(|n| FsPath::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();

    let file_name = format!(
        "{}-{}{extension}",
        chrono::Utc::now().timestamp_millis(),
        rand::random::<u32>()
    );
    let path = dir.join(&file_name);

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {e}")))?;
    tokio::fs::write(&path, &image.data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store profile image: {e}")))?;

    Ok((file_name, path))
}

async fn discard(stored: Option<&(String, PathBuf)>) {
    if let Some((_, path)) = stored {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!("Failed to discard unused upload {}: {e}", path.display());
        }
    }
}

async fn remove_old_image(upload_dir: &FsPath, url: &str) {
    // Only files we wrote ourselves are eligible for removal.
    let Some(file_name) = url.strip_prefix(PROFILE_IMAGE_PREFIX) else {
        return;
    };
    if file_name.is_empty() || file_name.contains('/') || file_name.contains("..") {
        return;
    }

    let path = upload_dir.join(PROFILE_IMAGE_PREFIX).join(file_name);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::debug!("Removed old profile image {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove old profile image {}: {e}", path.display()),
    }
}
