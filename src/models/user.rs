use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_woman_entrepreneur: bool,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token_expire: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// The caller's own profile, email included.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
}

/// What anyone may see about another user.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
}
