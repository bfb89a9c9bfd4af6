use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A post joined with its author and like state for the viewing user.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub body: String,
    pub image_url: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
    #[serde(rename = "isLiked")]
    pub is_liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub parent_comment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
}
