pub mod auth;
pub mod challenges;
pub mod community;
pub mod orders;
pub mod user;
pub mod women_map;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password/{token}", post(auth::reset_password))
        // Orders
        .route("/api/orders", get(orders::list).post(orders::create))
        .route(
            "/api/orders/{id}",
            put(orders::update).delete(orders::delete),
        )
        .route("/api/orders/{id}/status", patch(orders::update_status))
        // User profile
        .route("/api/user/profile", get(user::get_profile))
        .route("/api/user/profile/{id}", get(user::get_public_profile))
        .route("/api/user/update-profile", put(user::update_profile))
        // Women entrepreneurs directory
        .route("/api/women-map", get(women_map::list))
        // Community
        .route(
            "/api/community",
            get(community::list_posts).post(community::create_post),
        )
        .route(
            "/api/community/{id}",
            put(community::update_post).delete(community::delete_post),
        )
        .route("/api/community/{id}/like", post(community::toggle_like))
        .route("/api/community/{id}/comment", post(community::create_comment))
        .route("/api/community/{id}/comments", get(community::list_comments))
        .route(
            "/api/community/{id}/comments/{comment_id}",
            put(community::update_comment),
        )
        .route(
            "/api/community/comment/{comment_id}",
            delete(community::delete_comment),
        )
        // Challenges
        .route(
            "/api/challenges/challenges",
            get(challenges::list).post(challenges::create),
        )
        .route(
            "/api/challenges/challenges/{id}",
            put(challenges::update).delete(challenges::delete),
        )
}
