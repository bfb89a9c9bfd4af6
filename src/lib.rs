pub mod auth;
pub mod chatbot;
pub mod config;
pub mod dates;
pub mod db;
pub mod email;
pub mod error;
pub mod extract;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::email::{LogNotifier, ResetNotifier, SystemMailer};
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};

/// Build the API with the notifier implied by the SMTP configuration.
pub fn build_app(pool: PgPool, config: Config) -> (Router, SharedState) {
    let notifier: Arc<dyn ResetNotifier> = match config.smtp.as_ref().map(SystemMailer::new) {
        Some(Ok(mailer)) => {
            tracing::info!("System SMTP configured");
            Arc::new(mailer)
        }
        Some(Err(e)) => {
            tracing::warn!("System SMTP not available: {e}");
            Arc::new(LogNotifier)
        }
        None => Arc::new(LogNotifier),
    };

    build_app_with_notifier(pool, config, notifier)
}

pub fn build_app_with_notifier(
    pool: PgPool,
    config: Config,
    notifier: Arc<dyn ResetNotifier>,
) -> (Router, SharedState) {
    let max_body_size = config.max_body_size;
    let upload_dir = config.upload_dir.clone();
    let profile_image_dir = config.profile_image_dir();

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        notifier,
        login_limiter: LoginRateLimiter::new(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = Router::new()
        .merge(routes::api_routes())
        .nest_service("/profile_images", ServeDir::new(profile_image_dir))
        .nest_service("/upload", ServeDir::new(upload_dir))
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}
