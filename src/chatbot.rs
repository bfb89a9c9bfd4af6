//! Pass-through proxy to the Gemini `generateContent` API.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ChatbotConfig;
use crate::error::{required, AppError};
use crate::extract::AppJson;

pub const FALLBACK_REPLY: &str = "Sorry, I can't answer right now.";

pub struct ChatbotState {
    pub config: ChatbotConfig,
    pub client: reqwest::Client,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub fn build_chatbot_app(config: ChatbotConfig) -> Result<Router, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

    let state = Arc::new(ChatbotState { config, client });

    Ok(Router::new()
        .route("/chatbot", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}

pub async fn chat(
    State(state): State<Arc<ChatbotState>>,
    AppJson(req): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = required(req.message, "Message is required")?;

    let url = reqwest::Url::parse_with_params(
        &format!(
            "{}/v1beta/models/{}:generateContent",
            state.config.base_url.trim_end_matches('/'),
            state.config.model
        ),
        &[("key", state.config.api_key.as_str())],
    )
    .map_err(|e| AppError::Internal(format!("Invalid Gemini URL: {e}")))?;

    let body = json!({
        "contents": [{ "role": "user", "parts": [{ "text": message }] }],
    });

    let response = state
        .client
        .post(url)
        .json(&body)
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("Gemini request failed: {e}")))?;

    if !response.status().is_success() {
        tracing::warn!("Gemini returned {}", response.status());
    }

    let data: Value = response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("Gemini response was not JSON: {e}")))?;

    Ok(Json(ChatResponse {
        reply: extract_reply(&data).unwrap_or(FALLBACK_REPLY).to_string(),
    }))
}

/// `candidates[0].content.parts[0].text`, if present and non-empty.
pub fn extract_reply(data: &Value) -> Option<&str> {
    data.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_candidate_text() {
        let data = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello!" }, { "text": "ignored" }] } }]
        });
        assert_eq!(extract_reply(&data), Some("Hello!"));
    }

    #[test]
    fn missing_candidates_yield_none() {
        assert_eq!(extract_reply(&json!({ "error": { "code": 429 } })), None);
        assert_eq!(extract_reply(&json!({ "candidates": [] })), None);
    }
}
