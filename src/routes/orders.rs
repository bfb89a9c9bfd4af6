use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::dates::parse_timestamp;
use crate::db;
use crate::db::orders::OrderFields;
use crate::error::{required, AppError};
use crate::extract::AppJson;
use crate::models::OrderView;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct OrderRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub description: Option<String>,
    pub total_amount: Option<f64>,
    pub status: Option<String>,
    pub scheduled_at: Option<String>,
}

impl OrderRequest {
    fn fields(&self) -> OrderFields<'_> {
        OrderFields {
            customer_name: self.customer_name.as_deref(),
            customer_phone: self.customer_phone.as_deref(),
            description: self.description.as_deref(),
            total_amount: self.total_amount.unwrap_or(0.0),
            status: self
                .status
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or("pending"),
            // Unparsable dates are dropped rather than rejected.
            scheduled_at: self.scheduled_at.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<OrderView>>, AppError> {
    let orders = db::orders::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(orders.into_iter().map(OrderView::from).collect()))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    AppJson(req): AppJson<OrderRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let order = db::orders::create(&state.pool, auth.user_id, &req.fields()).await?;
    tracing::debug!(order_id = %order.id, user_id = %auth.user_id, "Order created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Order created successfully", "id": order.id })),
    ))
}

pub async fn update_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<StatusRequest>,
) -> Result<Json<Value>, AppError> {
    let status = required(req.status, "Status is required")?;

    if !db::orders::update_status(&state.pool, id, auth.user_id, &status).await? {
        return Err(AppError::Forbidden(
            "You are not allowed to update this order".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Order status updated" })))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<OrderRequest>,
) -> Result<Json<Value>, AppError> {
    if !db::orders::update(&state.pool, id, auth.user_id, &req.fields()).await? {
        return Err(AppError::Forbidden(
            "Order not found or not yours to update".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Order updated successfully" })))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !db::orders::delete(&state.pool, id, auth.user_id).await? {
        return Err(AppError::Forbidden(
            "Order not found or not yours to delete".to_string(),
        ));
    }

    tracing::debug!(order_id = %id, user_id = %auth.user_id, "Order deleted");
    Ok(Json(json!({ "message": "Order deleted successfully" })))
}
