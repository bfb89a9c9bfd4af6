use axum::extract::State;
use axum::Json;

use crate::db;
use crate::error::AppError;
use crate::models::Entrepreneur;
use crate::state::SharedState;

pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<Entrepreneur>>, AppError> {
    let entrepreneurs = db::entrepreneurs::list_all(&state.pool).await?;
    Ok(Json(entrepreneurs))
}
