//! Customer account routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::{ListResponse, record_error_to_status};
use crate::services::stats::{self, UserStats};
use crate::services::user::{self, NewUser, UserPatch, UserRow};
use crate::state::AppState;

/// `GET /api/users`
pub async fn list_users(State(state): State<AppState>) -> Result<Json<ListResponse<UserRow, UserStats>>, StatusCode> {
    let rows = user::list_users(&state.pool).await.map_err(record_error_to_status)?;
    let stats = stats::user_stats(&rows);
    Ok(Json(ListResponse { rows, stats }))
}

/// `GET /api/users/{id}`
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<UserRow>, StatusCode> {
    let row = user::get_user(&state.pool, &id).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `POST /api/users`
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<UserRow>), StatusCode> {
    let row = user::create_user(&state.pool, body).await.map_err(record_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PATCH /api/users/{id}`
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UserPatch>,
) -> Result<Json<UserRow>, StatusCode> {
    let row = user::update_user(&state.pool, &id, body).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}
