//! Driver routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use super::{ListResponse, StatusBody, record_error_to_status};
use crate::services::driver::{self, DriverPatch, DriverRow, NewDriver};
use crate::services::stats::{self, DriverStats};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ActiveBody {
    pub is_active: bool,
}

/// `GET /api/drivers`
pub async fn list_drivers(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<DriverRow, DriverStats>>, StatusCode> {
    let rows = driver::list_drivers(&state.pool).await.map_err(record_error_to_status)?;
    let stats = stats::driver_stats(&rows);
    Ok(Json(ListResponse { rows, stats }))
}

/// `GET /api/drivers/{id}`
pub async fn get_driver(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<DriverRow>, StatusCode> {
    let row = driver::get_driver(&state.pool, &id).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `POST /api/drivers`
pub async fn create_driver(
    State(state): State<AppState>,
    Json(body): Json<NewDriver>,
) -> Result<(StatusCode, Json<DriverRow>), StatusCode> {
    let row = driver::create_driver(&state.pool, body).await.map_err(record_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PATCH /api/drivers/{id}`
pub async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<DriverPatch>,
) -> Result<Json<DriverRow>, StatusCode> {
    let row = driver::update_driver(&state.pool, &id, body).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `PATCH /api/drivers/{id}/status`
pub async fn update_driver_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<DriverRow>, StatusCode> {
    let row = driver::update_driver_status(&state.pool, &id, &body.status)
        .await
        .map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `PATCH /api/drivers/{id}/active`
pub async fn update_driver_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ActiveBody>,
) -> Result<Json<DriverRow>, StatusCode> {
    let row = driver::update_driver_active(&state.pool, &id, body.is_active)
        .await
        .map_err(record_error_to_status)?;
    Ok(Json(row))
}
