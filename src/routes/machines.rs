//! Machine routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::{ListResponse, StatusBody, record_error_to_status};
use crate::services::machine::{self, MachineListing, MachinePage, MachinePatch, MachineRow, NewMachine, PageParams};
use crate::services::stats::{self, MachineStats};
use crate::state::AppState;

/// `GET /api/machines`: every machine with its location, plus counts.
pub async fn list_machines(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<MachineListing, MachineStats>>, StatusCode> {
    let rows = machine::list_machines(&state.pool).await.map_err(record_error_to_status)?;
    let stats = stats::machine_stats(rows.iter().map(|listing| &listing.machine));
    Ok(Json(ListResponse { rows, stats }))
}

/// `GET /api/machines/page?offset&limit`
pub async fn list_machines_page(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<MachinePage>, StatusCode> {
    let page = machine::list_machines_page(&state.pool, params).await.map_err(record_error_to_status)?;
    Ok(Json(page))
}

/// `GET /api/machines/{id}`
pub async fn get_machine(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<MachineRow>, StatusCode> {
    let row = machine::get_machine(&state.pool, &id).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `POST /api/machines`
pub async fn create_machine(
    State(state): State<AppState>,
    Json(body): Json<NewMachine>,
) -> Result<(StatusCode, Json<MachineRow>), StatusCode> {
    let row = machine::create_machine(&state.pool, body).await.map_err(record_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PATCH /api/machines/{id}`
pub async fn update_machine(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MachinePatch>,
) -> Result<Json<MachineRow>, StatusCode> {
    let row = machine::update_machine(&state.pool, &id, body).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `PATCH /api/machines/{id}/status`
pub async fn update_machine_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<MachineRow>, StatusCode> {
    let row = machine::update_machine_status(&state.pool, &id, &body.status)
        .await
        .map_err(record_error_to_status)?;
    Ok(Json(row))
}
