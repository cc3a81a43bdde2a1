//! Laundromat directory and participating-location routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::{ListResponse, record_error_to_status};
use crate::services::laundromat::{self, LaundromatFilter, LaundromatPatch, LaundromatRow, MapMarker, NewLaundromat};
use crate::services::participating::{self, NewParticipatingLaundromat, ParticipatingLaundromatPatch, ParticipatingLaundromatRow};
use crate::services::stats::{self, ParticipatingStats, ParticipatingSummary};
use crate::services::machine;
use crate::state::AppState;

/// `GET /api/laundromats`: directory rows matching the explore filters.
pub async fn list_laundromats(
    State(state): State<AppState>,
    Query(filter): Query<LaundromatFilter>,
) -> Result<Json<Vec<LaundromatRow>>, StatusCode> {
    let rows = laundromat::list_laundromats(&state.pool).await.map_err(record_error_to_status)?;
    Ok(Json(filter.apply(rows)))
}

/// `GET /api/laundromats/map`: map markers for the filtered directory.
pub async fn laundromat_map(
    State(state): State<AppState>,
    Query(filter): Query<LaundromatFilter>,
) -> Result<Json<Vec<MapMarker>>, StatusCode> {
    let rows = laundromat::list_laundromats(&state.pool).await.map_err(record_error_to_status)?;
    Ok(Json(laundromat::map_markers(&filter.apply(rows))))
}

/// `GET /api/laundromats/{id}`
pub async fn get_laundromat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LaundromatRow>, StatusCode> {
    let row = laundromat::get_laundromat(&state.pool, &id).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `POST /api/laundromats`
pub async fn create_laundromat(
    State(state): State<AppState>,
    Json(body): Json<NewLaundromat>,
) -> Result<(StatusCode, Json<LaundromatRow>), StatusCode> {
    let row = laundromat::create_laundromat(&state.pool, body).await.map_err(record_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PATCH /api/laundromats/{id}`
pub async fn update_laundromat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<LaundromatPatch>,
) -> Result<Json<LaundromatRow>, StatusCode> {
    let row = laundromat::update_laundromat(&state.pool, &id, body).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `GET /api/participating-laundromats`: locations with machine counts.
pub async fn list_participating(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<ParticipatingSummary, ParticipatingStats>>, StatusCode> {
    let (locations, machines) = tokio::try_join!(
        participating::list_participating(&state.pool),
        machine::list_machine_rows(&state.pool),
    )
    .map_err(record_error_to_status)?;

    let (rows, stats) = stats::participating_overview(locations, &machines);
    Ok(Json(ListResponse { rows, stats }))
}

/// `GET /api/participating-laundromats/{id}`
pub async fn get_participating(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ParticipatingLaundromatRow>, StatusCode> {
    let row = participating::get_participating(&state.pool, &id).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `POST /api/participating-laundromats`
pub async fn create_participating(
    State(state): State<AppState>,
    Json(body): Json<NewParticipatingLaundromat>,
) -> Result<(StatusCode, Json<ParticipatingLaundromatRow>), StatusCode> {
    let row = participating::create_participating(&state.pool, body).await.map_err(record_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PATCH /api/participating-laundromats/{id}`
pub async fn update_participating(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ParticipatingLaundromatPatch>,
) -> Result<Json<ParticipatingLaundromatRow>, StatusCode> {
    let row = participating::update_participating(&state.pool, &id, body)
        .await
        .map_err(record_error_to_status)?;
    Ok(Json(row))
}
