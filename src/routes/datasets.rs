//! CSV dataset views and the participating-laundromat import.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use super::{csv_error_to_status, import_error_to_status};
use crate::csv::{CsvDataset, CsvRow, DatasetSummary, summarize};
use crate::services::import::{self, ImportReport};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub dataset: &'static str,
    pub summary: DatasetSummary,
    pub rows: Vec<CsvRow>,
}

/// `GET /api/datasets/{dataset}`: cached export rows plus header figures.
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DatasetResponse>, StatusCode> {
    let dataset: CsvDataset = name.parse().map_err(csv_error_to_status)?;
    let rows = state.csv.get(dataset).await.map_err(csv_error_to_status)?;

    Ok(Json(DatasetResponse { dataset: dataset.slug(), summary: summarize(&rows), rows: rows.as_ref().clone() }))
}

/// `POST /api/admin/import/participating-laundromats`
pub async fn import_participating(State(state): State<AppState>) -> Result<Json<ImportReport>, StatusCode> {
    let report = import::import_participating_laundromats(&state.pool, &state.csv)
        .await
        .map_err(import_error_to_status)?;
    Ok(Json(report))
}

#[cfg(test)]
#[path = "datasets_test.rs"]
mod tests;
