//! Dashboard overview and machine analytics.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use super::record_error_to_status;
use crate::services::stats::{self, DashboardStats, MachineAnalytics};
use crate::services::machine;
use crate::state::AppState;

/// `GET /api/dashboard/stats`: headline counts for the landing page.
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, StatusCode> {
    let stats = stats::load_dashboard_stats(&state.pool).await.map_err(record_error_to_status)?;
    Ok(Json(stats))
}

/// `GET /api/analytics/machines`: status distribution and revenue by type.
pub async fn machine_analytics(State(state): State<AppState>) -> Result<Json<MachineAnalytics>, StatusCode> {
    let machines = machine::list_machine_rows(&state.pool).await.map_err(record_error_to_status)?;
    Ok(Json(stats::machine_analytics(&machines)))
}
