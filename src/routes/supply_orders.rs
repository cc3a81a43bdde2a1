//! Supply order routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::{ListResponse, StatusBody, record_error_to_status};
use crate::services::stats::{self, SupplyOrderStats};
use crate::services::supply_order::{self, NewSupplyOrder, OrderItemRow, SupplyOrderPatch, SupplyOrderRow};
use crate::state::AppState;

/// `GET /api/supply-orders`
pub async fn list_supply_orders(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<SupplyOrderRow, SupplyOrderStats>>, StatusCode> {
    let rows = supply_order::list_supply_orders(&state.pool).await.map_err(record_error_to_status)?;
    let stats = stats::supply_order_stats(&rows);
    Ok(Json(ListResponse { rows, stats }))
}

/// `GET /api/supply-orders/{id}`
pub async fn get_supply_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SupplyOrderRow>, StatusCode> {
    let row = supply_order::get_supply_order(&state.pool, &id).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `GET /api/supply-orders/{id}/items`
pub async fn list_order_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<OrderItemRow>>, StatusCode> {
    let rows = supply_order::list_order_items(&state.pool, &id).await.map_err(record_error_to_status)?;
    Ok(Json(rows))
}

/// `POST /api/supply-orders`
pub async fn create_supply_order(
    State(state): State<AppState>,
    Json(body): Json<NewSupplyOrder>,
) -> Result<(StatusCode, Json<SupplyOrderRow>), StatusCode> {
    let row = supply_order::create_supply_order(&state.pool, body).await.map_err(record_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PATCH /api/supply-orders/{id}`
pub async fn update_supply_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SupplyOrderPatch>,
) -> Result<Json<SupplyOrderRow>, StatusCode> {
    let row = supply_order::update_supply_order(&state.pool, &id, body)
        .await
        .map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `PATCH /api/supply-orders/{id}/status`
pub async fn update_supply_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<SupplyOrderRow>, StatusCode> {
    let row = supply_order::update_supply_order_status(&state.pool, &id, &body.status)
        .await
        .map_err(record_error_to_status)?;
    Ok(Json(row))
}
