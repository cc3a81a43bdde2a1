//! Product catalog routes.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::record_error_to_status;
use crate::services::product::{self, NewProduct, Product, ProductQuery};
use crate::state::AppState;

/// `GET /api/products?search&sort`
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, StatusCode> {
    let products = product::list_products(&state.pool).await.map_err(record_error_to_status)?;
    Ok(Json(query.apply(products)))
}

/// `POST /api/products`
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), StatusCode> {
    let row = product::create_product(&state.pool, body).await.map_err(record_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}
