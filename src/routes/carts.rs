//! Shopping cart routes.
//!
//! Products are resolved against the catalog when added; later quantity
//! changes and removals only touch the cart.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::record_error_to_status;
use crate::services::cart::{Cart, CartView, MAX_LINE_QUANTITY};
use crate::services::product;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    pub product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct QuantityBody {
    pub quantity: u32,
}

/// `POST /api/carts`: start an empty cart.
pub async fn create_cart(State(state): State<AppState>) -> (StatusCode, Json<CartView>) {
    (StatusCode::CREATED, Json(state.carts.create().await))
}

/// `GET /api/carts/{id}`
pub async fn get_cart(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<CartView>, StatusCode> {
    state.carts.get(id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// `DELETE /api/carts/{id}`: empty the cart.
pub async fn clear_cart(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<CartView>, StatusCode> {
    let (_, view) = state.carts.update(id, Cart::clear).await.ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(view))
}

/// `POST /api/carts/{id}/items`: add one unit of a catalog product.
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddItemBody>,
) -> Result<Json<CartView>, StatusCode> {
    if state.carts.get(id).await.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    let product = product::get_product(&state.pool, &body.product_id)
        .await
        .map_err(record_error_to_status)?;

    let (_, view) = state.carts.update(id, |cart| cart.add(product)).await.ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(view))
}

/// `PATCH /api/carts/{id}/items/{product_id}`: set quantity; 0 removes,
/// above [`MAX_LINE_QUANTITY`] is 400.
pub async fn update_item(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(Uuid, String)>,
    Json(body): Json<QuantityBody>,
) -> Result<Json<CartView>, StatusCode> {
    if body.quantity > MAX_LINE_QUANTITY {
        tracing::warn!(%id, quantity = body.quantity, "cart quantity above line cap");
        return Err(StatusCode::BAD_REQUEST);
    }
    let (found, view) = state
        .carts
        .update(id, |cart| cart.set_quantity(&product_id, body.quantity))
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    if !found {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(view))
}

/// `DELETE /api/carts/{id}/items/{product_id}`
pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(Uuid, String)>,
) -> Result<Json<CartView>, StatusCode> {
    let (found, view) =
        state.carts.update(id, |cart| cart.remove(&product_id)).await.ok_or(StatusCode::NOT_FOUND)?;
    if !found {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(view))
}

#[cfg(test)]
#[path = "carts_test.rs"]
mod tests;
