//! Booking routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use super::{StatusBody, record_error_to_status};
use crate::services::booking::{self, BookingPatch, BookingRow, NewBooking};
use crate::services::stats::{self, BookingDay, BookingStats};
use crate::state::AppState;

/// Bookings page: flat rows, figures, and the same rows grouped by day.
#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub rows: Vec<BookingRow>,
    pub stats: BookingStats,
    pub by_day: Vec<BookingDay>,
}

/// `GET /api/bookings`
pub async fn list_bookings(State(state): State<AppState>) -> Result<Json<BookingListResponse>, StatusCode> {
    let rows = booking::list_bookings(&state.pool).await.map_err(record_error_to_status)?;
    let stats = stats::booking_stats(&rows);
    let by_day = stats::group_bookings_by_day(&rows);
    Ok(Json(BookingListResponse { rows, stats, by_day }))
}

/// `GET /api/bookings/{id}`
pub async fn get_booking(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<BookingRow>, StatusCode> {
    let row = booking::get_booking(&state.pool, &id).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `POST /api/bookings`
pub async fn create_booking(
    State(state): State<AppState>,
    Json(body): Json<NewBooking>,
) -> Result<(StatusCode, Json<BookingRow>), StatusCode> {
    let row = booking::create_booking(&state.pool, body).await.map_err(record_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `PATCH /api/bookings/{id}`
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<BookingPatch>,
) -> Result<Json<BookingRow>, StatusCode> {
    let row = booking::update_booking(&state.pool, &id, body).await.map_err(record_error_to_status)?;
    Ok(Json(row))
}

/// `PATCH /api/bookings/{id}/status`
pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<BookingRow>, StatusCode> {
    let row = booking::update_booking_status(&state.pool, &id, &body.status)
        .await
        .map_err(record_error_to_status)?;
    Ok(Json(row))
}
