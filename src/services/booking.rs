//! Laundry service bookings.
//!
//! Bookings carry snapshots of the user, laundromat and service names taken
//! at booking time; they are descriptive copies, not references kept in
//! sync with the source rows.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::record::{RecordError, UpdateBuilder, key_or_generate, required};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub booking_id: String,
    pub user_id: String,
    pub user_full_name_snapshot: Option<String>,
    pub user_phone_snapshot: Option<String>,
    pub participating_laundromat_id: Option<String>,
    pub laundromat_name_snapshot: Option<String>,
    pub service_type_id: Option<String>,
    pub service_name_snapshot: Option<String>,
    pub service_category_id_snapshot: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub booking_creation_timestamp: Option<OffsetDateTime>,
    pub current_booking_status: Option<String>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub payment_status: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_status_update_timestamp: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewBooking {
    pub booking_id: Option<String>,
    pub user_id: String,
    pub user_full_name_snapshot: Option<String>,
    pub user_phone_snapshot: Option<String>,
    pub participating_laundromat_id: Option<String>,
    pub laundromat_name_snapshot: Option<String>,
    pub service_type_id: Option<String>,
    pub service_name_snapshot: Option<String>,
    pub service_category_id_snapshot: Option<String>,
    /// Defaults to now when absent.
    #[serde(with = "time::serde::rfc3339::option")]
    pub booking_creation_timestamp: Option<OffsetDateTime>,
    pub current_booking_status: Option<String>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingPatch {
    pub user_id: Option<String>,
    pub user_full_name_snapshot: Option<String>,
    pub user_phone_snapshot: Option<String>,
    pub participating_laundromat_id: Option<String>,
    pub laundromat_name_snapshot: Option<String>,
    pub service_type_id: Option<String>,
    pub service_name_snapshot: Option<String>,
    pub service_category_id_snapshot: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub booking_creation_timestamp: Option<OffsetDateTime>,
    pub current_booking_status: Option<String>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub payment_status: Option<String>,
}

/// Newest bookings first; undated bookings last.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_bookings(pool: &PgPool) -> Result<Vec<BookingRow>, RecordError> {
    let rows = sqlx::query_as::<_, BookingRow>(
        "SELECT * FROM bookings ORDER BY booking_creation_timestamp DESC NULLS LAST, booking_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `booking_id`.
pub async fn get_booking(pool: &PgPool, booking_id: &str) -> Result<BookingRow, RecordError> {
    sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE booking_id = $1")
        .bind(booking_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("booking {booking_id}")))
}

/// # Errors
///
/// Returns [`RecordError::Invalid`] for a blank `user_id`, or a database error.
pub async fn create_booking(pool: &PgPool, new: NewBooking) -> Result<BookingRow, RecordError> {
    let user_id = required("user_id", &new.user_id)?;
    let booking_id = key_or_generate(new.booking_id);

    let row = sqlx::query_as::<_, BookingRow>(
        r"INSERT INTO bookings (
              booking_id, user_id, user_full_name_snapshot, user_phone_snapshot,
              participating_laundromat_id, laundromat_name_snapshot, service_type_id,
              service_name_snapshot, service_category_id_snapshot, booking_creation_timestamp,
              current_booking_status, estimated_cost, actual_cost, payment_status,
              last_status_update_timestamp
          ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, now()), $11, $12, $13, $14, now())
          RETURNING *",
    )
    .bind(&booking_id)
    .bind(&user_id)
    .bind(new.user_full_name_snapshot)
    .bind(new.user_phone_snapshot)
    .bind(new.participating_laundromat_id)
    .bind(new.laundromat_name_snapshot)
    .bind(new.service_type_id)
    .bind(new.service_name_snapshot)
    .bind(new.service_category_id_snapshot)
    .bind(new.booking_creation_timestamp)
    .bind(new.current_booking_status)
    .bind(new.estimated_cost)
    .bind(new.actual_cost)
    .bind(new.payment_status)
    .fetch_one(pool)
    .await?;

    tracing::info!(%booking_id, %user_id, "booking created");
    Ok(row)
}

/// Partial update. A status change also stamps `last_status_update_timestamp`.
///
/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `booking_id`.
pub async fn update_booking(pool: &PgPool, booking_id: &str, patch: BookingPatch) -> Result<BookingRow, RecordError> {
    let status_changed = patch.current_booking_status.is_some();

    let mut update = UpdateBuilder::new("bookings");
    update
        .set("user_id", patch.user_id)
        .set("user_full_name_snapshot", patch.user_full_name_snapshot)
        .set("user_phone_snapshot", patch.user_phone_snapshot)
        .set("participating_laundromat_id", patch.participating_laundromat_id)
        .set("laundromat_name_snapshot", patch.laundromat_name_snapshot)
        .set("service_type_id", patch.service_type_id)
        .set("service_name_snapshot", patch.service_name_snapshot)
        .set("service_category_id_snapshot", patch.service_category_id_snapshot)
        .set("booking_creation_timestamp", patch.booking_creation_timestamp)
        .set("current_booking_status", patch.current_booking_status)
        .set("estimated_cost", patch.estimated_cost)
        .set("actual_cost", patch.actual_cost)
        .set("payment_status", patch.payment_status);
    if status_changed {
        update.stamp("last_status_update_timestamp");
    }

    let mut query = update.finish("booking_id", booking_id);
    query
        .build_query_as::<BookingRow>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("booking {booking_id}")))
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `booking_id`.
pub async fn update_booking_status(pool: &PgPool, booking_id: &str, status: &str) -> Result<BookingRow, RecordError> {
    let status = required("status", status)?;
    update_booking(
        pool,
        booking_id,
        BookingPatch { current_booking_status: Some(status), ..BookingPatch::default() },
    )
    .await
}
