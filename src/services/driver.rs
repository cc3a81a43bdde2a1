//! Delivery drivers.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::record::{RecordError, UpdateBuilder, key_or_generate, required};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DriverRow {
    pub id: Uuid,
    pub driver_id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub vehicle_type: Option<String>,
    pub license_plate: Option<String>,
    pub current_status: Option<String>,
    pub is_active: Option<bool>,
    pub date_registered: Option<Date>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_status_update: Option<OffsetDateTime>,
    pub admin_notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewDriver {
    pub driver_id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub vehicle_type: Option<String>,
    pub license_plate: Option<String>,
    pub current_status: Option<String>,
    pub is_active: Option<bool>,
    pub date_registered: Option<Date>,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriverPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub license_plate: Option<String>,
    pub current_status: Option<String>,
    pub is_active: Option<bool>,
    pub date_registered: Option<Date>,
    pub admin_notes: Option<String>,
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_drivers(pool: &PgPool) -> Result<Vec<DriverRow>, RecordError> {
    let rows = sqlx::query_as::<_, DriverRow>("SELECT * FROM drivers ORDER BY full_name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `driver_id`.
pub async fn get_driver(pool: &PgPool, driver_id: &str) -> Result<DriverRow, RecordError> {
    sqlx::query_as::<_, DriverRow>("SELECT * FROM drivers WHERE driver_id = $1")
        .bind(driver_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("driver {driver_id}")))
}

/// # Errors
///
/// Returns [`RecordError::Invalid`] when name, email or phone is blank.
pub async fn create_driver(pool: &PgPool, new: NewDriver) -> Result<DriverRow, RecordError> {
    let full_name = required("full_name", &new.full_name)?;
    let email = required("email", &new.email)?;
    let phone_number = required("phone_number", &new.phone_number)?;
    let driver_id = key_or_generate(new.driver_id);

    let row = sqlx::query_as::<_, DriverRow>(
        r"INSERT INTO drivers (
              driver_id, full_name, email, phone_number, vehicle_type, license_plate,
              current_status, is_active, date_registered, last_status_update, admin_notes
          ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now(), $10)
          RETURNING *",
    )
    .bind(&driver_id)
    .bind(full_name)
    .bind(email)
    .bind(phone_number)
    .bind(new.vehicle_type)
    .bind(new.license_plate)
    .bind(new.current_status)
    .bind(new.is_active)
    .bind(new.date_registered)
    .bind(new.admin_notes)
    .fetch_one(pool)
    .await?;

    tracing::info!(%driver_id, "driver created");
    Ok(row)
}

/// Apply a partial update. Changing `current_status` or `is_active` also
/// stamps `last_status_update`.
///
/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `driver_id`.
pub async fn update_driver(pool: &PgPool, driver_id: &str, patch: DriverPatch) -> Result<DriverRow, RecordError> {
    let status_changed = patch.current_status.is_some() || patch.is_active.is_some();

    let mut update = UpdateBuilder::new("drivers");
    update
        .set("full_name", patch.full_name)
        .set("email", patch.email)
        .set("phone_number", patch.phone_number)
        .set("vehicle_type", patch.vehicle_type)
        .set("license_plate", patch.license_plate)
        .set("current_status", patch.current_status)
        .set("is_active", patch.is_active)
        .set("date_registered", patch.date_registered)
        .set("admin_notes", patch.admin_notes);
    if status_changed {
        update.stamp("last_status_update");
    }

    let mut query = update.finish("driver_id", driver_id);
    query
        .build_query_as::<DriverRow>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("driver {driver_id}")))
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `driver_id`.
pub async fn update_driver_status(pool: &PgPool, driver_id: &str, status: &str) -> Result<DriverRow, RecordError> {
    let status = required("status", status)?;
    update_driver(pool, driver_id, DriverPatch { current_status: Some(status), ..DriverPatch::default() }).await
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `driver_id`.
pub async fn update_driver_active(pool: &PgPool, driver_id: &str, is_active: bool) -> Result<DriverRow, RecordError> {
    update_driver(pool, driver_id, DriverPatch { is_active: Some(is_active), ..DriverPatch::default() }).await
}
