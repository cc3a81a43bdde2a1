//! Machines: washers and dryers installed at participating laundromats.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::record::{RecordError, UpdateBuilder, key_or_generate, required};

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 500;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MachineRow {
    pub id: Uuid,
    pub machine_id: String,
    pub laundromat_id: String,
    pub machine_type: String,
    pub status: Option<String>,
    pub last_maintenance: Option<Date>,
    pub usage_percentage: Option<i32>,
    pub onboarding_date: Option<Date>,
    pub contract_status: Option<String>,
    pub payment_terms: Option<String>,
    pub commission_rate: Option<f64>,
    pub average_monthly_revenue: Option<f64>,
    pub last_revenue_update: Option<Date>,
    pub admin_notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A machine with the contact details of the location it belongs to.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MachineListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub machine: MachineRow,
    pub laundromat_name: Option<String>,
    pub laundromat_address: Option<String>,
    pub laundromat_phone: Option<String>,
    pub laundromat_hours: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewMachine {
    pub machine_id: Option<String>,
    pub laundromat_id: String,
    pub machine_type: String,
    pub status: Option<String>,
    pub last_maintenance: Option<Date>,
    pub usage_percentage: Option<i32>,
    pub onboarding_date: Option<Date>,
    pub contract_status: Option<String>,
    pub payment_terms: Option<String>,
    pub commission_rate: Option<f64>,
    pub average_monthly_revenue: Option<f64>,
    pub last_revenue_update: Option<Date>,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MachinePatch {
    pub laundromat_id: Option<String>,
    pub machine_type: Option<String>,
    pub status: Option<String>,
    pub last_maintenance: Option<Date>,
    pub usage_percentage: Option<i32>,
    pub onboarding_date: Option<Date>,
    pub contract_status: Option<String>,
    pub payment_terms: Option<String>,
    pub commission_rate: Option<f64>,
    pub average_monthly_revenue: Option<f64>,
    pub last_revenue_update: Option<Date>,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PageParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// `(offset, limit)` with defaults applied and the limit clamped.
    #[must_use]
    pub fn normalized(self) -> (i64, i64) {
        let offset = self.offset.unwrap_or(0).max(0);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
        (offset, limit)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MachinePage {
    pub machines: Vec<MachineListing>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

const LISTING_SELECT: &str = r"SELECT m.*,
           pl.name AS laundromat_name,
           pl.address AS laundromat_address,
           pl.phone_number AS laundromat_phone,
           pl.hours_of_operation AS laundromat_hours
    FROM machines m
    JOIN participating_laundromats pl ON pl.laundromat_id = m.laundromat_id
    ORDER BY m.machine_id";

// =============================================================================
// QUERIES
// =============================================================================

/// Every machine with its location, ordered by `machine_id`.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_machines(pool: &PgPool) -> Result<Vec<MachineListing>, RecordError> {
    let rows = sqlx::query_as::<_, MachineListing>(LISTING_SELECT).fetch_all(pool).await?;
    Ok(rows)
}

/// One page of machines plus the exact total.
///
/// # Errors
///
/// Returns a database error if either query fails.
pub async fn list_machines_page(pool: &PgPool, params: PageParams) -> Result<MachinePage, RecordError> {
    let (offset, limit) = params.normalized();

    let machines = sqlx::query_as::<_, MachineListing>(&format!("{LISTING_SELECT} LIMIT $1 OFFSET $2"))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM machines").fetch_one(pool).await?;

    Ok(MachinePage { machines, total, offset, limit })
}

/// Bare machine rows (no join), used by aggregate views.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_machine_rows(pool: &PgPool) -> Result<Vec<MachineRow>, RecordError> {
    let rows = sqlx::query_as::<_, MachineRow>("SELECT * FROM machines ORDER BY machine_id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `machine_id`.
pub async fn get_machine(pool: &PgPool, machine_id: &str) -> Result<MachineRow, RecordError> {
    sqlx::query_as::<_, MachineRow>("SELECT * FROM machines WHERE machine_id = $1")
        .bind(machine_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("machine {machine_id}")))
}

// =============================================================================
// WRITES
// =============================================================================

/// # Errors
///
/// Returns [`RecordError::Invalid`] when the owning laundromat or machine
/// type is blank; the database rejects unknown laundromats.
pub async fn create_machine(pool: &PgPool, new: NewMachine) -> Result<MachineRow, RecordError> {
    let laundromat_id = required("laundromat_id", &new.laundromat_id)?;
    let machine_type = required("machine_type", &new.machine_type)?;
    let machine_id = key_or_generate(new.machine_id);

    let row = sqlx::query_as::<_, MachineRow>(
        r"INSERT INTO machines (
              machine_id, laundromat_id, machine_type, status, last_maintenance, usage_percentage,
              onboarding_date, contract_status, payment_terms, commission_rate,
              average_monthly_revenue, last_revenue_update, admin_notes
          ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
          RETURNING *",
    )
    .bind(&machine_id)
    .bind(&laundromat_id)
    .bind(&machine_type)
    .bind(new.status)
    .bind(new.last_maintenance)
    .bind(new.usage_percentage)
    .bind(new.onboarding_date)
    .bind(new.contract_status)
    .bind(new.payment_terms)
    .bind(new.commission_rate)
    .bind(new.average_monthly_revenue)
    .bind(new.last_revenue_update)
    .bind(new.admin_notes)
    .fetch_one(pool)
    .await?;

    tracing::info!(%machine_id, %laundromat_id, "machine created");
    Ok(row)
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `machine_id`.
pub async fn update_machine(pool: &PgPool, machine_id: &str, patch: MachinePatch) -> Result<MachineRow, RecordError> {
    let mut update = UpdateBuilder::new("machines");
    update
        .set("laundromat_id", patch.laundromat_id)
        .set("machine_type", patch.machine_type)
        .set("status", patch.status)
        .set("last_maintenance", patch.last_maintenance)
        .set("usage_percentage", patch.usage_percentage)
        .set("onboarding_date", patch.onboarding_date)
        .set("contract_status", patch.contract_status)
        .set("payment_terms", patch.payment_terms)
        .set("commission_rate", patch.commission_rate)
        .set("average_monthly_revenue", patch.average_monthly_revenue)
        .set("last_revenue_update", patch.last_revenue_update)
        .set("admin_notes", patch.admin_notes);

    let mut query = update.finish("machine_id", machine_id);
    query
        .build_query_as::<MachineRow>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("machine {machine_id}")))
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `machine_id`.
pub async fn update_machine_status(pool: &PgPool, machine_id: &str, status: &str) -> Result<MachineRow, RecordError> {
    let status = required("status", status)?;
    update_machine(pool, machine_id, MachinePatch { status: Some(status), ..MachinePatch::default() }).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_default_to_first_fifty() {
        assert_eq!(PageParams::default().normalized(), (0, DEFAULT_PAGE_LIMIT));
    }

    #[test]
    fn page_params_clamp_out_of_range_values() {
        let params = PageParams { offset: Some(-10), limit: Some(10_000) };
        assert_eq!(params.normalized(), (0, MAX_PAGE_LIMIT));

        let params = PageParams { offset: Some(100), limit: Some(0) };
        assert_eq!(params.normalized(), (100, 1));
    }

    #[test]
    fn new_machine_deserializes_iso_dates() {
        let new: NewMachine = serde_json::from_str(
            r#"{"laundromat_id":"PL1","machine_type":"Washer","last_maintenance":"2024-03-09","commission_rate":0.15}"#,
        )
        .unwrap();
        assert_eq!(new.last_maintenance, Some(time::macros::date!(2024 - 03 - 09)));
        assert_eq!(new.machine_id, None);
        assert_eq!(new.commission_rate, Some(0.15));
    }
}
