//! Participating laundromats: locations under contract, which own machines.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::record::{RecordError, UpdateBuilder, key_or_generate, required, required_patch};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ParticipatingLaundromatRow {
    pub id: Uuid,
    pub laundromat_id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub hours_of_operation: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub borough: Option<String>,
    pub rating: Option<f64>,
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

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewParticipatingLaundromat {
    pub laundromat_id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub hours_of_operation: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub borough: Option<String>,
    pub rating: Option<f64>,
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
pub struct ParticipatingLaundromatPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub hours_of_operation: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub borough: Option<String>,
    pub rating: Option<f64>,
    pub onboarding_date: Option<Date>,
    pub contract_status: Option<String>,
    pub payment_terms: Option<String>,
    pub commission_rate: Option<f64>,
    pub average_monthly_revenue: Option<f64>,
    pub last_revenue_update: Option<Date>,
    pub admin_notes: Option<String>,
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_participating(pool: &PgPool) -> Result<Vec<ParticipatingLaundromatRow>, RecordError> {
    let rows = sqlx::query_as::<_, ParticipatingLaundromatRow>("SELECT * FROM participating_laundromats ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `laundromat_id`.
pub async fn get_participating(pool: &PgPool, laundromat_id: &str) -> Result<ParticipatingLaundromatRow, RecordError> {
    sqlx::query_as::<_, ParticipatingLaundromatRow>("SELECT * FROM participating_laundromats WHERE laundromat_id = $1")
        .bind(laundromat_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("participating laundromat {laundromat_id}")))
}

/// # Errors
///
/// Returns [`RecordError::Invalid`] for a blank name, or a database error.
pub async fn create_participating(
    pool: &PgPool,
    new: NewParticipatingLaundromat,
) -> Result<ParticipatingLaundromatRow, RecordError> {
    let name = required("name", &new.name)?;
    let laundromat_id = key_or_generate(new.laundromat_id);

    let row = sqlx::query_as::<_, ParticipatingLaundromatRow>(
        r"INSERT INTO participating_laundromats (
              laundromat_id, name, address, phone_number, hours_of_operation, contact_person,
              contact_email, borough, rating, onboarding_date, contract_status, payment_terms,
              commission_rate, average_monthly_revenue, last_revenue_update, admin_notes
          ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
          RETURNING *",
    )
    .bind(&laundromat_id)
    .bind(&name)
    .bind(new.address)
    .bind(new.phone_number)
    .bind(new.hours_of_operation)
    .bind(new.contact_person)
    .bind(new.contact_email)
    .bind(new.borough)
    .bind(new.rating)
    .bind(new.onboarding_date)
    .bind(new.contract_status)
    .bind(new.payment_terms)
    .bind(new.commission_rate)
    .bind(new.average_monthly_revenue)
    .bind(new.last_revenue_update)
    .bind(new.admin_notes)
    .fetch_one(pool)
    .await?;

    tracing::info!(%laundromat_id, "participating laundromat created");
    Ok(row)
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `laundromat_id`.
pub async fn update_participating(
    pool: &PgPool,
    laundromat_id: &str,
    patch: ParticipatingLaundromatPatch,
) -> Result<ParticipatingLaundromatRow, RecordError> {
    let name = required_patch("name", patch.name.as_deref())?;

    let mut update = UpdateBuilder::new("participating_laundromats");
    update
        .set("name", name)
        .set("address", patch.address)
        .set("phone_number", patch.phone_number)
        .set("hours_of_operation", patch.hours_of_operation)
        .set("contact_person", patch.contact_person)
        .set("contact_email", patch.contact_email)
        .set("borough", patch.borough)
        .set("rating", patch.rating)
        .set("onboarding_date", patch.onboarding_date)
        .set("contract_status", patch.contract_status)
        .set("payment_terms", patch.payment_terms)
        .set("commission_rate", patch.commission_rate)
        .set("average_monthly_revenue", patch.average_monthly_revenue)
        .set("last_revenue_update", patch.last_revenue_update)
        .set("admin_notes", patch.admin_notes);

    let mut query = update.finish("laundromat_id", laundromat_id);
    query
        .build_query_as::<ParticipatingLaundromatRow>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("participating laundromat {laundromat_id}")))
}
