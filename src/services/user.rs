//! Customer accounts.
//!
//! PINs arrive in plain text on create/update and are stored only as a
//! SHA-256 hex digest; the digest is never serialized back out.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::record::{RecordError, UpdateBuilder, key_or_generate, required};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub user_id: String,
    pub phone_number: Option<String>,
    #[serde(skip_serializing)]
    pub pin_hash: Option<String>,
    pub full_name: String,
    pub email: Option<String>,
    pub default_pickup_address_street: Option<String>,
    pub default_pickup_address_city: Option<String>,
    pub default_pickup_address_state: Option<String>,
    pub default_pickup_address_zip: Option<String>,
    pub default_delivery_address_street: Option<String>,
    pub default_delivery_address_city: Option<String>,
    pub default_delivery_address_state: Option<String>,
    pub default_delivery_address_zip: Option<String>,
    pub preferred_laundromat_id: Option<String>,
    pub user_role: Option<String>,
    pub account_status: Option<String>,
    pub date_registered: Option<Date>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_timestamp: Option<OffsetDateTime>,
    pub admin_notes_user: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub user_id: Option<String>,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub pin: Option<String>,
    pub email: Option<String>,
    pub default_pickup_address_street: Option<String>,
    pub default_pickup_address_city: Option<String>,
    pub default_pickup_address_state: Option<String>,
    pub default_pickup_address_zip: Option<String>,
    pub default_delivery_address_street: Option<String>,
    pub default_delivery_address_city: Option<String>,
    pub default_delivery_address_state: Option<String>,
    pub default_delivery_address_zip: Option<String>,
    pub preferred_laundromat_id: Option<String>,
    pub user_role: Option<String>,
    pub account_status: Option<String>,
    pub date_registered: Option<Date>,
    pub admin_notes_user: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub pin: Option<String>,
    pub email: Option<String>,
    pub default_pickup_address_street: Option<String>,
    pub default_pickup_address_city: Option<String>,
    pub default_pickup_address_state: Option<String>,
    pub default_pickup_address_zip: Option<String>,
    pub default_delivery_address_street: Option<String>,
    pub default_delivery_address_city: Option<String>,
    pub default_delivery_address_state: Option<String>,
    pub default_delivery_address_zip: Option<String>,
    pub preferred_laundromat_id: Option<String>,
    pub user_role: Option<String>,
    pub account_status: Option<String>,
    pub date_registered: Option<Date>,
    pub admin_notes_user: Option<String>,
}

#[must_use]
pub fn hash_pin(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.trim().as_bytes());
    let bytes = hasher.finalize();
    bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
}

/// Digest of a supplied PIN; blank PINs count as absent.
fn pin_digest(pin: Option<&str>) -> Option<String> {
    pin.filter(|p| !p.trim().is_empty()).map(hash_pin)
}

/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_users(pool: &PgPool) -> Result<Vec<UserRow>, RecordError> {
    let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY full_name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `user_id`.
pub async fn get_user(pool: &PgPool, user_id: &str) -> Result<UserRow, RecordError> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("user {user_id}")))
}

/// # Errors
///
/// Returns [`RecordError::Invalid`] for a blank name, or a database error.
pub async fn create_user(pool: &PgPool, new: NewUser) -> Result<UserRow, RecordError> {
    let full_name = required("full_name", &new.full_name)?;
    let user_id = key_or_generate(new.user_id);
    let pin_hash = pin_digest(new.pin.as_deref());

    let row = sqlx::query_as::<_, UserRow>(
        r"INSERT INTO users (
              user_id, phone_number, pin_hash, full_name, email,
              default_pickup_address_street, default_pickup_address_city,
              default_pickup_address_state, default_pickup_address_zip,
              default_delivery_address_street, default_delivery_address_city,
              default_delivery_address_state, default_delivery_address_zip,
              preferred_laundromat_id, user_role, account_status, date_registered, admin_notes_user
          ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
          RETURNING *",
    )
    .bind(&user_id)
    .bind(new.phone_number)
    .bind(pin_hash)
    .bind(full_name)
    .bind(new.email)
    .bind(new.default_pickup_address_street)
    .bind(new.default_pickup_address_city)
    .bind(new.default_pickup_address_state)
    .bind(new.default_pickup_address_zip)
    .bind(new.default_delivery_address_street)
    .bind(new.default_delivery_address_city)
    .bind(new.default_delivery_address_state)
    .bind(new.default_delivery_address_zip)
    .bind(new.preferred_laundromat_id)
    .bind(new.user_role)
    .bind(new.account_status)
    .bind(new.date_registered)
    .bind(new.admin_notes_user)
    .fetch_one(pool)
    .await?;

    tracing::info!(%user_id, "user created");
    Ok(row)
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `user_id`.
pub async fn update_user(pool: &PgPool, user_id: &str, patch: UserPatch) -> Result<UserRow, RecordError> {
    let pin_hash = pin_digest(patch.pin.as_deref());

    let mut update = UpdateBuilder::new("users");
    update
        .set("full_name", patch.full_name)
        .set("phone_number", patch.phone_number)
        .set("pin_hash", pin_hash)
        .set("email", patch.email)
        .set("default_pickup_address_street", patch.default_pickup_address_street)
        .set("default_pickup_address_city", patch.default_pickup_address_city)
        .set("default_pickup_address_state", patch.default_pickup_address_state)
        .set("default_pickup_address_zip", patch.default_pickup_address_zip)
        .set("default_delivery_address_street", patch.default_delivery_address_street)
        .set("default_delivery_address_city", patch.default_delivery_address_city)
        .set("default_delivery_address_state", patch.default_delivery_address_state)
        .set("default_delivery_address_zip", patch.default_delivery_address_zip)
        .set("preferred_laundromat_id", patch.preferred_laundromat_id)
        .set("user_role", patch.user_role)
        .set("account_status", patch.account_status)
        .set("date_registered", patch.date_registered)
        .set("admin_notes_user", patch.admin_notes_user);

    let mut query = update.finish("user_id", user_id);
    query
        .build_query_as::<UserRow>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("user {user_id}")))
}
