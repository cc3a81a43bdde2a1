//! Supply orders: customers' product purchases, and their line items.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::record::{RecordError, UpdateBuilder, key_or_generate, required};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SupplyOrderRow {
    pub id: Uuid,
    pub supply_order_id: String,
    pub user_id: String,
    pub user_full_name_snapshot: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub order_timestamp: Option<OffsetDateTime>,
    pub delivery_address_street: Option<String>,
    pub delivery_address_city: Option<String>,
    pub delivery_address_state: Option<String>,
    pub delivery_address_zip: Option<String>,
    pub subtotal_amount: Option<f64>,
    pub total_order_amount: Option<f64>,
    pub order_status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method_snapshot: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated_timestamp: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_item_id: String,
    pub supply_order_id: String,
    pub product_id: Option<String>,
    pub product_name_snapshot: Option<String>,
    pub quantity_ordered: Option<i32>,
    pub unit_price_snapshot: Option<f64>,
    pub item_total: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewSupplyOrder {
    pub supply_order_id: Option<String>,
    pub user_id: String,
    pub user_full_name_snapshot: Option<String>,
    /// Defaults to now when absent.
    #[serde(with = "time::serde::rfc3339::option")]
    pub order_timestamp: Option<OffsetDateTime>,
    pub delivery_address_street: Option<String>,
    pub delivery_address_city: Option<String>,
    pub delivery_address_state: Option<String>,
    pub delivery_address_zip: Option<String>,
    pub subtotal_amount: Option<f64>,
    pub total_order_amount: Option<f64>,
    pub order_status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method_snapshot: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SupplyOrderPatch {
    pub user_id: Option<String>,
    pub user_full_name_snapshot: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub order_timestamp: Option<OffsetDateTime>,
    pub delivery_address_street: Option<String>,
    pub delivery_address_city: Option<String>,
    pub delivery_address_state: Option<String>,
    pub delivery_address_zip: Option<String>,
    pub subtotal_amount: Option<f64>,
    pub total_order_amount: Option<f64>,
    pub order_status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method_snapshot: Option<String>,
}

/// Newest orders first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_supply_orders(pool: &PgPool) -> Result<Vec<SupplyOrderRow>, RecordError> {
    let rows = sqlx::query_as::<_, SupplyOrderRow>(
        "SELECT * FROM supply_orders ORDER BY order_timestamp DESC NULLS LAST, supply_order_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `supply_order_id`.
pub async fn get_supply_order(pool: &PgPool, supply_order_id: &str) -> Result<SupplyOrderRow, RecordError> {
    sqlx::query_as::<_, SupplyOrderRow>("SELECT * FROM supply_orders WHERE supply_order_id = $1")
        .bind(supply_order_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("supply order {supply_order_id}")))
}

/// Line items of an order. An unknown order is `NotFound`, an order
/// without items is an empty list.
///
/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `supply_order_id`.
pub async fn list_order_items(pool: &PgPool, supply_order_id: &str) -> Result<Vec<OrderItemRow>, RecordError> {
    get_supply_order(pool, supply_order_id).await?;
    let rows = sqlx::query_as::<_, OrderItemRow>(
        "SELECT * FROM order_items WHERE supply_order_id = $1 ORDER BY order_item_id",
    )
    .bind(supply_order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// # Errors
///
/// Returns [`RecordError::Invalid`] for a blank `user_id`, or a database error.
pub async fn create_supply_order(pool: &PgPool, new: NewSupplyOrder) -> Result<SupplyOrderRow, RecordError> {
    let user_id = required("user_id", &new.user_id)?;
    let supply_order_id = key_or_generate(new.supply_order_id);

    let row = sqlx::query_as::<_, SupplyOrderRow>(
        r"INSERT INTO supply_orders (
              supply_order_id, user_id, user_full_name_snapshot, order_timestamp,
              delivery_address_street, delivery_address_city, delivery_address_state,
              delivery_address_zip, subtotal_amount, total_order_amount, order_status,
              payment_status, payment_method_snapshot, last_updated_timestamp
          ) VALUES ($1, $2, $3, COALESCE($4, now()), $5, $6, $7, $8, $9, $10, $11, $12, $13, now())
          RETURNING *",
    )
    .bind(&supply_order_id)
    .bind(&user_id)
    .bind(new.user_full_name_snapshot)
    .bind(new.order_timestamp)
    .bind(new.delivery_address_street)
    .bind(new.delivery_address_city)
    .bind(new.delivery_address_state)
    .bind(new.delivery_address_zip)
    .bind(new.subtotal_amount)
    .bind(new.total_order_amount)
    .bind(new.order_status)
    .bind(new.payment_status)
    .bind(new.payment_method_snapshot)
    .fetch_one(pool)
    .await?;

    tracing::info!(%supply_order_id, %user_id, "supply order created");
    Ok(row)
}

/// Partial update; every change stamps `last_updated_timestamp`.
///
/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `supply_order_id`.
pub async fn update_supply_order(
    pool: &PgPool,
    supply_order_id: &str,
    patch: SupplyOrderPatch,
) -> Result<SupplyOrderRow, RecordError> {
    let mut update = UpdateBuilder::new("supply_orders");
    update
        .set("user_id", patch.user_id)
        .set("user_full_name_snapshot", patch.user_full_name_snapshot)
        .set("order_timestamp", patch.order_timestamp)
        .set("delivery_address_street", patch.delivery_address_street)
        .set("delivery_address_city", patch.delivery_address_city)
        .set("delivery_address_state", patch.delivery_address_state)
        .set("delivery_address_zip", patch.delivery_address_zip)
        .set("subtotal_amount", patch.subtotal_amount)
        .set("total_order_amount", patch.total_order_amount)
        .set("order_status", patch.order_status)
        .set("payment_status", patch.payment_status)
        .set("payment_method_snapshot", patch.payment_method_snapshot)
        .stamp("last_updated_timestamp");

    let mut query = update.finish("supply_order_id", supply_order_id);
    query
        .build_query_as::<SupplyOrderRow>()
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RecordError::NotFound(format!("supply order {supply_order_id}")))
}

/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown `supply_order_id`.
pub async fn update_supply_order_status(
    pool: &PgPool,
    supply_order_id: &str,
    status: &str,
) -> Result<SupplyOrderRow, RecordError> {
    let status = required("status", status)?;
    update_supply_order(
        pool,
        supply_order_id,
        SupplyOrderPatch { order_status: Some(status), ..SupplyOrderPatch::default() },
    )
    .await
}
