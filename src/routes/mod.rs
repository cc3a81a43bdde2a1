//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API behind the operations dashboard. Every page of the dashboard
//! maps onto one list endpoint (rows plus the page's aggregate figures)
//! and a create/update pair for its modal form.
//!
//! ERROR HANDLING
//! ==============
//! Handlers return `Result<_, StatusCode>`. Service errors are logged and
//! mapped to a status at the boundary by the `*_error_to_status` helpers
//! below; nothing is retried.

pub mod bookings;
pub mod carts;
pub mod dashboard;
pub mod datasets;
pub mod drivers;
pub mod laundromats;
pub mod machines;
pub mod products;
pub mod retell;
pub mod supply_orders;
pub mod users;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use serde::{Deserialize, Serialize};
use sqlx::error::ErrorKind;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::csv::CsvError;
use crate::services::import::ImportError;
use crate::services::record::RecordError;
use crate::state::AppState;
use crate::voice::VoiceError;

/// Build the full API router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/dashboard/stats", get(dashboard::dashboard_stats))
        .route("/api/analytics/machines", get(dashboard::machine_analytics))
        .route("/api/laundromats", get(laundromats::list_laundromats).post(laundromats::create_laundromat))
        .route("/api/laundromats/map", get(laundromats::laundromat_map))
        .route(
            "/api/laundromats/{id}",
            get(laundromats::get_laundromat).patch(laundromats::update_laundromat),
        )
        .route(
            "/api/participating-laundromats",
            get(laundromats::list_participating).post(laundromats::create_participating),
        )
        .route(
            "/api/participating-laundromats/{id}",
            get(laundromats::get_participating).patch(laundromats::update_participating),
        )
        .route("/api/machines", get(machines::list_machines).post(machines::create_machine))
        .route("/api/machines/page", get(machines::list_machines_page))
        .route("/api/machines/{id}", get(machines::get_machine).patch(machines::update_machine))
        .route("/api/machines/{id}/status", patch(machines::update_machine_status))
        .route("/api/drivers", get(drivers::list_drivers).post(drivers::create_driver))
        .route("/api/drivers/{id}", get(drivers::get_driver).patch(drivers::update_driver))
        .route("/api/drivers/{id}/status", patch(drivers::update_driver_status))
        .route("/api/drivers/{id}/active", patch(drivers::update_driver_active))
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/{id}", get(users::get_user).patch(users::update_user))
        .route("/api/bookings", get(bookings::list_bookings).post(bookings::create_booking))
        .route("/api/bookings/{id}", get(bookings::get_booking).patch(bookings::update_booking))
        .route("/api/bookings/{id}/status", patch(bookings::update_booking_status))
        .route(
            "/api/supply-orders",
            get(supply_orders::list_supply_orders).post(supply_orders::create_supply_order),
        )
        .route(
            "/api/supply-orders/{id}",
            get(supply_orders::get_supply_order).patch(supply_orders::update_supply_order),
        )
        .route("/api/supply-orders/{id}/status", patch(supply_orders::update_supply_order_status))
        .route("/api/supply-orders/{id}/items", get(supply_orders::list_order_items))
        .route("/api/products", get(products::list_products).post(products::create_product))
        .route("/api/datasets/{dataset}", get(datasets::get_dataset))
        .route("/api/admin/import/participating-laundromats", post(datasets::import_participating))
        .route("/api/carts", post(carts::create_cart))
        .route("/api/carts/{id}", get(carts::get_cart).delete(carts::clear_cart))
        .route("/api/carts/{id}/items", post(carts::add_item))
        .route(
            "/api/carts/{id}/items/{product_id}",
            patch(carts::update_item).delete(carts::remove_item),
        )
        .route("/api/retell", post(retell::connect))
        .route("/api/retell/start-conversation", post(retell::start_conversation))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// SHARED BODIES
// =============================================================================

/// Rows of a dashboard page together with its aggregate figures.
#[derive(Debug, Serialize)]
pub struct ListResponse<T, S> {
    pub rows: Vec<T>,
    pub stats: S,
}

/// Body of the `PATCH .../status` endpoints.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

pub(crate) fn record_error_to_status(err: RecordError) -> StatusCode {
    match err {
        RecordError::NotFound(what) => {
            warn!(%what, "record not found");
            StatusCode::NOT_FOUND
        }
        RecordError::Invalid(reason) => {
            warn!(%reason, "invalid record payload");
            StatusCode::BAD_REQUEST
        }
        RecordError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            warn!(error = %db, "duplicate record key");
            StatusCode::CONFLICT
        }
        RecordError::Database(sqlx::Error::Database(db))
            if matches!(
                db.kind(),
                ErrorKind::ForeignKeyViolation | ErrorKind::CheckViolation | ErrorKind::NotNullViolation
            ) =>
        {
            warn!(error = %db, "record rejected by database constraint");
            StatusCode::BAD_REQUEST
        }
        RecordError::Database(e) => {
            error!(error = %e, "database query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn csv_error_to_status(err: CsvError) -> StatusCode {
    match err {
        CsvError::UnknownDataset(name) => {
            warn!(%name, "unknown CSV dataset");
            StatusCode::NOT_FOUND
        }
        CsvError::HttpClientBuild(e) => {
            error!(error = %e, "CSV HTTP client unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        e @ (CsvError::Fetch(_) | CsvError::Status { .. }) => {
            error!(error = %e, "CSV dataset fetch failed");
            StatusCode::BAD_GATEWAY
        }
    }
}

pub(crate) fn import_error_to_status(err: ImportError) -> StatusCode {
    match err {
        ImportError::Csv(e) => csv_error_to_status(e),
        ImportError::Record(e) => record_error_to_status(e),
    }
}

pub(crate) fn voice_error_to_status(err: VoiceError) -> StatusCode {
    match err {
        VoiceError::HttpClientBuild(e) => {
            error!(error = %e, "voice HTTP client unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        e @ (VoiceError::Request(_) | VoiceError::Api { .. } | VoiceError::Response(_)) => {
            error!(error = %e, "voice agent call failed");
            StatusCode::BAD_GATEWAY
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
