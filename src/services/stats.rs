//! Aggregate figures for the dashboard views.
//!
//! DESIGN
//! ======
//! Every figure is recomputed from full, unfiltered result sets on each
//! request; nothing is cached or stored as a derived column. The compute
//! functions are pure over row slices so the routes can fetch once and
//! return rows and stats together.
//!
//! Status matching is case-insensitive throughout. "Pending" on the
//! dashboard is a substring match (`"pending_pickup"` counts), while the
//! supply-order page counts exact `pending` / `approved` values.

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::PgPool;
use time::Date;

use super::booking::BookingRow;
use super::driver::DriverRow;
use super::machine::MachineRow;
use super::participating::ParticipatingLaundromatRow;
use super::record::RecordError;
use super::supply_order::SupplyOrderRow;
use super::user::UserRow;
use super::{booking, driver, machine, supply_order, user};

const UNKNOWN: &str = "Unknown";

fn status_is(status: Option<&str>, expected: &str) -> bool {
    status.is_some_and(|s| s.eq_ignore_ascii_case(expected))
}

fn status_contains(status: Option<&str>, needle: &str) -> bool {
    status.is_some_and(|s| s.to_lowercase().contains(needle))
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_laundromats: usize,
    pub participating_laundromats: usize,
    pub total_machines: usize,
    pub broken_machines: usize,
    pub total_users: usize,
    pub active_drivers: usize,
    pub total_drivers: usize,
    pub pending_bookings: usize,
    pub total_bookings: usize,
    pub pending_orders: usize,
    pub total_orders: usize,
}

/// Row sets the dashboard is computed from.
pub struct DashboardInputs<'a> {
    pub laundromat_count: usize,
    pub participating_count: usize,
    pub machines: &'a [MachineRow],
    pub users: &'a [UserRow],
    pub drivers: &'a [DriverRow],
    pub bookings: &'a [BookingRow],
    pub supply_orders: &'a [SupplyOrderRow],
}

#[must_use]
pub fn dashboard_stats(inputs: &DashboardInputs<'_>) -> DashboardStats {
    DashboardStats {
        total_laundromats: inputs.laundromat_count,
        participating_laundromats: inputs.participating_count,
        total_machines: inputs.machines.len(),
        broken_machines: inputs
            .machines
            .iter()
            .filter(|m| status_is(m.status.as_deref(), "maintenance") || status_is(m.status.as_deref(), "offline"))
            .count(),
        total_users: inputs.users.len(),
        active_drivers: inputs.drivers.iter().filter(|d| d.is_active == Some(true)).count(),
        total_drivers: inputs.drivers.len(),
        pending_bookings: inputs
            .bookings
            .iter()
            .filter(|b| status_contains(b.current_booking_status.as_deref(), "pending"))
            .count(),
        total_bookings: inputs.bookings.len(),
        pending_orders: inputs
            .supply_orders
            .iter()
            .filter(|o| status_contains(o.order_status.as_deref(), "pending"))
            .count(),
        total_orders: inputs.supply_orders.len(),
    }
}

/// Fetch every input concurrently and compute the dashboard.
///
/// # Errors
///
/// Returns the first database error; partial figures are never reported.
pub async fn load_dashboard_stats(pool: &PgPool) -> Result<DashboardStats, RecordError> {
    let (laundromat_count, participating_count, machines, users, drivers, bookings, supply_orders) = tokio::try_join!(
        count_rows(pool, "laundromats"),
        count_rows(pool, "participating_laundromats"),
        machine::list_machine_rows(pool),
        user::list_users(pool),
        driver::list_drivers(pool),
        booking::list_bookings(pool),
        supply_order::list_supply_orders(pool),
    )?;

    Ok(dashboard_stats(&DashboardInputs {
        laundromat_count,
        participating_count,
        machines: &machines,
        users: &users,
        drivers: &drivers,
        bookings: &bookings,
        supply_orders: &supply_orders,
    }))
}

async fn count_rows(pool: &PgPool, table: &'static str) -> Result<usize, RecordError> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}")).fetch_one(pool).await?;
    Ok(usize::try_from(count).unwrap_or_default())
}

// =============================================================================
// BOOKINGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub revenue: f64,
}

/// Actual cost when set and non-zero, else the estimate, else 0.
fn booking_revenue(booking: &BookingRow) -> f64 {
    booking
        .actual_cost
        .filter(|cost| *cost != 0.0)
        .or(booking.estimated_cost)
        .unwrap_or(0.0)
}

#[must_use]
pub fn booking_stats(bookings: &[BookingRow]) -> BookingStats {
    BookingStats {
        total: bookings.len(),
        pending: bookings
            .iter()
            .filter(|b| status_contains(b.current_booking_status.as_deref(), "pending"))
            .count(),
        completed: bookings
            .iter()
            .filter(|b| status_contains(b.current_booking_status.as_deref(), "completed"))
            .count(),
        revenue: bookings.iter().map(booking_revenue).sum(),
    }
}

/// Bookings created on one (UTC) calendar day; `date` is `None` for
/// bookings without a creation timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDay {
    pub date: Option<Date>,
    pub count: usize,
    pub bookings: Vec<BookingRow>,
}

/// Group by creation day, newest day first, undated group last. Bookings
/// keep their input order within a day.
#[must_use]
pub fn group_bookings_by_day(bookings: &[BookingRow]) -> Vec<BookingDay> {
    let mut groups: BTreeMap<Option<Date>, Vec<BookingRow>> = BTreeMap::new();
    for row in bookings {
        let day = row.booking_creation_timestamp.map(|ts| ts.date());
        groups.entry(day).or_default().push(row.clone());
    }

    // BTreeMap orders None first; reversing puts it last and newest dates first.
    groups
        .into_iter()
        .rev()
        .map(|(date, bookings)| BookingDay { date, count: bookings.len(), bookings })
        .collect()
}

// =============================================================================
// DRIVERS / ORDERS / USERS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriverStats {
    pub total: usize,
    pub active: usize,
    pub available: usize,
    pub busy: usize,
    pub offline: usize,
}

#[must_use]
pub fn driver_stats(drivers: &[DriverRow]) -> DriverStats {
    let with_status = |expected: &[&str]| {
        drivers
            .iter()
            .filter(|d| expected.iter().any(|e| status_is(d.current_status.as_deref(), e)))
            .count()
    };
    DriverStats {
        total: drivers.len(),
        active: drivers.iter().filter(|d| d.is_active == Some(true)).count(),
        available: with_status(&["available"]),
        busy: with_status(&["busy", "on_delivery"]),
        offline: with_status(&["offline"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupplyOrderStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub revenue: f64,
}

#[must_use]
pub fn supply_order_stats(orders: &[SupplyOrderRow]) -> SupplyOrderStats {
    SupplyOrderStats {
        total: orders.len(),
        pending: orders.iter().filter(|o| status_is(o.order_status.as_deref(), "pending")).count(),
        approved: orders.iter().filter(|o| status_is(o.order_status.as_deref(), "approved")).count(),
        revenue: orders.iter().filter_map(|o| o.total_order_amount).sum(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
}

/// `active` is the exact, case-sensitive `"Active"` account status.
#[must_use]
pub fn user_stats(users: &[UserRow]) -> UserStats {
    UserStats {
        total: users.len(),
        active: users.iter().filter(|u| u.account_status.as_deref() == Some("Active")).count(),
    }
}

// =============================================================================
// PARTICIPATING LAUNDROMATS
// =============================================================================

/// A location with its machine counts.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipatingSummary {
    #[serde(flatten)]
    pub laundromat: ParticipatingLaundromatRow,
    pub total_machines: usize,
    pub active_machines: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParticipatingStats {
    pub total_locations: usize,
    pub average_rating: f64,
    pub total_machines: usize,
    pub active_machines: usize,
    pub borough_counts: BTreeMap<String, usize>,
}

fn machine_is_active(machine: &MachineRow) -> bool {
    status_is(machine.status.as_deref(), "active") || status_is(machine.status.as_deref(), "online")
}

/// Per-location machine counts plus the page totals. Unrated locations
/// count as 0 in the average; missing boroughs are grouped as "Unknown".
#[must_use]
pub fn participating_overview(
    locations: Vec<ParticipatingLaundromatRow>,
    machines: &[MachineRow],
) -> (Vec<ParticipatingSummary>, ParticipatingStats) {
    let mut per_location: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for m in machines {
        let entry = per_location.entry(m.laundromat_id.as_str()).or_default();
        entry.0 += 1;
        if machine_is_active(m) {
            entry.1 += 1;
        }
    }

    let mut stats = ParticipatingStats { total_locations: locations.len(), ..ParticipatingStats::default() };
    let mut rating_sum = 0.0;

    let summaries: Vec<ParticipatingSummary> = locations
        .into_iter()
        .map(|laundromat| {
            let (total_machines, active_machines) =
                per_location.get(laundromat.laundromat_id.as_str()).copied().unwrap_or_default();
            rating_sum += laundromat.rating.unwrap_or(0.0);
            stats.total_machines += total_machines;
            stats.active_machines += active_machines;
            let borough = laundromat.borough.clone().filter(|b| !b.is_empty()).unwrap_or_else(|| UNKNOWN.to_string());
            *stats.borough_counts.entry(borough).or_default() += 1;
            ParticipatingSummary { laundromat, total_machines, active_machines }
        })
        .collect();

    if stats.total_locations > 0 {
        #[allow(clippy::cast_precision_loss)]
        let count = stats.total_locations as f64;
        stats.average_rating = rating_sum / count;
    }
    (summaries, stats)
}

// =============================================================================
// MACHINES
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MachineStats {
    pub total: usize,
    pub washers: usize,
    pub dryers: usize,
    pub active: usize,
}

/// Accepts bare rows or the machine half of joined listings.
#[must_use]
pub fn machine_stats<'a>(machines: impl IntoIterator<Item = &'a MachineRow>) -> MachineStats {
    machines.into_iter().fold(MachineStats::default(), |mut acc, m| {
        acc.total += 1;
        if m.machine_type.eq_ignore_ascii_case("washer") {
            acc.washers += 1;
        } else if m.machine_type.eq_ignore_ascii_case("dryer") {
            acc.dryers += 1;
        }
        if machine_is_active(m) {
            acc.active += 1;
        }
        acc
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRevenue {
    pub name: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MachineAnalytics {
    pub status_distribution: Vec<StatusCount>,
    pub revenue_by_type: Vec<TypeRevenue>,
    pub total_machines: usize,
    pub total_revenue: f64,
}

/// Status distribution keeps the raw status text; revenue only counts
/// machines that report one.
#[must_use]
pub fn machine_analytics(machines: &[MachineRow]) -> MachineAnalytics {
    let mut statuses: BTreeMap<String, usize> = BTreeMap::new();
    let mut revenue: BTreeMap<String, f64> = BTreeMap::new();

    for m in machines {
        let status = m.status.clone().unwrap_or_else(|| UNKNOWN.to_string());
        *statuses.entry(status).or_default() += 1;
        if let Some(amount) = m.average_monthly_revenue {
            *revenue.entry(m.machine_type.clone()).or_default() += amount;
        }
    }

    let total_revenue = revenue.values().sum();
    MachineAnalytics {
        status_distribution: statuses.into_iter().map(|(name, value)| StatusCount { name, value }).collect(),
        revenue_by_type: revenue.into_iter().map(|(name, revenue)| TypeRevenue { name, revenue }).collect(),
        total_machines: machines.len(),
        total_revenue,
    }
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
