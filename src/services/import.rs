//! Participating-laundromat import.
//!
//! DESIGN
//! ======
//! Pulls the participating-laundromats CSV export, maps it onto
//! `participating_laundromats` rows, then seeds each location with 8-15
//! generated machines. Inserts use multi-row `INSERT ... ON CONFLICT DO
//! NOTHING`, and only locations this run actually inserted get machines,
//! so re-running the import leaves existing locations and their machines
//! alone. Machines go in batches of [`MACHINE_BATCH_SIZE`].
//!
//! ERROR HANDLING
//! ==============
//! CSV rows without an id or name are skipped and counted. The first
//! failing fetch or insert aborts the run; earlier batches stay committed.

use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::{Date, Month, OffsetDateTime};
use tracing::{info, warn};

use super::machine::NewMachine;
use super::participating::NewParticipatingLaundromat;
use super::record::RecordError;
use crate::csv::{CsvCache, CsvDataset, CsvError, CsvRow};

pub const MACHINE_BATCH_SIZE: usize = 100;
pub const MIN_MACHINES_PER_LOCATION: usize = 8;
pub const MAX_MACHINES_PER_LOCATION: usize = 15;
const MACHINE_TYPES: [&str; 3] = ["Washer", "Dryer", "Combo"];
const MACHINE_STATUSES: [&str; 3] = ["Online", "Offline", "Maintenance"];
const MAINTENANCE_WINDOW_DAYS: i64 = 90;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("csv: {0}")]
    Csv(#[from] CsvError),
    #[error("record: {0}")]
    Record(#[from] RecordError),
}

impl From<sqlx::Error> for ImportError {
    fn from(e: sqlx::Error) -> Self {
        Self::Record(RecordError::Database(e))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub laundromats_inserted: u64,
    pub machines_generated: usize,
    pub machines_inserted: u64,
    pub machine_batches: usize,
}

// =============================================================================
// MAPPING
// =============================================================================

/// Export dates are `YYYY-MM-DD` or US-style `M/D/YYYY`.
#[must_use]
pub fn parse_export_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    let (year, month, day) = if let Some((y, rest)) = raw.split_once('-') {
        let (m, d) = rest.split_once('-')?;
        (y, m, d)
    } else {
        let (m, rest) = raw.split_once('/')?;
        let (d, y) = rest.split_once('/')?;
        (y, m, d)
    };

    let month = Month::try_from(month.trim().parse::<u8>().ok()?).ok()?;
    Date::from_calendar_date(year.trim().parse().ok()?, month, day.trim().parse().ok()?).ok()
}

/// Map one export row; `None` when the id or name is missing.
#[must_use]
pub fn participating_from_row(row: &CsvRow) -> Option<NewParticipatingLaundromat> {
    let laundromat_id = row.text("Participating Laundromat ID")?;
    let name = row.text("Laundromat Name")?;

    Some(NewParticipatingLaundromat {
        laundromat_id: Some(laundromat_id),
        name,
        address: row.text("Address"),
        phone_number: row.text("Phone Number"),
        hours_of_operation: row.text("Hours of Operation"),
        contact_person: row.text("Contact Person"),
        contact_email: row.text("Contact Email"),
        borough: row.first_text(&["Borough", "borough"]).map(str::to_string),
        rating: row.float("Rating"),
        onboarding_date: row.get("Onboarding Date").and_then(parse_export_date),
        contract_status: row.text("Contract Status"),
        payment_terms: row.text("Payment Terms"),
        commission_rate: row.float("Commission Rate"),
        average_monthly_revenue: row.float("Average Monthly Revenue"),
        last_revenue_update: row.get("Last Revenue Update").and_then(parse_export_date),
        admin_notes: row.text("Admin Notes"),
    })
}

/// Seed machines for one location. Ids are `MCH_<laundromat>_<NN>` and
/// types cycle Washer, Dryer, Combo; contract fields copy the location's.
pub fn generate_machines<R: Rng + ?Sized>(
    laundromat: &NewParticipatingLaundromat,
    today: Date,
    rng: &mut R,
) -> Vec<NewMachine> {
    let laundromat_id = laundromat.laundromat_id.clone().unwrap_or_default();
    let count = rng.random_range(MIN_MACHINES_PER_LOCATION..=MAX_MACHINES_PER_LOCATION);

    (0..count)
        .map(|i| {
            let days_ago = rng.random_range(0..MAINTENANCE_WINDOW_DAYS);
            NewMachine {
                machine_id: Some(format!("MCH_{laundromat_id}_{:02}", i + 1)),
                laundromat_id: laundromat_id.clone(),
                machine_type: MACHINE_TYPES[i % MACHINE_TYPES.len()].to_string(),
                status: Some(MACHINE_STATUSES[rng.random_range(0..MACHINE_STATUSES.len())].to_string()),
                last_maintenance: today.checked_sub(time::Duration::days(days_ago)),
                usage_percentage: Some(rng.random_range(0..100)),
                onboarding_date: laundromat.onboarding_date,
                contract_status: laundromat.contract_status.clone(),
                payment_terms: laundromat.payment_terms.clone(),
                commission_rate: laundromat.commission_rate,
                average_monthly_revenue: laundromat.average_monthly_revenue,
                last_revenue_update: laundromat.last_revenue_update,
                admin_notes: laundromat.admin_notes.clone(),
            }
        })
        .collect()
}

/// Locations whose id is in `inserted`, in export order.
#[must_use]
pub fn newly_inserted<'a>(
    laundromats: &'a [NewParticipatingLaundromat],
    inserted: &HashSet<String>,
) -> Vec<&'a NewParticipatingLaundromat> {
    laundromats
        .iter()
        .filter(|l| l.laundromat_id.as_ref().is_some_and(|id| inserted.contains(id)))
        .collect()
}

// =============================================================================
// IMPORT
// =============================================================================

/// Run the full import against the live export.
///
/// # Errors
///
/// Returns [`ImportError::Csv`] when the export cannot be fetched and
/// [`ImportError::Record`] when an insert fails.
pub async fn import_participating_laundromats(pool: &PgPool, csv: &CsvCache) -> Result<ImportReport, ImportError> {
    let rows = csv.load(CsvDataset::ParticipatingLaundromats).await?;

    let mut report = ImportReport { rows_read: rows.len(), ..ImportReport::default() };
    let laundromats: Vec<NewParticipatingLaundromat> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let mapped = participating_from_row(row);
            if mapped.is_none() {
                warn!(row = index + 1, "skipping participating laundromat without id or name");
            }
            mapped
        })
        .collect();
    report.rows_skipped = report.rows_read - laundromats.len();

    let mut inserted = HashSet::new();
    for chunk in laundromats.chunks(MACHINE_BATCH_SIZE) {
        inserted.extend(insert_laundromats(pool, chunk).await?);
    }
    report.laundromats_inserted = inserted.len() as u64;
    info!(inserted = report.laundromats_inserted, "participating laundromats imported");

    let machines: Vec<NewMachine> = {
        let today = OffsetDateTime::now_utc().date();
        let mut rng = rand::rng();
        newly_inserted(&laundromats, &inserted)
            .into_iter()
            .flat_map(|l| generate_machines(l, today, &mut rng))
            .collect()
    };
    report.machines_generated = machines.len();

    for (index, batch) in machines.chunks(MACHINE_BATCH_SIZE).enumerate() {
        let inserted = insert_machines(pool, batch).await?;
        report.machines_inserted += inserted;
        report.machine_batches += 1;
        info!(batch = index + 1, size = batch.len(), inserted, "machine batch inserted");
    }

    info!(
        laundromats = report.laundromats_inserted,
        machines = report.machines_inserted,
        skipped = report.rows_skipped,
        "participating laundromat import complete"
    );
    Ok(report)
}

/// Returns the ids that were inserted; conflicting rows are left untouched.
async fn insert_laundromats(pool: &PgPool, rows: &[NewParticipatingLaundromat]) -> Result<Vec<String>, ImportError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "INSERT INTO participating_laundromats (laundromat_id, name, address, phone_number, \
         hours_of_operation, contact_person, contact_email, borough, rating, onboarding_date, \
         contract_status, payment_terms, commission_rate, average_monthly_revenue, \
         last_revenue_update, admin_notes) ",
    );
    qb.push_values(rows, |mut b, row| {
        b.push_bind(row.laundromat_id.clone())
            .push_bind(row.name.clone())
            .push_bind(row.address.clone())
            .push_bind(row.phone_number.clone())
            .push_bind(row.hours_of_operation.clone())
            .push_bind(row.contact_person.clone())
            .push_bind(row.contact_email.clone())
            .push_bind(row.borough.clone())
            .push_bind(row.rating)
            .push_bind(row.onboarding_date)
            .push_bind(row.contract_status.clone())
            .push_bind(row.payment_terms.clone())
            .push_bind(row.commission_rate)
            .push_bind(row.average_monthly_revenue)
            .push_bind(row.last_revenue_update)
            .push_bind(row.admin_notes.clone());
    });
    qb.push(" ON CONFLICT (laundromat_id) DO NOTHING RETURNING laundromat_id");

    Ok(qb.build_query_scalar::<String>().fetch_all(pool).await?)
}

async fn insert_machines(pool: &PgPool, rows: &[NewMachine]) -> Result<u64, ImportError> {
    if rows.is_empty() {
        return Ok(0);
    }
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "INSERT INTO machines (machine_id, laundromat_id, machine_type, status, last_maintenance, \
         usage_percentage, onboarding_date, contract_status, payment_terms, commission_rate, \
         average_monthly_revenue, last_revenue_update, admin_notes) ",
    );
    qb.push_values(rows, |mut b, row| {
        b.push_bind(row.machine_id.clone())
            .push_bind(row.laundromat_id.clone())
            .push_bind(row.machine_type.clone())
            .push_bind(row.status.clone())
            .push_bind(row.last_maintenance)
            .push_bind(row.usage_percentage)
            .push_bind(row.onboarding_date)
            .push_bind(row.contract_status.clone())
            .push_bind(row.payment_terms.clone())
            .push_bind(row.commission_rate)
            .push_bind(row.average_monthly_revenue)
            .push_bind(row.last_revenue_update)
            .push_bind(row.admin_notes.clone());
    });
    qb.push(" ON CONFLICT (machine_id) DO NOTHING");

    Ok(qb.build().execute(pool).await?.rows_affected())
}

#[cfg(test)]
#[path = "import_test.rs"]
mod tests;
