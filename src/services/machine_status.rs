//! Simulated machine status feed.
//!
//! DESIGN
//! ======
//! A background task periodically assigns every machine a random status
//! drawn from a fixed weighted distribution, so the dashboard shows live
//! looking data without real telemetry. All machines are rewritten in one
//! `UPDATE ... FROM UNNEST(...)` statement per tick.
//!
//! ERROR HANDLING
//! ==============
//! A failed tick is logged and skipped; the next tick tries again from
//! scratch. Nothing is propagated to callers.

use std::time::Duration;

use rand::Rng;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::record::RecordError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineStatus {
    Idle,
    InUse,
    Maintenance,
    OutOfOrder,
}

impl MachineStatus {
    pub const ALL: [Self; 4] = [Self::Idle, Self::InUse, Self::Maintenance, Self::OutOfOrder];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InUse => "in_use",
            Self::Maintenance => "maintenance",
            Self::OutOfOrder => "out_of_order",
        }
    }

    /// Share of machines expected in this status on each tick.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            Self::Idle => 0.60,
            Self::InUse => 0.30,
            Self::Maintenance => 0.08,
            Self::OutOfOrder => 0.02,
        }
    }
}

/// Map a uniform sample in `[0, 1)` onto the weighted statuses. Samples
/// past the cumulative total (float rounding) fall back to `Idle`.
#[must_use]
pub fn pick_status(sample: f64) -> MachineStatus {
    let mut cumulative = 0.0;
    for status in MachineStatus::ALL {
        cumulative += status.weight();
        if sample < cumulative {
            return status;
        }
    }
    MachineStatus::Idle
}

/// Spawn the simulation loop: one tick immediately, then one per `interval`.
pub fn spawn_simulation_task(state: AppState, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "machine status simulation started");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            simulate_once(&state.pool).await;
        }
    })
}

/// One simulation tick. Returns the number of machines updated (0 on
/// failure or when there are no machines).
pub async fn simulate_once(pool: &PgPool) -> u64 {
    match assign_random_statuses(pool).await {
        Ok(0) => {
            info!("no machines to update");
            0
        }
        Ok(updated) => {
            info!(updated, "machine statuses updated");
            updated
        }
        Err(e) => {
            error!(error = %e, "machine status update failed");
            0
        }
    }
}

async fn assign_random_statuses(pool: &PgPool) -> Result<u64, RecordError> {
    let machine_ids: Vec<String> = sqlx::query_scalar("SELECT machine_id FROM machines").fetch_all(pool).await?;
    if machine_ids.is_empty() {
        return Ok(0);
    }

    let statuses: Vec<String> = {
        let mut rng = rand::rng();
        machine_ids.iter().map(|_| pick_status(rng.random::<f64>()).as_str().to_string()).collect()
    };

    let result = sqlx::query(
        r"UPDATE machines AS m
          SET status = u.status, updated_at = now()
          FROM UNNEST($1::text[], $2::text[]) AS u(machine_id, status)
          WHERE m.machine_id = u.machine_id",
    )
    .bind(&machine_ids)
    .bind(&statuses)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
