//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! One module per table owns its row types and queries; `record` holds the
//! shared insert/update plumbing. `stats` computes dashboard figures from
//! fetched rows, `import` seeds the database from the CSV export and
//! `machine_status` runs the demo status feed.

pub mod booking;
pub mod cart;
pub mod driver;
pub mod import;
pub mod laundromat;
pub mod machine;
pub mod machine_status;
pub mod participating;
pub mod product;
pub mod record;
pub mod stats;
pub mod supply_order;
pub mod user;

#[cfg(test)]
pub mod fixtures;
