//! CSV datasets: the static "Auro Backend Data" exports.
//!
//! DESIGN
//! ======
//! Some admin views read spreadsheet exports from object storage instead of
//! Postgres. The exports are fetched over HTTP, parsed with a deliberately
//! simple comma splitter, and kept in a process-wide cache that is never
//! invalidated: the exports are static for the lifetime of the process.
//!
//! LIMITATIONS
//! ===========
//! The parser does not understand quoting. Commas inside values split the
//! field and double quotes are dropped. Values stay text; callers coerce
//! with [`CsvRow::float`] where they need numbers.

pub mod cache;
pub mod dataset;
pub mod parse;
pub mod summary;

pub use cache::{CsvCache, CsvError, HttpCsvSource};
pub use dataset::CsvDataset;
pub use parse::CsvRow;
pub use summary::{DatasetSummary, summarize};
