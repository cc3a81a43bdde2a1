//! Header-card figures for CSV-backed admin views.

use std::collections::BTreeMap;

use serde::Serialize;

use super::parse::CsvRow;

/// Status columns in preference order. The exports disagree on casing.
pub const STATUS_COLUMNS: &[&str] = &[
    "status",
    "Status",
    "current_status",
    "Current Status",
    "Current Booking Status",
    "Order Status",
    "Account Status",
    "Contract Status",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub status_column: Option<String>,
    /// Lower-cased status -> row count. Rows without a value count as `unknown`.
    pub status_counts: BTreeMap<String, usize>,
}

#[must_use]
pub fn summarize(rows: &[CsvRow]) -> DatasetSummary {
    let status_column = rows
        .first()
        .and_then(|row| STATUS_COLUMNS.iter().find(|column| row.has_column(column)))
        .copied();

    let mut status_counts = BTreeMap::new();
    if let Some(column) = status_column {
        for row in rows {
            let status = row.get(column).map_or_else(|| "unknown".to_string(), str::to_lowercase);
            *status_counts.entry(status).or_insert(0) += 1;
        }
    }

    DatasetSummary { rows: rows.len(), status_column: status_column.map(str::to_string), status_counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse::parse_csv;

    #[test]
    fn empty_rows_have_no_status_column() {
        let summary = summarize(&[]);
        assert_eq!(summary.rows, 0);
        assert!(summary.status_column.is_none());
        assert!(summary.status_counts.is_empty());
    }

    #[test]
    fn counts_statuses_case_insensitively() {
        let rows = parse_csv("Order ID,Status\n1,Completed\n2,pending\n3,Pending\n4,\n5,Cancelled");
        let summary = summarize(&rows);
        assert_eq!(summary.rows, 5);
        assert_eq!(summary.status_column.as_deref(), Some("Status"));
        assert_eq!(summary.status_counts.get("pending"), Some(&2));
        assert_eq!(summary.status_counts.get("completed"), Some(&1));
        assert_eq!(summary.status_counts.get("cancelled"), Some(&1));
        assert_eq!(summary.status_counts.get("unknown"), Some(&1));
    }

    #[test]
    fn prefers_lowercase_status_column() {
        let rows = parse_csv("Status,status\nOld,New");
        let summary = summarize(&rows);
        assert_eq!(summary.status_column.as_deref(), Some("status"));
        assert_eq!(summary.status_counts.get("new"), Some(&1));
    }

    #[test]
    fn rows_without_status_column_only_count() {
        let rows = parse_csv("Product ID,Unit Price\nP1,3.50\nP2,4.00");
        let summary = summarize(&rows);
        assert_eq!(summary.rows, 2);
        assert!(summary.status_counts.is_empty());
    }
}
