// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use axum::http::StatusCode;
use std::path::Path;
use tracing::error;

use crate::dashboard::{self, DashboardFilter, DashboardView};
use crate::drops_csv;

/// Read the table and build the filtered view
pub fn load_view(table_path: &Path, filter: &DashboardFilter) -> Result<DashboardView> {
    let rows = drops_csv::read_rows(table_path)?;
    Ok(dashboard::render(&rows, filter))
}

/// Map a table loading failure to a response. The dashboard has nothing to
/// show without a table, so this is a server error.
pub fn table_error(table_path: &Path, e: anyhow::Error) -> (StatusCode, String) {
    error!("Failed to load {}: {:#}", table_path.display(), e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!(
            "Could not load drop table {}. Run the backfill command first.",
            table_path.display()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_view_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        let result = load_view(&path, &DashboardFilter::default());
        assert!(result.is_err());

        let (status, message) = table_error(&path, result.unwrap_err());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.contains("missing.csv"));
    }
}
