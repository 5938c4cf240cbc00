// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use csv::{Reader, WriterBuilder};
use std::fs;
use std::path::Path;

use crate::models::ResultRow;

/// Column order of the output table
pub const COLUMNS: [&str; 12] = [
    "Date",
    "Ticker",
    "% Drop",
    "Open",
    "Close",
    "Recovery Date 50%",
    "Recovery Date 75%",
    "Recovery Date 90%",
    "Best Recovery % Achieved",
    "Recovery Quality",
    "Headline Tags",
    "Headline Link",
];

/// Replace the table at `path` with `rows`. The header is written even when
/// there are no rows.
pub fn write_rows(path: &Path, rows: &[ResultRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create table file: {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Read a table written by [`write_rows`]. Tickers are trimmed and upper-cased.
pub fn read_rows(path: &Path) -> Result<Vec<ResultRow>> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open table file: {}", path.display()))?;

    let mut reader = Reader::from_reader(file);
    let mut rows = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let mut row: ResultRow =
            result.with_context(|| format!("Malformed row {} in {}", index + 1, path.display()))?;
        row.ticker = row.ticker.trim().to_uppercase();
        rows.push(row);
    }

    Ok(rows)
}
