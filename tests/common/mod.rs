// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Common test utilities and helpers
//!
//! Sample drop tables written to temporary directories, and an analyzer
//! configuration that does not depend on config.toml or the environment.

#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tempfile::TempDir;

use drop_recovery_rs::config::{AnalyzerConfig, StockIndex};
use drop_recovery_rs::drops_csv;
use drop_recovery_rs::models::{RecoveryQuality, ResultRow, UNKNOWN};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One row per recovery tier, spread over two weeks of March 2025
pub fn sample_rows() -> Vec<ResultRow> {
    vec![
        ResultRow {
            date: date(2025, 3, 3),
            ticker: "MSFT".to_string(),
            drop_pct: -5.0,
            open: 200.0,
            close: 190.0,
            recovery_date_50: None,
            recovery_date_75: None,
            recovery_date_90: None,
            best_recovery: 0.1,
            quality: RecoveryQuality::Poor,
            headline_tags: UNKNOWN.to_string(),
            headline_link: UNKNOWN.to_string(),
        },
        ResultRow {
            date: date(2025, 3, 4),
            ticker: "AAPL".to_string(),
            drop_pct: -4.0,
            open: 100.0,
            close: 96.0,
            recovery_date_50: Some(date(2025, 3, 5)),
            recovery_date_75: Some(date(2025, 3, 6)),
            recovery_date_90: Some(date(2025, 3, 7)),
            best_recovery: 1.0,
            quality: RecoveryQuality::Full,
            headline_tags: "apple, shares, slide, after, earnings".to_string(),
            headline_link: "https://example.com/aapl".to_string(),
        },
        ResultRow {
            date: date(2025, 3, 10),
            ticker: "NVDA".to_string(),
            drop_pct: -6.12,
            open: 120.5,
            close: 113.12,
            recovery_date_50: Some(date(2025, 3, 11)),
            recovery_date_75: Some(date(2025, 3, 12)),
            recovery_date_90: None,
            best_recovery: 0.8,
            quality: RecoveryQuality::Good,
            headline_tags: "nvidia, slides, on, export, curbs".to_string(),
            headline_link: "https://example.com/nvda".to_string(),
        },
        ResultRow {
            date: date(2025, 3, 10),
            ticker: "TSLA".to_string(),
            drop_pct: -3.5,
            open: 250.0,
            close: 241.25,
            recovery_date_50: Some(date(2025, 3, 13)),
            recovery_date_75: None,
            recovery_date_90: None,
            best_recovery: 0.62,
            quality: RecoveryQuality::Partial,
            headline_tags: UNKNOWN.to_string(),
            headline_link: UNKNOWN.to_string(),
        },
    ]
}

/// Write `rows` to a fresh table. Keep the TempDir alive for as long as the
/// path is used.
pub fn write_table(rows: &[ResultRow]) -> Result<(PathBuf, TempDir)> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("backfill_stock_drops.csv");
    drops_csv::write_rows(&path, rows)?;
    Ok((path, temp_dir))
}

pub fn analyzer_config(start: NaiveDate, end: NaiveDate) -> AnalyzerConfig {
    AnalyzerConfig {
        index: StockIndex::SP500,
        start_date: start,
        end_date: end,
        drop_threshold: -0.03,
        lookahead_days: 14,
        output_path: PathBuf::from("unused.csv"),
        news_api_key: None,
    }
}
