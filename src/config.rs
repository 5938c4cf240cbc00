// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_DROP_THRESHOLD: f64 = -0.03;
pub const DEFAULT_LOOKAHEAD_DAYS: usize = 14;
pub const DEFAULT_OUTPUT_PATH: &str = "output/backfill_stock_drops.csv";

/// Supported stock indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum StockIndex {
    #[serde(rename = "S&P500")]
    SP500,
    #[serde(rename = "NASDAQ100")]
    Nasdaq100,
    #[serde(rename = "DOW30")]
    Dow30,
    #[serde(rename = "FTSE100")]
    FTSE100,
    #[serde(rename = "DAX")]
    DAX,
}

impl StockIndex {
    pub const ALL: [StockIndex; 5] = [
        StockIndex::SP500,
        StockIndex::Nasdaq100,
        StockIndex::Dow30,
        StockIndex::FTSE100,
        StockIndex::DAX,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StockIndex::SP500 => "S&P500",
            StockIndex::Nasdaq100 => "NASDAQ100",
            StockIndex::Dow30 => "DOW30",
            StockIndex::FTSE100 => "FTSE100",
            StockIndex::DAX => "DAX",
        }
    }

    /// FMP endpoint listing the index members, where FMP has one
    pub fn fmp_constituent_endpoint(&self) -> Option<&'static str> {
        match self {
            StockIndex::SP500 => Some("sp500_constituent"),
            StockIndex::Nasdaq100 => Some("nasdaq_constituent"),
            StockIndex::Dow30 => Some("dowjones_constituent"),
            StockIndex::FTSE100 | StockIndex::DAX => None,
        }
    }
}

impl fmt::Display for StockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for StockIndex {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl FromStr for StockIndex {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();

        match normalized.as_str() {
            "SP500" | "SANDP500" | "SPX" => Ok(StockIndex::SP500),
            "NASDAQ100" | "NASDAQ" | "NDX" => Ok(StockIndex::Nasdaq100),
            "DOW30" | "DOW" | "DOWJONES" | "DJIA" => Ok(StockIndex::Dow30),
            "FTSE100" | "FTSE" | "UKX" => Ok(StockIndex::FTSE100),
            "DAX" | "DAX40" => Ok(StockIndex::DAX),
            _ => anyhow::bail!(
                "Unknown index '{}'. Choose from: {}",
                s,
                StockIndex::ALL.map(|i| i.name()).join(", ")
            ),
        }
    }
}

/// Contents of config.toml. Every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub index: StockIndex,
    pub start_date: NaiveDate,
    /// Defaults to today when absent
    pub end_date: Option<NaiveDate>,
    pub drop_threshold: f64,
    pub lookahead_days: usize,
    pub output_path: PathBuf,
    /// Explicit member lists keyed by index name, e.g. `FTSE100 = ["BP.L", ...]`
    pub constituents: BTreeMap<String, Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index: StockIndex::SP500,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            end_date: None,
            drop_threshold: DEFAULT_DROP_THRESHOLD,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            constituents: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Configured member list for `index`, if any
    pub fn constituents_for(&self, index: StockIndex) -> Option<&[String]> {
        self.constituents
            .iter()
            .find(|(name, _)| {
                name.parse::<StockIndex>()
                    .map(|parsed| parsed == index)
                    .unwrap_or(false)
            })
            .map(|(_, tickers)| tickers.as_slice())
            .filter(|tickers| !tickers.is_empty())
    }
}

/// Load settings from `path`; a missing file yields the defaults
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        tracing::info!("No config file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_settings(&config_str)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

pub fn parse_settings(config_str: &str) -> Result<Settings> {
    Ok(toml::from_str(config_str)?)
}

/// Command-line values that take precedence over config.toml
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub index: Option<StockIndex>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub drop_threshold: Option<f64>,
    pub lookahead_days: Option<usize>,
    pub output_path: Option<PathBuf>,
}

/// Everything a backfill run needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub index: StockIndex,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub drop_threshold: f64,
    pub lookahead_days: usize,
    pub output_path: PathBuf,
    pub news_api_key: Option<String>,
}

impl AnalyzerConfig {
    pub fn resolve(
        settings: &Settings,
        overrides: Overrides,
        news_api_key: Option<String>,
    ) -> Result<Self> {
        let config = Self {
            index: overrides.index.unwrap_or(settings.index),
            start_date: overrides.start_date.unwrap_or(settings.start_date),
            end_date: overrides
                .end_date
                .or(settings.end_date)
                .unwrap_or_else(|| Local::now().date_naive()),
            drop_threshold: overrides.drop_threshold.unwrap_or(settings.drop_threshold),
            lookahead_days: overrides.lookahead_days.unwrap_or(settings.lookahead_days),
            output_path: overrides
                .output_path
                .unwrap_or_else(|| settings.output_path.clone()),
            news_api_key: news_api_key.filter(|k| !k.trim().is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.drop_threshold < 0.0 && self.drop_threshold > -1.0) {
            anyhow::bail!(
                "drop_threshold must be a negative fraction between -1 and 0, got {}",
                self.drop_threshold
            );
        }
        if self.lookahead_days == 0 {
            anyhow::bail!("lookahead_days must be at least 1");
        }
        if self.start_date > self.end_date {
            anyhow::bail!(
                "start_date {} is after end_date {}",
                self.start_date,
                self.end_date
            );
        }
        Ok(())
    }
}
