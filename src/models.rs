// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day for one ticker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, close: f64) -> Self {
        Self { date, open, close }
    }
}

/// A trading day whose open-to-close change met the drop threshold
#[derive(Debug, Clone, PartialEq)]
pub struct DropEvent {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    /// `close / open - 1`, as a fraction
    pub drop_pct: f64,
}

/// Recovery quality tier derived from the best recovered fraction in-window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecoveryQuality {
    #[serde(rename = "Full Recovery (90%+)")]
    Full,
    #[serde(rename = "Good Recovery (75-90%)")]
    Good,
    #[serde(rename = "Partial Recovery (50-75%)")]
    Partial,
    #[serde(rename = "Poor Recovery (<50%)")]
    Poor,
}

impl RecoveryQuality {
    pub const ALL: [RecoveryQuality; 4] = [
        RecoveryQuality::Full,
        RecoveryQuality::Good,
        RecoveryQuality::Partial,
        RecoveryQuality::Poor,
    ];

    /// Classify a best recovered fraction. NaN falls through to `Poor`.
    pub fn from_best(best_recovery: f64) -> Self {
        if best_recovery >= 0.90 {
            RecoveryQuality::Full
        } else if best_recovery >= 0.75 {
            RecoveryQuality::Good
        } else if best_recovery >= 0.50 {
            RecoveryQuality::Partial
        } else {
            RecoveryQuality::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecoveryQuality::Full => "Full Recovery (90%+)",
            RecoveryQuality::Good => "Good Recovery (75-90%)",
            RecoveryQuality::Partial => "Partial Recovery (50-75%)",
            RecoveryQuality::Poor => "Poor Recovery (<50%)",
        }
    }

    /// Short form used in dashboard query strings
    pub fn slug(&self) -> &'static str {
        match self {
            RecoveryQuality::Full => "full",
            RecoveryQuality::Good => "good",
            RecoveryQuality::Partial => "partial",
            RecoveryQuality::Poor => "poor",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        RecoveryQuality::ALL
            .into_iter()
            .find(|q| q.slug().eq_ignore_ascii_case(slug.trim()) || q.label() == slug)
    }
}

/// Outcome of scanning the window after a drop
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryOutcome {
    pub recovery_date_50: Option<NaiveDate>,
    pub recovery_date_75: Option<NaiveDate>,
    pub recovery_date_90: Option<NaiveDate>,
    pub best_recovery: f64,
    pub quality: RecoveryQuality,
}

pub const UNKNOWN: &str = "unknown";

/// Headline summary attached to a drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsAttachment {
    pub tags: String,
    pub link: String,
}

impl NewsAttachment {
    pub fn unknown() -> Self {
        Self {
            tags: UNKNOWN.to_string(),
            link: UNKNOWN.to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.tags == UNKNOWN && self.link == UNKNOWN
    }
}

/// One row of the output table. Field renames are the column contract shared
/// with the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Ticker")]
    pub ticker: String,
    #[serde(rename = "% Drop")]
    pub drop_pct: f64,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Recovery Date 50%")]
    pub recovery_date_50: Option<NaiveDate>,
    #[serde(rename = "Recovery Date 75%")]
    pub recovery_date_75: Option<NaiveDate>,
    #[serde(rename = "Recovery Date 90%")]
    pub recovery_date_90: Option<NaiveDate>,
    #[serde(rename = "Best Recovery % Achieved")]
    pub best_recovery: f64,
    #[serde(rename = "Recovery Quality")]
    pub quality: RecoveryQuality,
    #[serde(rename = "Headline Tags")]
    pub headline_tags: String,
    #[serde(rename = "Headline Link")]
    pub headline_link: String,
}

impl ResultRow {
    /// Assemble a row, rounding numeric columns the way the table stores them
    pub fn assemble(event: &DropEvent, outcome: &RecoveryOutcome, news: NewsAttachment) -> Self {
        Self {
            date: event.date,
            ticker: event.ticker.clone(),
            drop_pct: round2(event.drop_pct * 100.0),
            open: round2(event.open),
            close: round2(event.close),
            recovery_date_50: outcome.recovery_date_50,
            recovery_date_75: outcome.recovery_date_75,
            recovery_date_90: outcome.recovery_date_90,
            best_recovery: round2(outcome.best_recovery),
            quality: outcome.quality,
            headline_tags: news.tags,
            headline_link: news.link,
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// What happened to one ticker during a backfill run
#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    Analyzed { ticker: String, drops: usize },
    Failed { ticker: String, reason: String },
}

impl TickerOutcome {
    pub fn ticker(&self) -> &str {
        match self {
            TickerOutcome::Analyzed { ticker, .. } | TickerOutcome::Failed { ticker, .. } => ticker,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub rows: Vec<ResultRow>,
    pub outcomes: Vec<TickerOutcome>,
}

impl RunReport {
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                TickerOutcome::Failed { ticker, reason } => Some((ticker.as_str(), reason.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn analyzed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, TickerOutcome::Analyzed { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_boundaries_are_inclusive() {
        assert_eq!(RecoveryQuality::from_best(0.90), RecoveryQuality::Full);
        assert_eq!(RecoveryQuality::from_best(0.8999), RecoveryQuality::Good);
        assert_eq!(RecoveryQuality::from_best(0.75), RecoveryQuality::Good);
        assert_eq!(RecoveryQuality::from_best(0.7499), RecoveryQuality::Partial);
        assert_eq!(RecoveryQuality::from_best(0.50), RecoveryQuality::Partial);
        assert_eq!(RecoveryQuality::from_best(0.4999), RecoveryQuality::Poor);
        assert_eq!(RecoveryQuality::from_best(0.0), RecoveryQuality::Poor);
        assert_eq!(RecoveryQuality::from_best(1.2), RecoveryQuality::Full);
        assert_eq!(RecoveryQuality::from_best(f64::NAN), RecoveryQuality::Poor);
    }

    #[test]
    fn test_quality_slugs() {
        for quality in RecoveryQuality::ALL {
            assert_eq!(RecoveryQuality::from_slug(quality.slug()), Some(quality));
            assert_eq!(RecoveryQuality::from_slug(quality.label()), Some(quality));
        }
        assert_eq!(RecoveryQuality::from_slug("POOR"), Some(RecoveryQuality::Poor));
        assert_eq!(RecoveryQuality::from_slug("excellent"), None);
    }

    #[test]
    fn test_assemble_rounds_numeric_columns() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let event = DropEvent {
            ticker: "AAPL".to_string(),
            date,
            open: 100.004,
            close: 95.126,
            drop_pct: 95.126 / 100.004 - 1.0,
        };
        let outcome = RecoveryOutcome {
            recovery_date_50: None,
            recovery_date_75: None,
            recovery_date_90: None,
            best_recovery: 0.3333,
            quality: RecoveryQuality::Poor,
        };

        let row = ResultRow::assemble(&event, &outcome, NewsAttachment::unknown());

        assert_eq!(row.open, 100.0);
        assert_eq!(row.close, 95.13);
        assert_eq!(row.drop_pct, -4.88);
        assert_eq!(row.best_recovery, 0.33);
        assert_eq!(row.headline_tags, "unknown");
        assert_eq!(row.headline_link, "unknown");
    }

    #[test]
    fn test_run_report_counts() {
        let report = RunReport {
            rows: Vec::new(),
            outcomes: vec![
                TickerOutcome::Analyzed {
                    ticker: "AAPL".to_string(),
                    drops: 2,
                },
                TickerOutcome::Failed {
                    ticker: "BAD".to_string(),
                    reason: "boom".to_string(),
                },
            ],
        };

        assert_eq!(report.analyzed_count(), 1);
        assert_eq!(report.failures(), vec![("BAD", "boom")]);
        assert_eq!(report.outcomes[1].ticker(), "BAD");
    }
}
