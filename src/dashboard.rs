// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Filtering and display formatting for the drop table.
//!
//! Everything here is pure: rows in, a [`DashboardView`] out. Colors are not
//! decided here; each cell carries a [`CellTone`] and the HTML or terminal
//! layer maps tones to styles.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::exchange::infer_exchange;
use crate::models::{RecoveryQuality, ResultRow};

pub const DISPLAY_COLUMNS: [&str; 13] = [
    "Date",
    "Ticker",
    "Exchange",
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

/// Display intent of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellTone {
    Neutral,
    Positive,
    Warning,
    Critical,
}

impl CellTone {
    pub fn css_class(&self) -> &'static str {
        match self {
            CellTone::Neutral => "tone-neutral",
            CellTone::Positive => "tone-positive",
            CellTone::Warning => "tone-warning",
            CellTone::Critical => "tone-critical",
        }
    }

    /// Empty recovery date means the milestone was never reached
    pub fn for_recovery_date(date: Option<NaiveDate>) -> Self {
        match date {
            Some(_) => CellTone::Positive,
            None => CellTone::Critical,
        }
    }

    pub fn for_quality(quality: RecoveryQuality) -> Self {
        match quality {
            RecoveryQuality::Poor => CellTone::Critical,
            RecoveryQuality::Partial => CellTone::Warning,
            RecoveryQuality::Good | RecoveryQuality::Full => CellTone::Positive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    pub tone: CellTone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub date: String,
    pub ticker: String,
    pub exchange: String,
    pub drop_pct: String,
    pub open: String,
    pub close: String,
    pub recovery_50: Cell,
    pub recovery_75: Cell,
    pub recovery_90: Cell,
    pub best_recovery: String,
    pub quality: Cell,
    pub headline_tags: String,
    pub headline_link: String,
    pub has_link: bool,
    /// Never reached 90% recovery inside the window
    pub dimmed: bool,
}

/// User-selected filters. `None` selects everything, an empty set nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardFilter {
    pub tickers: Option<BTreeSet<String>>,
    pub qualities: Option<BTreeSet<RecoveryQuality>>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DashboardFilter {
    /// Build a filter from query parameters: repeated or comma separated
    /// `ticker`, `quality` slugs, and `from` / `to` as YYYY-MM-DD.
    ///
    /// A `ticker` or `quality` parameter that is present selects exactly the
    /// listed values, so a blank one selects nothing. `applied` marks a
    /// submitted filter form; browsers omit empty multiselects and unchecked
    /// boxes, so with it those sets start empty instead of meaning "all".
    /// Unparseable values are ignored.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let mut filter = DashboardFilter::default();

        if pairs.iter().any(|(key, _)| key == "applied") {
            filter.tickers = Some(BTreeSet::new());
            filter.qualities = Some(BTreeSet::new());
        }

        for (key, value) in pairs {
            match key.as_str() {
                "ticker" | "tickers" => {
                    let set = filter.tickers.get_or_insert_with(BTreeSet::new);
                    set.extend(
                        value
                            .split(',')
                            .map(|t| t.trim().to_uppercase())
                            .filter(|t| !t.is_empty()),
                    );
                }
                "quality" => {
                    let set = filter.qualities.get_or_insert_with(BTreeSet::new);
                    set.extend(value.split(',').filter_map(RecoveryQuality::from_slug));
                }
                "from" => filter.from = parse_date(value).or(filter.from),
                "to" => filter.to = parse_date(value).or(filter.to),
                _ => {}
            }
        }

        filter
    }

    pub fn matches(&self, row: &ResultRow) -> bool {
        self.tickers.as_ref().is_none_or(|t| t.contains(&row.ticker))
            && self.qualities.as_ref().is_none_or(|q| q.contains(&row.quality))
            && self.from.is_none_or(|from| row.date >= from)
            && self.to.is_none_or(|to| row.date <= to)
    }

    fn ticker_selected(&self, ticker: &str) -> bool {
        self.tickers.as_ref().is_none_or(|t| t.contains(ticker))
    }

    fn quality_selected(&self, quality: RecoveryQuality) -> bool {
        self.qualities.as_ref().is_none_or(|q| q.contains(&quality))
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerOption {
    pub symbol: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityOption {
    pub slug: String,
    pub label: String,
    pub selected: bool,
    /// Rows of this tier in the filtered view
    pub count: usize,
    pub tone: CellTone,
}

/// Everything the dashboard needs to draw one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub rows: Vec<DisplayRow>,
    pub total_rows: usize,
    pub tickers: Vec<TickerOption>,
    pub qualities: Vec<QualityOption>,
    /// Bounds of the whole table, YYYY-MM-DD or empty
    pub min_date: String,
    pub max_date: String,
    /// Effective date range of the filter, YYYY-MM-DD or empty
    pub from: String,
    pub to: String,
}

/// Filter, order and format `rows` for display. Newest drops come first.
pub fn render(rows: &[ResultRow], filter: &DashboardFilter) -> DashboardView {
    let min_date = rows.iter().map(|r| r.date).min();
    let max_date = rows.iter().map(|r| r.date).max();

    let mut selected: Vec<&ResultRow> = rows.iter().filter(|r| filter.matches(r)).collect();
    selected.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.ticker.cmp(&b.ticker)));

    let mut tier_counts: BTreeMap<RecoveryQuality, usize> = BTreeMap::new();
    for row in &selected {
        *tier_counts.entry(row.quality).or_default() += 1;
    }

    let symbols: BTreeSet<&str> = rows.iter().map(|r| r.ticker.as_str()).collect();
    let tickers = symbols
        .into_iter()
        .map(|symbol| TickerOption {
            symbol: symbol.to_string(),
            selected: filter.ticker_selected(symbol),
        })
        .collect();

    let qualities = RecoveryQuality::ALL
        .into_iter()
        .map(|quality| QualityOption {
            slug: quality.slug().to_string(),
            label: quality.label().to_string(),
            selected: filter.quality_selected(quality),
            count: tier_counts.get(&quality).copied().unwrap_or(0),
            tone: CellTone::for_quality(quality),
        })
        .collect();

    DashboardView {
        rows: selected.into_iter().map(display_row).collect(),
        total_rows: rows.len(),
        tickers,
        qualities,
        min_date: iso_or_empty(min_date),
        max_date: iso_or_empty(max_date),
        from: iso_or_empty(filter.from.or(min_date)),
        to: iso_or_empty(filter.to.or(max_date)),
    }
}

fn iso_or_empty(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Day and month only, e.g. "06 Jan"
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d %b").to_string()
}

/// Recovered fraction as a percentage, e.g. 1.2 -> "120.0%"
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn recovery_cell(date: Option<NaiveDate>) -> Cell {
    Cell {
        text: date.map(short_date).unwrap_or_default(),
        tone: CellTone::for_recovery_date(date),
    }
}

/// Only http(s) URLs are rendered as anchors; anything else stays plain text
fn is_web_link(link: &str) -> bool {
    let link = link.trim().to_ascii_lowercase();
    link.starts_with("https://") || link.starts_with("http://")
}

pub fn display_row(row: &ResultRow) -> DisplayRow {
    DisplayRow {
        date: short_date(row.date),
        ticker: row.ticker.clone(),
        exchange: infer_exchange(&row.ticker),
        drop_pct: format!("{:.2}", row.drop_pct),
        open: format!("{:.2}", row.open),
        close: format!("{:.2}", row.close),
        recovery_50: recovery_cell(row.recovery_date_50),
        recovery_75: recovery_cell(row.recovery_date_75),
        recovery_90: recovery_cell(row.recovery_date_90),
        best_recovery: percent(row.best_recovery),
        quality: Cell {
            text: row.quality.label().to_string(),
            tone: CellTone::for_quality(row.quality),
        },
        headline_tags: row.headline_tags.clone(),
        headline_link: row.headline_link.clone(),
        has_link: is_web_link(&row.headline_link),
        dimmed: row.recovery_date_90.is_none(),
    }
}

/// Plain-text table for the terminal
pub fn to_text_table(view: &DashboardView) -> String {
    let records: Vec<[&str; 13]> = view
        .rows
        .iter()
        .map(|r| {
            [
                r.date.as_str(),
                r.ticker.as_str(),
                r.exchange.as_str(),
                r.drop_pct.as_str(),
                r.open.as_str(),
                r.close.as_str(),
                r.recovery_50.text.as_str(),
                r.recovery_75.text.as_str(),
                r.recovery_90.text.as_str(),
                r.best_recovery.as_str(),
                r.quality.text.as_str(),
                r.headline_tags.as_str(),
                r.headline_link.as_str(),
            ]
        })
        .collect();

    let mut widths = DISPLAY_COLUMNS.map(|c| c.chars().count());
    for record in &records {
        for (width, cell) in widths.iter_mut().zip(record) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[&str; 13]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(&DISPLAY_COLUMNS)];
    lines.extend(records.iter().map(format_line));
    lines.join("\n")
}
