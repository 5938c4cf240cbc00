// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

use crate::models::{DropEvent, PriceBar};

/// Sort bars by date and collapse duplicate dates to a single bar.
///
/// The first bar seen for a date wins (the sort is stable, so provider order
/// breaks ties). Bars with a non-finite open or close are dropped.
pub fn normalize_bars(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    bars.retain(|b| b.open.is_finite() && b.close.is_finite());
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    bars
}

/// Open-to-close change as a fraction, `None` when the open is not positive
pub fn drop_pct(open: f64, close: f64) -> Option<f64> {
    if open > 0.0 {
        Some(close / open - 1.0)
    } else {
        None
    }
}

/// Find every trading day in `trading_days` whose bar closed at least
/// `threshold` below its open. Days without a bar are skipped.
pub fn detect_drops(
    ticker: &str,
    bars: &[PriceBar],
    trading_days: &[NaiveDate],
    threshold: f64,
) -> Vec<DropEvent> {
    let by_date: HashMap<NaiveDate, &PriceBar> = bars.iter().rev().map(|b| (b.date, b)).collect();

    let mut events = Vec::new();
    for day in trading_days {
        let Some(bar) = by_date.get(day) else {
            continue;
        };

        let Some(pct) = drop_pct(bar.open, bar.close) else {
            debug!(ticker, date = %day, open = bar.open, "skipping day with non-positive open");
            continue;
        };

        if pct <= threshold {
            events.push(DropEvent {
                ticker: ticker.to_string(),
                date: *day,
                open: bar.open,
                close: bar.close,
                drop_pct: pct,
            });
        }
    }

    events
}
