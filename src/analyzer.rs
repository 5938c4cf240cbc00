// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::api::MarketData;
use crate::calendar::TradingCalendar;
use crate::config::{AnalyzerConfig, Settings};
use crate::drops::{detect_drops, normalize_bars};
use crate::models::{ResultRow, RunReport, TickerOutcome};
use crate::news::{NewsSearch, news_for_drop};
use crate::recovery::scan_recovery;

/// Index members from config.toml when listed there, otherwise from the provider
pub async fn resolve_constituents<M: MarketData>(
    settings: &Settings,
    config: &AnalyzerConfig,
    market: &M,
) -> Result<Vec<String>> {
    if let Some(tickers) = settings.constituents_for(config.index) {
        info!(index = %config.index, count = tickers.len(), "Using constituents from config");
        return Ok(tickers.to_vec());
    }

    let tickers = market.index_constituents(config.index).await?;
    info!(index = %config.index, count = tickers.len(), "Fetched constituents");
    Ok(tickers)
}

/// Detect drops, scan recoveries and attach news for one ticker.
/// `trading_days` covers the configured date range.
pub async fn analyze_ticker<M: MarketData, N: NewsSearch>(
    config: &AnalyzerConfig,
    ticker: &str,
    market: &M,
    news: &N,
    trading_days: &[NaiveDate],
) -> Result<Vec<ResultRow>> {
    let bars = market
        .daily_bars(ticker, config.start_date, config.end_date)
        .await?;
    if bars.is_empty() {
        info!(ticker, "No price data");
        return Ok(Vec::new());
    }

    let bars = normalize_bars(bars);
    let events = detect_drops(ticker, &bars, trading_days, config.drop_threshold);

    let mut rows = Vec::with_capacity(events.len());
    for event in &events {
        info!(
            "Drop detected on {} for {}: {:.2}%",
            event.date,
            ticker,
            event.drop_pct * 100.0
        );

        let outcome = scan_recovery(event, &bars, config.lookahead_days);
        let attachment = news_for_drop(news, ticker, event.date).await;
        rows.push(ResultRow::assemble(event, &outcome, attachment));
    }

    Ok(rows)
}

/// Process every ticker in order. A failing ticker is recorded in the report
/// and skipped; it never stops the run.
pub async fn run_backfill<M: MarketData, N: NewsSearch, C: TradingCalendar>(
    config: &AnalyzerConfig,
    tickers: &[String],
    market: &M,
    news: &N,
    calendar: &C,
) -> Result<RunReport> {
    let progress = ProgressBar::new(tickers.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("=>-"),
    );

    let trading_days = calendar.trading_days(config.start_date, config.end_date);
    info!(
        count = trading_days.len(),
        "Trading days between {} and {}",
        config.start_date,
        config.end_date
    );

    let mut report = RunReport::default();

    for ticker in tickers {
        progress.set_message(format!("Processing {}", ticker));

        match analyze_ticker(config, ticker, market, news, &trading_days).await {
            Ok(rows) => {
                report.outcomes.push(TickerOutcome::Analyzed {
                    ticker: ticker.clone(),
                    drops: rows.len(),
                });
                report.rows.extend(rows);
            }
            Err(e) => {
                warn!(ticker = ticker.as_str(), "Error processing ticker: {:#}", e);
                report.outcomes.push(TickerOutcome::Failed {
                    ticker: ticker.clone(),
                    reason: format!("{:#}", e),
                });
            }
        }
        progress.inc(1);
    }
    progress.finish_with_message("Processing complete");

    report
        .rows
        .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.ticker.cmp(&b.ticker)));

    Ok(report)
}
