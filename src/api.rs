// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::config::StockIndex;
use crate::models::PriceBar;

/// Market-data provider: index membership and daily bars
#[allow(async_fn_in_trait)]
pub trait MarketData {
    async fn index_constituents(&self, index: StockIndex) -> Result<Vec<String>>;

    /// Daily bars for `ticker` between `from` and `to` inclusive. May be empty.
    async fn daily_bars(&self, ticker: &str, from: NaiveDate, to: NaiveDate)
    -> Result<Vec<PriceBar>>;
}

pub struct FMPClient {
    client: Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct FMPHistoricalResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub historical: Vec<FMPHistoricalBar>,
}

#[derive(Debug, Deserialize)]
pub struct FMPHistoricalBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct FMPConstituent {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
}

impl FMPHistoricalResponse {
    pub fn into_bars(self) -> Vec<PriceBar> {
        self.historical
            .into_iter()
            .map(|b| PriceBar::new(b.date, b.open, b.close))
            .collect()
    }
}

impl FMPClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let text = response.text().await.context("Failed to get response text")?;

        if !status.is_success() {
            anyhow::bail!("API error: {} - {}", status, text);
        }

        Ok(text)
    }
}

impl MarketData for FMPClient {
    async fn index_constituents(&self, index: StockIndex) -> Result<Vec<String>> {
        let Some(endpoint) = index.fmp_constituent_endpoint() else {
            anyhow::bail!(
                "No constituent source for {}: add it to the [constituents] table in config.toml",
                index
            );
        };

        let url = format!(
            "https://financialmodelingprep.com/api/v3/{}?apikey={}",
            endpoint, self.api_key
        );
        let text = self.get_text(&url).await?;

        let constituents: Vec<FMPConstituent> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {} constituents", index))?;

        if constituents.is_empty() {
            anyhow::bail!("No constituents returned for {}", index);
        }

        Ok(constituents.into_iter().map(|c| c.symbol).collect())
    }

    async fn daily_bars(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        if ticker.is_empty() {
            anyhow::bail!("ticker empty");
        }

        let url = format!(
            "https://financialmodelingprep.com/api/v3/historical-price-full/{}?from={}&to={}&apikey={}",
            ticker,
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d"),
            self.api_key
        );
        let text = self.get_text(&url).await?;

        let response: FMPHistoricalResponse = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse price history for {}", ticker))?;

        Ok(response.into_bars())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_historical_response() {
        let json = r#"{
            "symbol": "AAPL",
            "historical": [
                {"date": "2025-01-03", "open": 243.36, "high": 244.18, "low": 241.89, "close": 243.36, "adjClose": 243.36, "volume": 40244114},
                {"date": "2025-01-02", "open": 248.93, "high": 249.1, "low": 241.82, "close": 243.85, "adjClose": 243.85, "volume": 55740731}
            ]
        }"#;

        let response: FMPHistoricalResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.symbol.as_deref(), Some("AAPL"));

        let bars = response.into_bars();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(bars[1].open, 248.93);
        assert_eq!(bars[1].close, 243.85);
    }

    #[test]
    fn test_parse_empty_historical_response() {
        // FMP answers unknown symbols with an empty object
        let response: FMPHistoricalResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_bars().is_empty());
    }

    #[test]
    fn test_parse_constituents() {
        let json = r#"[
            {"symbol": "MMM", "name": "3M", "sector": "Industrials", "subSector": "Industrial Conglomerates"},
            {"symbol": "AOS", "name": "A. O. Smith", "sector": "Industrials"}
        ]"#;

        let constituents: Vec<FMPConstituent> = serde_json::from_str(json).unwrap();
        let symbols: Vec<_> = constituents.into_iter().map(|c| c.symbol).collect();
        assert_eq!(symbols, vec!["MMM", "AOS"]);
    }
}
