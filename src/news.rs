// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::models::{NewsAttachment, UNKNOWN};

/// News search provider
#[allow(async_fn_in_trait)]
pub trait NewsSearch {
    /// Articles mentioning `query` published on `date`, most relevant first
    async fn search(&self, query: &str, date: NaiveDate) -> Result<NewsApiResponse>;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsArticle {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}

pub struct NewsApiClient {
    client: Client,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(api_key: String) -> Result<Self> {
        // NewsAPI rejects requests without a User-Agent
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build news client")?;
        Ok(Self { client, api_key })
    }
}

impl NewsSearch for NewsApiClient {
    async fn search(&self, query: &str, date: NaiveDate) -> Result<NewsApiResponse> {
        let day = date.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get("https://newsapi.org/v2/everything")
            .query(&[
                ("q", query),
                ("from", day.as_str()),
                ("to", day.as_str()),
                ("sortBy", "relevancy"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Failed to send news request")?;

        response
            .json::<NewsApiResponse>()
            .await
            .context("Failed to parse news response")
    }
}

/// Stand-in used when no news credential is configured
pub struct NoNews;

impl NewsSearch for NoNews {
    async fn search(&self, _query: &str, _date: NaiveDate) -> Result<NewsApiResponse> {
        Ok(NewsApiResponse {
            status: "ok".to_string(),
            ..Default::default()
        })
    }
}

/// First five words of a headline, lowercased, comma separated
pub fn headline_tags(title: &str) -> String {
    title
        .split_whitespace()
        .take(5)
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pick the top article from a search response, or the sentinel
pub fn attachment_from_response(response: &NewsApiResponse) -> NewsAttachment {
    if response.status != "ok" || response.total_results == 0 {
        return NewsAttachment::unknown();
    }

    let Some(article) = response.articles.first() else {
        return NewsAttachment::unknown();
    };

    NewsAttachment {
        tags: article
            .title
            .as_deref()
            .map(headline_tags)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        link: article
            .url
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// Headline for a drop. Failures degrade to the sentinel and never propagate.
pub async fn news_for_drop<N: NewsSearch>(news: &N, ticker: &str, date: NaiveDate) -> NewsAttachment {
    match news.search(ticker, date).await {
        Ok(response) => {
            if response.status != "ok" {
                warn!(
                    ticker,
                    %date,
                    code = response.code.as_deref().unwrap_or(UNKNOWN),
                    "News provider error: {}",
                    response.message.as_deref().unwrap_or("no message")
                );
            }
            attachment_from_response(&response)
        }
        Err(e) => {
            warn!(ticker, %date, "News fetch error: {:#}", e);
            NewsAttachment::unknown()
        }
    }
}
