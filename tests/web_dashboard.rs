// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests for the web interface
//!
//! Requests go straight to the router, no listening socket is needed.

mod common;

use anyhow::Result;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use std::path::PathBuf;
use tower::ServiceExt;

use common::{sample_rows, write_table};
use drop_recovery_rs::web::{AppState, server::create_app};

async fn get(table: PathBuf, uri: &str) -> Result<(StatusCode, String)> {
    let app = create_app(AppState::new(table));
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8(body.to_vec())?))
}

async fn get_json(table: PathBuf, uri: &str) -> Result<serde_json::Value> {
    let (status, body) = get(table, uri).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    Ok(serde_json::from_str(&body)?)
}

fn tickers(json: &serde_json::Value) -> Vec<String> {
    json["view"]["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["ticker"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let (status, body) = get(PathBuf::from("does-not-matter.csv"), "/health").await?;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_dashboard_loads() -> Result<()> {
    let (path, _dir) = write_table(&sample_rows())?;
    let (status, html) = get(path, "/").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Stock Drop &amp; Recovery Dashboard"));
    assert!(html.contains("Showing 4 of 4 drops"));
    assert!(html.contains("Recovery Date 50%"));
    assert!(html.contains("Full Recovery (90%+)"));
    // Links are rendered only for rows with a headline
    assert_eq!(html.matches(r#"target="_blank""#).count(), 2);
    assert!(html.contains("example.com"));
    // Drops that never reached 90% are dimmed
    assert!(html.contains(r#"class="dimmed""#));
    Ok(())
}

#[tokio::test]
async fn test_dashboard_applies_filters() -> Result<()> {
    let (path, _dir) = write_table(&sample_rows())?;
    let (status, html) = get(path, "/?ticker=AAPL&ticker=NVDA&quality=full").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Showing 1 of 4 drops"));
    assert!(html.contains(r#"<option value="AAPL" selected>"#));
    assert!(html.contains(r#"<option value="MSFT">"#));
    Ok(())
}

#[tokio::test]
async fn test_form_submitted_without_selection_shows_no_rows() -> Result<()> {
    let (path, _dir) = write_table(&sample_rows())?;

    let (status, html) = get(path.clone(), "/?applied=1&from=2025-03-01&to=2025-03-31").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Showing 0 of 4 drops"));
    assert!(!html.contains(" checked"));

    let (_, html) = get(path.clone(), "/?applied=1&ticker=TSLA").await?;
    assert!(html.contains("Showing 0 of 4 drops"));

    let json = get_json(path, "/api/drops?ticker=").await?;
    assert!(tickers(&json).is_empty());
    assert_eq!(json["view"]["total_rows"], 4);
    Ok(())
}

#[tokio::test]
async fn test_api_lists_newest_first() -> Result<()> {
    let (path, _dir) = write_table(&sample_rows())?;
    let json = get_json(path, "/api/drops").await?;

    assert_eq!(json["view"]["total_rows"], 4);
    assert_eq!(tickers(&json), vec!["NVDA", "TSLA", "AAPL", "MSFT"]);
    assert_eq!(json["view"]["min_date"], "2025-03-03");
    assert_eq!(json["view"]["max_date"], "2025-03-10");
    Ok(())
}

#[tokio::test]
async fn test_api_filters() -> Result<()> {
    let (path, _dir) = write_table(&sample_rows())?;

    let json = get_json(path.clone(), "/api/drops?tickers=msft,tsla").await?;
    assert_eq!(tickers(&json), vec!["TSLA", "MSFT"]);

    let json = get_json(path.clone(), "/api/drops?quality=good,partial").await?;
    assert_eq!(tickers(&json), vec!["NVDA", "TSLA"]);

    let json = get_json(path.clone(), "/api/drops?from=2025-03-04&to=2025-03-09").await?;
    assert_eq!(tickers(&json), vec!["AAPL"]);

    let json = get_json(path, "/api/drops?to=2025-02-01").await?;
    assert!(tickers(&json).is_empty());
    assert_eq!(json["view"]["total_rows"], 4);
    Ok(())
}

#[tokio::test]
async fn test_empty_table_renders() -> Result<()> {
    let (path, _dir) = write_table(&[])?;

    let (status, html) = get(path.clone(), "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Showing 0 of 0 drops"));

    let json = get_json(path, "/api/drops").await?;
    assert!(tickers(&json).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_table_is_server_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("missing.csv");

    let (status, body) = get(path.clone(), "/").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("missing.csv"));

    let (status, _) = get(path, "/api/drops").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

#[tokio::test]
async fn test_table_is_reread_per_request() -> Result<()> {
    let rows = sample_rows();
    let (path, _dir) = write_table(&rows[..1])?;

    let first = get_json(path.clone(), "/api/drops").await?;
    let again = get_json(path.clone(), "/api/drops").await?;
    assert_eq!(first, again);
    assert_eq!(tickers(&first), vec!["MSFT"]);

    drop_recovery_rs::drops_csv::write_rows(&path, &rows)?;
    let updated = get_json(path, "/api/drops").await?;
    assert_eq!(updated["view"]["total_rows"], 4);
    Ok(())
}
