// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::env;
use std::path::PathBuf;

use drop_recovery_rs::analyzer::{resolve_constituents, run_backfill};
use drop_recovery_rs::api::FMPClient;
use drop_recovery_rs::calendar::NyseCalendar;
use drop_recovery_rs::config::{self, AnalyzerConfig, Overrides, Settings, StockIndex};
use drop_recovery_rs::dashboard::{self, DashboardFilter};
use drop_recovery_rs::models::RunReport;
use drop_recovery_rs::news::{NewsApiClient, NoNews};
use drop_recovery_rs::{drops_csv, web};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config.toml
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Detect drops, track recoveries and write the drop table
    Backfill(BackfillArgs),
    /// List supported indices
    ListIndices,
    /// Print the drop table with dashboard filters applied
    Show {
        /// Table to read (defaults to output_path from the config)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Tickers to include (comma-separated)
        #[arg(long, value_delimiter = ',')]
        ticker: Vec<String>,
        /// Recovery tiers to include: full, good, partial, poor (comma-separated)
        #[arg(long, value_delimiter = ',')]
        quality: Vec<String>,
        /// First drop date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last drop date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Start the dashboard web server
    Serve {
        /// Port to bind to
        #[arg(long, default_value = "3000")]
        port: u16,
        /// Table to serve (defaults to output_path from the config)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Default, Args)]
struct BackfillArgs {
    /// Index to analyze: S&P500, NASDAQ100, DOW30, FTSE100 or DAX
    #[arg(long)]
    index: Option<StockIndex>,
    /// Start date (YYYY-MM-DD format)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// End date (YYYY-MM-DD format), defaults to today
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Drop threshold as a negative fraction, e.g. -0.03
    #[arg(long, allow_negative_numbers = true)]
    threshold: Option<f64>,
    /// Number of trading days to watch for a recovery
    #[arg(long)]
    lookahead: Option<usize>,
    /// Output CSV path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl From<BackfillArgs> for Overrides {
    fn from(args: BackfillArgs) -> Self {
        Overrides {
            index: args.index,
            start_date: args.from,
            end_date: args.to,
            drop_threshold: args.threshold,
            lookahead_days: args.lookahead,
            output_path: args.output,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let settings = config::load_settings(&cli.config)?;

    match cli.command {
        Some(Commands::Backfill(args)) => backfill(&settings, args).await?,
        Some(Commands::ListIndices) => {
            println!("Supported indices:");
            for index in StockIndex::ALL {
                let source = if settings.constituents_for(index).is_some() {
                    "config.toml"
                } else if index.fmp_constituent_endpoint().is_some() {
                    "FMP"
                } else {
                    "not configured"
                };
                println!("  {} ({})", index, source);
            }
        }
        Some(Commands::Show {
            input,
            ticker,
            quality,
            from,
            to,
        }) => {
            let path = input.unwrap_or_else(|| settings.output_path.clone());
            let rows = drops_csv::read_rows(&path)?;

            let mut pairs: Vec<(String, String)> = Vec::new();
            pairs.extend(ticker.into_iter().map(|t| ("ticker".to_string(), t)));
            pairs.extend(quality.into_iter().map(|q| ("quality".to_string(), q)));
            pairs.extend(from.map(|d| ("from".to_string(), d.to_string())));
            pairs.extend(to.map(|d| ("to".to_string(), d.to_string())));

            let view = dashboard::render(&rows, &DashboardFilter::from_query_pairs(&pairs));
            println!("{}", dashboard::to_text_table(&view));
            println!();
            println!("Showing {} of {} drops", view.rows.len(), view.total_rows);
            for q in &view.qualities {
                println!("  {}: {}", q.label, q.count);
            }
        }
        Some(Commands::Serve { port, input }) => {
            let path = input.unwrap_or_else(|| settings.output_path.clone());
            if !path.exists() {
                eprintln!("⚠️  {} does not exist yet, run 'backfill' first", path.display());
            }
            let state = web::AppState::new(path);
            web::server::start_server(state, port).await?;
        }
        None => backfill(&settings, BackfillArgs::default()).await?,
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

async fn backfill(settings: &Settings, args: BackfillArgs) -> Result<()> {
    let config = AnalyzerConfig::resolve(settings, args.into(), env::var("NEWS_API_KEY").ok())?;

    let api_key = env::var("FINANCIALMODELINGPREP_API_KEY")
        .context("FINANCIALMODELINGPREP_API_KEY must be set")?;
    let market = FMPClient::new(api_key);
    let calendar = NyseCalendar;

    println!(
        "Analyzing {} from {} to {} (drop threshold {:.1}%, {} trading day window)",
        config.index,
        config.start_date,
        config.end_date,
        config.drop_threshold * 100.0,
        config.lookahead_days
    );

    let tickers = resolve_constituents(settings, &config, &market).await?;

    let report = match &config.news_api_key {
        Some(key) => {
            let news = NewsApiClient::new(key.clone())?;
            run_backfill(&config, &tickers, &market, &news, &calendar).await?
        }
        None => {
            eprintln!("⚠️  NEWS_API_KEY not set, headlines will be recorded as 'unknown'");
            run_backfill(&config, &tickers, &market, &NoNews, &calendar).await?
        }
    };

    drops_csv::write_rows(&config.output_path, &report.rows)?;
    print_summary(&report);
    println!(
        "✅ Backfill complete: saved to {}",
        config.output_path.display()
    );

    Ok(())
}

fn print_summary(report: &RunReport) {
    println!(
        "\n✅ Analyzed {} tickers, {} drops detected",
        report.analyzed_count(),
        report.rows.len()
    );

    let failures = report.failures();
    if !failures.is_empty() {
        println!("\n❌ Failed to process {} tickers:", failures.len());
        for (ticker, reason) in failures {
            println!("  {} - {}", ticker, reason);
        }
    }
}
